pub mod context;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod image;
pub mod metadata;
pub mod parse;
pub mod request;
pub mod resolve;
pub mod strategy;

pub use context::{LinkPreview, PreviewContext, PreviewContextBuilder};
pub use error::{PreviewError, Result};
pub use fetch::FetchConfig;
pub use fetch::{fetch_bytes, fetch_document, fetch_file, fetch_stdin};
pub use formatters::{JsonFormatter, TextFormatter, TomlFormatter, preview_to_json, preview_to_text, preview_to_toml};
pub use metadata::FieldSource;
pub use parse::Document;
pub use request::OutboundRequest;
pub use resolve::resolve;
pub use strategy::{
    PreviewFields, PreviewHandler, StandardMetaTags, Strategy, StrategyKind, WechatArticle, preview_url, select,
};
