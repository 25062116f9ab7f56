pub mod json;
pub mod text;
pub mod toml;

pub use json::{JsonFormatter, preview_to_json};
pub use text::{TextFormatter, preview_to_text};
pub use toml::{TomlFormatter, preview_to_toml};
