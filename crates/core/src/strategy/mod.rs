//! Strategy selection and the uniform preview entry point.
//!
//! [`select`] maps a context's strategy discriminator onto one of the
//! closed set of [`StrategyKind`]s and returns a [`PreviewHandler`] bound to
//! the context. Adding a page type means adding a variant and a
//! [`Strategy`] implementation; the handler does not change.
//!
//! # Example
//!
//! ```rust,no_run
//! use linkpeek_core::{PreviewContext, select};
//!
//! # #[tokio::main]
//! # async fn main() -> linkpeek_core::Result<()> {
//! let mut context = PreviewContext::new("https://example.com/article");
//! let mut handler = select(&mut context)?;
//! let preview = handler.preview().await?.to_preview();
//! println!("{}: {}", preview.title, preview.image);
//! # Ok(())
//! # }
//! ```

pub mod standard;
pub mod wechat;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::fetch::fetch_document;
use crate::{Document, LinkPreview, PreviewContext, PreviewError, Result};

pub use standard::StandardMetaTags;
pub use wechat::WechatArticle;

/// The known page types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrategyKind {
    /// Open Graph, Twitter Card and plain HTML tags.
    #[default]
    StandardMetaTags,
    /// WeChat official-account articles (`mp.weixin.qq.com`).
    WechatArticle,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::StandardMetaTags, StrategyKind::WechatArticle];

    /// Canonical discriminator name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StandardMetaTags => "standard",
            Self::WechatArticle => "wechat",
        }
    }

    fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Self::StandardMetaTags => Box::new(StandardMetaTags),
            Self::WechatArticle => Box::new(WechatArticle),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = PreviewError;

    /// Accepts the canonical names, a few aliases, and the numeric
    /// discriminators `0` and `1`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "standard-meta-tags" | "meta" | "0" => Ok(Self::StandardMetaTags),
            "wechat" | "wechat-mp" | "weixin" | "1" => Ok(Self::WechatArticle),
            _ => Err(PreviewError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Values a strategy found; `None` means "leave the field alone".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// A page-type-specific way of reading preview fields from a document.
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Reads fields from `document`. Relative image references are
    /// resolved against `page_url`.
    fn extract(&self, document: &Document, page_url: &str) -> PreviewFields;
}

/// Picks the strategy named by `context` and binds it to the context.
///
/// Builds the outbound request if the context has none. Does not touch the
/// network.
///
/// # Errors
///
/// - [`PreviewError::InvalidContext`] when the source URL is blank, malformed,
///   or not HTTP(S).
/// - [`PreviewError::UnknownStrategy`] for an unrecognised discriminator. No
///   request is built in that case.
pub fn select(context: &mut PreviewContext) -> Result<PreviewHandler<'_>> {
    context.parsed_source_url()?;
    let kind: StrategyKind = context.strategy().parse()?;
    context.ensure_request()?;

    debug!(strategy = %kind, url = %context.source_url(), "selected preview strategy");
    Ok(PreviewHandler { context, strategy: kind.strategy() })
}

/// Previews `url` with the standard strategy and default settings.
pub async fn preview_url(url: &str) -> Result<LinkPreview> {
    let mut context = PreviewContext::new(url);
    select(&mut context)?.preview().await?;
    Ok(context.to_preview())
}

/// A strategy bound to the context it previews.
pub struct PreviewHandler<'a> {
    context: &'a mut PreviewContext,
    strategy: Box<dyn Strategy>,
}

impl<'a> PreviewHandler<'a> {
    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn context(&self) -> &PreviewContext {
        &*self.context
    }

    pub fn context_mut(&mut self) -> &mut PreviewContext {
        &mut *self.context
    }

    /// Fetches the page if no document is attached, then extracts fields.
    ///
    /// Fetch errors are returned unchanged and leave the output fields
    /// untouched. Missing tags are not errors; they leave fields empty.
    pub async fn preview(&mut self) -> Result<&PreviewContext> {
        if self.context.document().is_none() {
            fetch_document(&mut *self.context).await?;
        }

        let base = self.context.resolution_base();
        let fields = match self.context.document() {
            Some(document) => self.strategy.extract(document, &base),
            None => return Err(PreviewError::InvalidContext("no document to extract from".to_string())),
        };

        debug!(
            strategy = %self.kind(),
            title = fields.title.is_some(),
            description = fields.description.is_some(),
            image = fields.image.is_some(),
            "extracted preview fields"
        );
        self.context.apply(fields);

        Ok(&*self.context)
    }

    /// Shortcut for [`PreviewContext::image_bytes`].
    pub async fn image_bytes(&mut self) -> Result<&[u8]> {
        self.context.image_bytes().await
    }
}
