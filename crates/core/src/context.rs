//! The per-request preview state.
//!
//! A [`PreviewContext`] is created by the caller for one URL, mutated in
//! place by the fetcher, the selected strategy and the image cache, and
//! read back once the preview is done. It is not meant to be reused for a
//! different URL.
//!
//! # Example
//!
//! ```rust
//! use linkpeek_core::{PreviewContext, StrategyKind};
//!
//! let context = PreviewContext::builder("https://example.com/article")
//!     .kind(StrategyKind::StandardMetaTags)
//!     .locale("fr-FR")
//!     .timeout(10)
//!     .build();
//!
//! assert_eq!(context.source_url(), "https://example.com/article");
//! assert!(context.document().is_none());
//! ```

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::fetch::FetchConfig;
use crate::request::{DEFAULT_LOCALE, OutboundRequest};
use crate::strategy::{PreviewFields, StrategyKind};
use crate::{Document, PreviewError, Result};

/// The public result of a preview, shaped for JSON encoding.
///
/// ```rust
/// use linkpeek_core::LinkPreview;
///
/// let preview = LinkPreview { website: "https://example.com".into(), ..Default::default() };
/// let json = serde_json::to_value(&preview).unwrap();
/// assert_eq!(json["website"], "https://example.com");
/// assert_eq!(json["image"], "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkPreview {
    pub title: String,
    pub description: String,
    pub image: String,
    pub website: String,
}

/// Mutable state for a single link preview.
///
/// Output fields start empty. `image_bytes` is a lazy cache: once filled it
/// is returned as-is for the rest of the context's life, even if
/// `image_url` changes afterwards.
#[derive(Debug)]
pub struct PreviewContext {
    strategy: String,
    locale: Option<String>,
    source_url: String,
    final_url: Option<Url>,
    title: String,
    description: String,
    image_url: String,
    document: Option<Document>,
    request: Option<OutboundRequest>,
    pub(crate) image_bytes: Option<Vec<u8>>,
    fetch_config: FetchConfig,
}

impl PreviewContext {
    /// Creates a context for `url` using the standard meta tag strategy.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            strategy: StrategyKind::default().as_str().to_string(),
            locale: None,
            source_url: url.into(),
            final_url: None,
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            document: None,
            request: None,
            image_bytes: None,
            fetch_config: FetchConfig::default(),
        }
    }

    /// Creates a builder for a context targeting `url`.
    pub fn builder(url: impl Into<String>) -> PreviewContextBuilder {
        PreviewContextBuilder::new(url)
    }

    /// The strategy discriminator as given by the caller.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// The originally requested URL.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// The URL after redirects, once a fetch has succeeded.
    pub fn final_url(&self) -> Option<&Url> {
        self.final_url.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Replaces the image URL. Does not invalidate cached image bytes.
    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.image_url = url.into();
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Attaches a pre-parsed page so that previewing skips the network.
    pub fn attach_document(&mut self, document: Document) {
        self.document = Some(document);
    }

    /// The prepared page request, if one has been built.
    pub fn request(&self) -> Option<&OutboundRequest> {
        self.request.as_ref()
    }

    /// Cached image bytes, without fetching.
    pub fn cached_image_bytes(&self) -> Option<&[u8]> {
        self.image_bytes.as_deref()
    }

    pub fn fetch_config(&self) -> &FetchConfig {
        &self.fetch_config
    }

    /// Parses the source URL, accepting only `http` and `https`.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::InvalidContext`] for blank, malformed or
    /// non-HTTP URLs.
    pub fn parsed_source_url(&self) -> Result<Url> {
        let raw = self.source_url.trim();
        if raw.is_empty() {
            return Err(PreviewError::InvalidContext("source URL is empty".to_string()));
        }

        let url = Url::parse(raw).map_err(|e| PreviewError::InvalidContext(format!("{raw}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(PreviewError::InvalidContext(format!(
                "URL must use http:// or https://, got {scheme}://"
            ))),
        }
    }

    /// Returns the prepared request, building it on first use.
    ///
    /// A missing locale is defaulted to `en-US` and written back.
    pub fn ensure_request(&mut self) -> Result<&OutboundRequest> {
        if self.request.is_none() {
            let url = self.parsed_source_url()?;
            let locale = match self.locale.as_deref().map(str::trim) {
                Some(locale) if !locale.is_empty() => locale.to_string(),
                _ => DEFAULT_LOCALE.to_string(),
            };

            let request = OutboundRequest::get(url, &self.fetch_config.user_agent, &locale)?;
            debug!(url = %request.url, locale = %locale, "prepared page request");

            self.locale = Some(locale);
            self.request = Some(request);
        }

        self.request
            .as_ref()
            .ok_or_else(|| PreviewError::InvalidContext("request was not prepared".to_string()))
    }

    /// Stores the outcome of a successful page fetch.
    ///
    /// The final URL is only recorded the first time.
    pub(crate) fn record_fetch(&mut self, final_url: Url, document: Document) {
        if self.final_url.is_none() {
            self.final_url = Some(final_url);
        }
        self.document = Some(document);
    }

    /// The URL relative references are resolved against.
    ///
    /// An absolute `<base href>` wins, then the post-redirect URL, then the
    /// source URL.
    pub fn resolution_base(&self) -> String {
        let declared = self
            .document
            .as_ref()
            .and_then(Document::base_href)
            .filter(|href| Url::parse(href).is_ok_and(|url| url.has_host()));

        match (declared, &self.final_url) {
            (Some(base), _) => base,
            (None, Some(final_url)) => final_url.to_string(),
            (None, None) => self.source_url.clone(),
        }
    }

    /// Writes extracted values; fields a strategy left empty are untouched.
    pub(crate) fn apply(&mut self, fields: PreviewFields) {
        if let Some(title) = fields.title {
            self.title = title;
        }
        if let Some(description) = fields.description {
            self.description = description;
        }
        if let Some(image) = fields.image {
            self.image_url = image;
        }
    }

    /// Snapshot of the public output fields.
    pub fn to_preview(&self) -> LinkPreview {
        LinkPreview {
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image_url.clone(),
            website: self.source_url.clone(),
        }
    }
}

/// Builder for [`PreviewContext`].
pub struct PreviewContextBuilder {
    context: PreviewContext,
}

impl PreviewContextBuilder {
    /// Creates a new builder with default values.
    pub fn new(url: impl Into<String>) -> Self {
        Self { context: PreviewContext::new(url) }
    }

    /// Sets the strategy by discriminator name; validated by [`crate::select`].
    pub fn strategy(mut self, name: impl Into<String>) -> Self {
        self.context.strategy = name.into();
        self
    }

    /// Sets the strategy from a known kind.
    pub fn kind(mut self, kind: StrategyKind) -> Self {
        self.context.strategy = kind.as_str().to_string();
        self
    }

    /// Sets the locale used for `Accept-Language`.
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.context.locale = Some(locale.into());
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.context.fetch_config.timeout = seconds;
        self
    }

    /// Sets the User-Agent for page and image requests.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.context.fetch_config.user_agent = user_agent.into();
        self
    }

    /// Replaces the whole fetch configuration.
    pub fn fetch_config(mut self, config: FetchConfig) -> Self {
        self.context.fetch_config = config;
        self
    }

    /// Attaches an already parsed page.
    pub fn document(mut self, document: Document) -> Self {
        self.context.document = Some(document);
        self
    }

    /// Builds the context.
    pub fn build(self) -> PreviewContext {
        self.context
    }
}
