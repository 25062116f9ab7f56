use crate::metadata::FieldSource::{self, Meta, Title};
use crate::resolve::resolve;
use crate::strategy::{PreviewFields, Strategy, StrategyKind};
use crate::Document;

/// Title precedence: `og:title`, `twitter:title`, `<title>`.
pub const TITLE_SOURCES: &[FieldSource] = &[Meta("og:title"), Meta("twitter:title"), Title];

/// Description precedence: `og:description`, `twitter:description`,
/// `<meta name="description">`.
pub const DESCRIPTION_SOURCES: &[FieldSource] =
    &[Meta("og:description"), Meta("twitter:description"), Meta("description")];

/// Image precedence before the favicon fallback.
pub const IMAGE_SOURCES: &[FieldSource] = &[Meta("og:image"), Meta("twitter:image")];

/// Reads Open Graph, Twitter Card and plain HTML tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardMetaTags;

impl Strategy for StandardMetaTags {
    fn kind(&self) -> StrategyKind {
        StrategyKind::StandardMetaTags
    }

    fn extract(&self, document: &Document, page_url: &str) -> PreviewFields {
        PreviewFields {
            title: document.first_of(TITLE_SOURCES),
            description: document.first_of(DESCRIPTION_SOURCES),
            image: image_or_favicon(document, IMAGE_SOURCES, page_url),
        }
    }
}

/// First image from `sources`, else the page's favicon.
///
/// The favicon is only consulted when no listed source has a value, so it
/// can never replace an explicit image.
pub(crate) fn image_or_favicon(document: &Document, sources: &[FieldSource], page_url: &str) -> Option<String> {
    let candidate = document.first_of(sources).or_else(|| document.favicon_href())?;
    let resolved = resolve(&candidate, page_url);
    if resolved.is_empty() { None } else { Some(resolved) }
}
