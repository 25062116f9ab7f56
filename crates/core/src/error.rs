//! Error types for link preview operations.
//!
//! This module defines the main error type [`PreviewError`] which represents
//! every failure the dispatcher, fetcher, and image cache can report.
//!
//! # Example
//!
//! ```rust
//! use linkpeek_core::{PreviewError, Result};
//!
//! fn require_image(url: &str) -> Result<&str> {
//!     if url.is_empty() {
//!         return Err(PreviewError::ImageNotFound);
//!     }
//!     Ok(url)
//! }
//! # assert!(require_image("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for link preview operations.
///
/// None of these are retried or downgraded internally. Callers should treat
/// an error from [`PreviewHandler::preview`](crate::PreviewHandler::preview)
/// as "no preview available".
///
/// # Example
///
/// ```rust
/// use linkpeek_core::{PreviewContext, PreviewError, select};
///
/// let mut context = PreviewContext::builder("https://example.com").strategy("rss").build();
/// match select(&mut context) {
///     Err(PreviewError::UnknownStrategy(name)) => println!("no strategy named {}", name),
///     Err(e) => println!("Error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum PreviewError {
    /// The context cannot be previewed.
    ///
    /// Returned when the source URL is missing, malformed, or not HTTP(S),
    /// or when the outbound request cannot be built from its fields.
    #[error("Invalid preview context: {0}")]
    InvalidContext(String),

    /// The strategy discriminator does not name a known strategy.
    #[error("Unknown preview strategy: {0}")]
    UnknownStrategy(String),

    /// Transport-level failures from reqwest.
    ///
    /// This variant wraps connection errors, DNS failures, TLS problems,
    /// timeouts, and interrupted bodies for both page and image fetches.
    #[error("HTTP request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The response body could not be treated as markup.
    ///
    /// Also returned for invalid CSS selectors.
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Image bytes were requested but no image URL was resolved.
    #[error("Image not found")]
    ImageNotFound,

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// File not found.
    ///
    /// Returned when reading a saved page that doesn't exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Local I/O errors while reading a saved page.
    #[error("Failed to read input: {0}")]
    ReadError(#[from] std::io::Error),
}

/// Result type alias for PreviewError.
///
/// This is a convenience alias for `std::result::Result<T, PreviewError>`.
pub type Result<T> = std::result::Result<T, PreviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PreviewError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_unknown_strategy_names_discriminator() {
        let err = PreviewError::UnknownStrategy("rss".to_string());
        assert!(err.to_string().contains("rss"));
    }

    #[test]
    fn test_image_not_found_message() {
        assert_eq!(PreviewError::ImageNotFound.to_string(), "Image not found");
    }
}
