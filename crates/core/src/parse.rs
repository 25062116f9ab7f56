//! HTML parsing and DOM queries.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the DOM tree using CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use linkpeek_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Title</title></head>
//!         <body><a class="nav" href="/about">About</a></body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.title(), Some("Title".to_string()));
//! let links = doc.select("a.nav").unwrap();
//! assert_eq!(links[0].attr("href"), Some("/about"));
//! ```

use scraper::{Html, Selector};

use crate::{PreviewError, Result};

/// Represents a parsed HTML document.
///
/// A Document wraps an HTML page and provides methods for querying elements
/// using CSS selectors. Meta-tag lookups live in [`crate::metadata`].
///
/// # Example
///
/// ```rust
/// use linkpeek_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
#[derive(Debug)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// The underlying parser is error tolerant, so malformed markup still
    /// yields a document. Bodies that are not markup at all are rejected
    /// earlier, by the fetcher.
    ///
    /// # Example
    ///
    /// ```rust
    /// use linkpeek_core::parse::Document;
    ///
    /// let html = "<html><body><h1>Title</h1></body></html>";
    /// let doc = Document::parse(html).unwrap();
    /// ```
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Selects elements using a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::ParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use linkpeek_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| PreviewError::ParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Gets the trimmed text of the first `<title>` element.
    ///
    /// Returns `None` when the element is missing or blank.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
    }

    /// Gets the `href` of the first `<base>` element, if declared.
    pub fn base_href(&self) -> Option<String> {
        let selector = Selector::parse("base[href]").ok()?;
        self.html
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use linkpeek_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    ///
    /// Returns the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    ///
    /// Returns `None` if the attribute is not present.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets a non-blank attribute value, trimmed.
    pub fn non_empty_attr(&self, name: &str) -> Option<String> {
        self.attr(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <base href="https://cdn.example.com/assets/">
            <title>
                Test Page
            </title>
        </head>
        <body>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com" title="  ">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_blank_title_is_absent() {
        let doc = Document::parse("<html><head><title>   </title></head></html>").unwrap();
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn test_select_elements_in_document_order() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_element_attributes() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let elements = doc.select("a").unwrap();

        assert_eq!(elements[0].attr("href"), Some("https://example.com"));
        assert_eq!(elements[0].non_empty_attr("title"), None);
        assert_eq!(elements[0].non_empty_attr("missing"), None);
    }

    #[test]
    fn test_base_href() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.base_href(), Some("https://cdn.example.com/assets/".to_string()));
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(PreviewError::ParseError(_))));
    }
}
