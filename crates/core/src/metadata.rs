use regex::Regex;

use crate::Document;

/// One place a preview field can be read from.
///
/// Strategies describe each field as an ordered slice of sources; the
/// first source yielding a non-blank value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// `<meta property="…">` or `<meta name="…">` content.
    Meta(&'static str),
    /// Text of the `<title>` element.
    Title,
    /// Text of the first element matching a CSS selector.
    ElementText(&'static str),
    /// String literal assigned to `var <name>` in an inline script.
    ScriptVar(&'static str),
}

impl Document {
    /// Walk `sources` in order and return the first non-blank value.
    pub fn first_of(&self, sources: &[FieldSource]) -> Option<String> {
        sources.iter().find_map(|source| self.read_source(*source))
    }

    /// Read a single source, trimmed; blank values count as absent.
    pub fn read_source(&self, source: FieldSource) -> Option<String> {
        match source {
            FieldSource::Meta(key) => self.meta_content(key),
            FieldSource::Title => self.title(),
            FieldSource::ElementText(selector) => self.element_text(selector),
            FieldSource::ScriptVar(name) => self.script_var(name),
        }
    }

    /// Get meta tag content by `property` or `name` attribute.
    ///
    /// Both attribute styles form one tier, so the first non-blank
    /// occurrence in document order wins regardless of which one it uses.
    pub fn meta_content(&self, key: &str) -> Option<String> {
        let selector = format!("meta[property=\"{key}\"], meta[name=\"{key}\"]");
        let elements = self.select(&selector).ok()?;
        elements.iter().find_map(|el| el.non_empty_attr("content"))
    }

    /// `href` of the first `<link>` whose `rel` marks it as an icon.
    ///
    /// Matches `icon`, `shortcut icon`, and `apple-touch-icon`.
    pub fn favicon_href(&self) -> Option<String> {
        let elements = self.select("link[rel][href]").ok()?;
        elements
            .iter()
            .filter(|el| {
                el.attr("rel").is_some_and(|rel| {
                    rel.split_ascii_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("icon") || token.eq_ignore_ascii_case("apple-touch-icon"))
                })
            })
            .find_map(|el| el.non_empty_attr("href"))
    }

    fn element_text(&self, selector: &str) -> Option<String> {
        let elements = self.select(selector).ok()?;
        let text = elements.first()?.text();
        let text = text.trim();
        if text.is_empty() { None } else { Some(text.to_string()) }
    }

    /// Handles `var x = "…"`, `var x = '…'` and `var x = htmlDecode("…")`.
    fn script_var(&self, name: &str) -> Option<String> {
        let pattern = format!(
            r#"var\s+{}\s*=\s*(?:htmlDecode\(\s*)?(?:"([^"]*)"|'([^']*)')"#,
            regex::escape(name)
        );
        let var_regex = Regex::new(&pattern).ok()?;

        let scripts = self.select("script").ok()?;
        scripts.iter().find_map(|script| {
            let source = script.text();
            let captures = var_regex.captures(&source)?;
            let value = captures.get(1).or_else(|| captures.get(2))?.as_str().trim();
            if value.is_empty() { None } else { Some(value.to_string()) }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HTML_WITH_META: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page Title</title>
            <meta name="description" content="Plain description">
            <meta property="og:title" content="   ">
            <meta name="og:title" content="Second OG Title">
            <meta property="og:title" content="Third OG Title">
            <meta name="twitter:title" content="Twitter Title">
            <link rel="stylesheet" href="/site.css">
            <link rel="Shortcut Icon" href="">
            <link rel="shortcut icon" href="/favicon.ico">
            <link rel="apple-touch-icon" href="/touch.png">
        </head>
        <body>
            <h1 id="headline">  Main Heading </h1>
            <script>
                var msg_title = 'Script Title'.html(false);
                var msg_desc = htmlDecode("Script description");
                var msg_cdn_url = "";
            </script>
        </body>
        </html>
    "#;

    #[test]
    fn test_meta_content_skips_blank_first_occurrence() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        assert_eq!(doc.meta_content("og:title"), Some("Second OG Title".to_string()));
    }

    #[test]
    fn test_meta_content_missing() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        assert_eq!(doc.meta_content("og:image"), None);
    }

    #[test]
    fn test_favicon_href_first_icon_link() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        assert_eq!(doc.favicon_href(), Some("/favicon.ico".to_string()));
    }

    #[test]
    fn test_favicon_href_apple_touch_icon() {
        let html = r#"<html><head><link rel="apple-touch-icon" href="/touch.png"></head></html>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.favicon_href(), Some("/touch.png".to_string()));
    }

    #[test]
    fn test_favicon_href_ignores_non_icons() {
        let html = r#"<html><head><link rel="icons-manifest" href="/m.json"><link rel="stylesheet" href="/a.css"></head></html>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.favicon_href(), None);
    }

    #[rstest]
    #[case(FieldSource::Meta("twitter:title"), Some("Twitter Title"))]
    #[case(FieldSource::Meta("description"), Some("Plain description"))]
    #[case(FieldSource::Title, Some("Test Page Title"))]
    #[case(FieldSource::ElementText("#headline"), Some("Main Heading"))]
    #[case(FieldSource::ElementText("#missing"), None)]
    #[case(FieldSource::ScriptVar("msg_title"), Some("Script Title"))]
    #[case(FieldSource::ScriptVar("msg_desc"), Some("Script description"))]
    #[case(FieldSource::ScriptVar("msg_cdn_url"), None)]
    fn test_read_source(#[case] source: FieldSource, #[case] expected: Option<&str>) {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        assert_eq!(doc.read_source(source).as_deref(), expected);
    }

    #[test]
    fn test_first_of_respects_order() {
        let doc = Document::parse(HTML_WITH_META).unwrap();
        let title = doc.first_of(&[FieldSource::Meta("og:image"), FieldSource::Title, FieldSource::Meta("og:title")]);
        assert_eq!(title, Some("Test Page Title".to_string()));
    }

    #[test]
    fn test_first_of_all_absent() {
        let doc = Document::parse("<html><body></body></html>").unwrap();
        assert_eq!(doc.first_of(&[FieldSource::Meta("og:title"), FieldSource::Title]), None);
    }
}
