//! The prepared page request.
//!
//! [`OutboundRequest`] is a plain description (method, target, headers) that
//! the dispatcher builds once per context and the fetcher later executes.

use reqwest::Method;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use crate::{PreviewError, Result};

/// Locale used when the context does not carry one.
pub const DEFAULT_LOCALE: &str = "en-US";

/// HTML/XHTML first, anything else at a lower weight.
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Method, target, and headers for one page request.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl OutboundRequest {
    /// Builds a browser-like `GET` for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::InvalidContext`] when the user agent or locale
    /// cannot be encoded as a header value.
    pub fn get(url: Url, user_agent: &str, locale: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, header_value(&accept_language(locale))?);

        Ok(Self { method: Method::GET, url, headers })
    }
}

/// Builds an `Accept-Language` value from a locale tag.
///
/// `fr-CA` becomes `fr-CA,fr;q=0.9`; a bare `de` stays `de`; a blank locale
/// falls back to [`DEFAULT_LOCALE`].
///
/// # Example
///
/// ```rust
/// use linkpeek_core::request::accept_language;
///
/// assert_eq!(accept_language("en-US"), "en-US,en;q=0.9");
/// assert_eq!(accept_language(""), "en-US,en;q=0.9");
/// ```
pub fn accept_language(locale: &str) -> String {
    let locale = match locale.trim() {
        "" => DEFAULT_LOCALE,
        trimmed => trimmed,
    };

    let primary = locale.split(['-', '_']).next().unwrap_or(locale);
    if primary.is_empty() || primary.eq_ignore_ascii_case(locale) {
        locale.to_string()
    } else {
        format!("{locale},{primary};q=0.9")
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| PreviewError::InvalidContext(format!("invalid header value {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en-US", "en-US,en;q=0.9")]
    #[case("zh_CN", "zh_CN,zh;q=0.9")]
    #[case("pt-BR", "pt-BR,pt;q=0.9")]
    #[case("de", "de")]
    #[case("  ", "en-US,en;q=0.9")]
    fn test_accept_language(#[case] locale: &str, #[case] expected: &str) {
        assert_eq!(accept_language(locale), expected);
    }

    #[test]
    fn test_get_sets_browser_headers() {
        let url = Url::parse("https://example.com/page").unwrap();
        let request = OutboundRequest::get(url.clone(), "Mozilla/5.0 Test", "fr-FR").unwrap();

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, url);
        assert_eq!(request.headers[USER_AGENT], "Mozilla/5.0 Test");
        assert_eq!(request.headers[ACCEPT], ACCEPT_HTML);
        assert_eq!(request.headers[ACCEPT_LANGUAGE], "fr-FR,fr;q=0.9");
    }

    #[test]
    fn test_get_rejects_unencodable_locale() {
        let url = Url::parse("https://example.com").unwrap();
        let result = OutboundRequest::get(url, "Mozilla/5.0", "en\nUS");
        assert!(matches!(result, Err(PreviewError::InvalidContext(_))));
    }
}
