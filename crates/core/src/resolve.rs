//! Resolution of favicon and image references found in a page.
//!
//! References are resolved against the scheme and authority of the page
//! only. The page's own path is discarded, so `icon.png` on
//! `https://example.com/blog/post` becomes `https://example.com/icon.png`.

use url::Url;

/// Turns a possibly relative reference into an absolute URL.
///
/// - blank candidates resolve to an empty string
/// - `http://` and `https://` references are returned unchanged
/// - `//host/path` references inherit the page scheme
/// - anything else is joined onto `scheme://authority/`
///
/// Never fails. When `page_url` cannot be parsed the result is the
/// root-relative path `/candidate`.
///
/// # Example
///
/// ```rust
/// use linkpeek_core::resolve;
///
/// assert_eq!(resolve("/fav.ico", "https://example.com/page"), "https://example.com/fav.ico");
/// assert_eq!(resolve("https://cdn.example.com/a.png", "https://example.com/page"), "https://cdn.example.com/a.png");
/// ```
pub fn resolve(candidate: &str, page_url: &str) -> String {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return String::new();
    }

    if has_http_scheme(candidate) {
        return candidate.to_string();
    }

    let page = Url::parse(page_url.trim()).ok();

    if let Some(rest) = candidate.strip_prefix("//") {
        let scheme = page.as_ref().map(Url::scheme).unwrap_or("https");
        return format!("{scheme}://{rest}");
    }

    let path = candidate.trim_start_matches('/');
    match page.as_ref().and_then(origin_prefix) {
        Some(origin) => format!("{origin}/{path}"),
        None => format!("/{path}"),
    }
}

fn has_http_scheme(candidate: &str) -> bool {
    let lower = candidate.get(..8).unwrap_or(candidate).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// `scheme://host[:port]`, or `None` for URLs without a host.
fn origin_prefix(page: &Url) -> Option<String> {
    let host = page.host_str()?;
    Some(match page.port() {
        Some(port) => format!("{}://{}:{}", page.scheme(), host, port),
        None => format!("{}://{}", page.scheme(), host),
    })
}
