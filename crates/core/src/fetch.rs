//! Page and image fetching, plus offline sources.
//!
//! Network access goes through reqwest with its default redirect policy.
//! Nothing here retries: every failure is returned to the caller as-is.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::{Document, PreviewContext, PreviewError, Result};

/// Upper bound for pre-allocating an image buffer from `Content-Length`.
const MAX_PREALLOC: u64 = 1024 * 1024;

/// How much of a page body is inspected when deciding whether it is markup.
const SNIFF_LEN: usize = 512;

/// Leading bytes of formats that are never markup.
const BINARY_SIGNATURES: &[&[u8]] = &[
    b"\x89PNG\r\n\x1a\n",
    b"\xff\xd8\xff",
    b"GIF87a",
    b"GIF89a",
    b"%PDF-",
    b"PK\x03\x04",
    b"RIFF",
    b"\x1f\x8b",
    b"\x00\x00\x01\x00",
];

/// HTTP client configuration shared by page and image requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl FetchConfig {
    fn client(&self) -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(self.timeout))
            .user_agent(&self.user_agent)
            .build()
            .map_err(PreviewError::NetworkError)
    }
}

/// Fetches the context's page and attaches the parsed document.
///
/// The prepared request is built first if the context has none. On success
/// the post-redirect URL is recorded. HTTP status codes are not inspected:
/// an error page with a markup body is parsed like any other page.
///
/// # Errors
///
/// - [`PreviewError::NetworkError`] on connection, TLS, timeout or body
///   read failures.
/// - [`PreviewError::ParseError`] when the response is not markup.
/// - [`PreviewError::InvalidContext`] when no request can be prepared.
pub async fn fetch_document(context: &mut PreviewContext) -> Result<()> {
    let client = context.fetch_config().client()?;
    let request = context.ensure_request()?.clone();

    debug!(url = %request.url, "fetching page");
    let response = client
        .request(request.method, request.url)
        .headers(request.headers)
        .send()
        .await?;

    let status = response.status();
    let final_url = response.url().clone();
    if !status.is_success() {
        debug!(%status, url = %final_url, "page returned non-success status, extracting anyway");
    }

    let declared = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(mime_essence);
    let bytes = response.bytes().await?;
    ensure_markup(&bytes, declared.as_deref())?;
    let body = String::from_utf8_lossy(&bytes);

    let document = Document::parse(&body)?;
    debug!(url = %final_url, bytes = body.len(), "parsed page");
    context.record_fetch(final_url, document);

    Ok(())
}

/// Downloads `url` into memory with a plain `GET`.
///
/// The body is streamed chunk by chunk into a growable buffer. Status codes
/// are not inspected.
///
/// # Errors
///
/// Returns [`PreviewError::InvalidUrl`] if `url` cannot be parsed and
/// [`PreviewError::NetworkError`] on transport failures.
pub async fn fetch_bytes(url: &str, config: &FetchConfig) -> Result<Vec<u8>> {
    let parsed_url = Url::parse(url).map_err(|e| PreviewError::InvalidUrl(format!("{url}: {e}")))?;
    let client = config.client()?;

    debug!(url = %parsed_url, "fetching image");
    let mut response = client.get(parsed_url).send().await?;

    let capacity = response.content_length().map_or(0, |len| len.min(MAX_PREALLOC) as usize);
    let mut buffer = Vec::with_capacity(capacity);
    while let Some(chunk) = response.chunk().await? {
        buffer.extend_from_slice(&chunk);
    }

    debug!(bytes = buffer.len(), status = %response.status(), "fetched image");
    Ok(buffer)
}

/// Decides from the body whether a page can be treated as markup.
///
/// Bodies opening with a known binary signature are rejected. A NUL byte in
/// the first [`SNIFF_LEN`] bytes is tolerated only when the server declared
/// a markup type. Everything else goes to the HTML parser, whatever the
/// `Content-Type` says.
fn ensure_markup(body: &[u8], declared: Option<&str>) -> Result<()> {
    let prefix = &body[..body.len().min(SNIFF_LEN)];
    let declared_name = declared.unwrap_or("unknown");

    if BINARY_SIGNATURES.iter().any(|signature| prefix.starts_with(signature)) {
        return Err(PreviewError::ParseError(format!("binary body ({declared_name})")));
    }

    if prefix.contains(&0) && !declared.is_some_and(is_markup_type) {
        return Err(PreviewError::ParseError(format!("body is not markup ({declared_name})")));
    }

    Ok(())
}

fn mime_essence(content_type: &str) -> String {
    content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

fn is_markup_type(essence: &str) -> bool {
    essence.starts_with("text/") || essence.contains("html") || essence.contains("xml")
}

/// Reads a saved HTML page from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(PreviewError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(PreviewError::from)
    }
}

/// Reads an HTML page from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(PreviewError::from)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.user_agent.contains("Chrome"));
    }

    #[rstest]
    #[case(Some("text/html"))]
    #[case(Some("application/octet-stream"))]
    #[case(Some("application/json"))]
    #[case(None)]
    fn test_html_body_accepted_whatever_declared(#[case] declared: Option<&str>) {
        let body = b"<html><head><title>Real page</title></head></html>";
        assert!(ensure_markup(body, declared).is_ok());
    }

    #[rstest]
    #[case(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR".as_slice())]
    #[case(b"\xff\xd8\xff\xe0\x00\x10JFIF".as_slice())]
    #[case(b"%PDF-1.7\n".as_slice())]
    #[case(b"GIF89a\x01\x00".as_slice())]
    fn test_binary_signature_rejected(#[case] body: &[u8]) {
        assert!(matches!(
            ensure_markup(body, Some("text/html")),
            Err(PreviewError::ParseError(_))
        ));
    }

    #[test]
    fn test_nul_tolerated_only_for_declared_markup() {
        let body = b"<html><head><title>A\x00B</title></head></html>";
        assert!(ensure_markup(body, Some("text/html")).is_ok());
        assert!(matches!(
            ensure_markup(body, Some("application/octet-stream")),
            Err(PreviewError::ParseError(_))
        ));
        assert!(matches!(ensure_markup(body, None), Err(PreviewError::ParseError(_))));
    }

    #[test]
    fn test_mime_essence() {
        assert_eq!(mime_essence("Text/HTML; charset=utf-8"), "text/html");
        assert!(is_markup_type("application/xhtml+xml"));
        assert!(!is_markup_type("image/png"));
    }

    #[test]
    fn test_fetch_bytes_invalid_url() {
        let config = FetchConfig::default();
        let result = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(fetch_bytes("/favicon.ico", &config))
        })
        .join()
        .unwrap();

        assert!(matches!(result, Err(PreviewError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(PreviewError::FileNotFound(_))));
    }
}
