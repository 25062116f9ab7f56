use tracing::debug;

use crate::fetch::fetch_bytes;
use crate::{PreviewContext, PreviewError, Result};

impl PreviewContext {
    /// Returns the bytes behind [`image_url`](Self::image_url), fetching them
    /// at most once.
    ///
    /// After the first successful fetch the bytes are served from the
    /// context without any network access, even if the image URL has been
    /// changed in between. A failed fetch leaves the cache empty and the
    /// other preview fields untouched.
    ///
    /// # Errors
    ///
    /// - [`PreviewError::ImageNotFound`] if no image URL is set; nothing is
    ///   requested.
    /// - [`PreviewError::InvalidUrl`] if the image URL is not absolute.
    /// - [`PreviewError::NetworkError`] on transport failures.
    pub async fn image_bytes(&mut self) -> Result<&[u8]> {
        if self.image_bytes.is_none() {
            if self.image_url().trim().is_empty() {
                return Err(PreviewError::ImageNotFound);
            }

            let url = self.image_url().to_string();
            let config = self.fetch_config().clone();
            let bytes = fetch_bytes(&url, &config).await?;
            self.image_bytes = Some(bytes);
        } else {
            debug!(url = %self.image_url(), "serving image bytes from cache");
        }

        Ok(self.image_bytes.as_deref().unwrap_or_default())
    }
}
