use crate::context::LinkPreview;
use crate::{PreviewError, Result};

/// Convert a preview to JSON (`title`, `description`, `image`, `website`)
pub fn preview_to_json(preview: &LinkPreview, pretty: bool) -> Result<String> {
    let rendered = if pretty { serde_json::to_string_pretty(preview) } else { serde_json::to_string(preview) };
    rendered.map_err(|e| PreviewError::ParseError(e.to_string()))
}

/// JSON formatter with configurable pretty printing
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn format_preview(&self, preview: &LinkPreview) -> Result<String> {
        preview_to_json(preview, self.pretty)
    }
}
