use crate::Result;
use crate::context::LinkPreview;

/// Convert a preview to TOML, omitting empty fields
///
/// Manual TOML serialization to avoid adding the toml crate dependency
pub fn preview_to_toml(preview: &LinkPreview) -> Result<String> {
    let mut toml = String::new();

    let fields = [
        ("title", &preview.title),
        ("description", &preview.description),
        ("image", &preview.image),
        ("website", &preview.website),
    ];

    for (key, value) in fields {
        if !value.is_empty() {
            toml.push_str(&format!("{} = {}\n", key, toml_escape_string(value)));
        }
    }

    Ok(toml)
}

/// Escape a string for TOML format
fn toml_escape_string(s: &str) -> String {
    let needs_escape = s.contains('"') || s.contains('\\') || s.contains('\n');
    if needs_escape {
        format!(
            "\"{}\"",
            s.replace('\\', "\\\\").replace('\"', "\\\"").replace('\n', "\\n")
        )
    } else {
        format!("\"{}\"", s)
    }
}

/// TOML formatter for preview output
pub struct TomlFormatter;

impl TomlFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_preview(&self, preview: &LinkPreview) -> Result<String> {
        preview_to_toml(preview)
    }
}

impl Default for TomlFormatter {
    fn default() -> Self {
        Self::new()
    }
}
