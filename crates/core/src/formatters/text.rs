use crate::Result;
use crate::context::LinkPreview;

/// Convert a preview to readable plain text
///
/// The title is underlined; the remaining fields follow as labelled lines.
/// Empty fields are left out.
pub fn preview_to_text(preview: &LinkPreview) -> Result<String> {
    let mut output = String::new();

    if !preview.title.is_empty() {
        output.push_str(&preview.title);
        output.push('\n');
        output.push_str(&"=".repeat(preview.title.chars().count()));
        output.push('\n');
    }

    if !preview.description.is_empty() {
        output.push_str(&preview.description);
        output.push_str("\n\n");
    }

    if !preview.image.is_empty() {
        output.push_str(&format!("Image: {}\n", preview.image));
    }

    if !preview.website.is_empty() {
        output.push_str(&format!("Website: {}\n", preview.website));
    }

    Ok(output.trim_end().to_string())
}

/// Plain text formatter for previews
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_preview(&self, preview: &LinkPreview) -> Result<String> {
        preview_to_text(preview)
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_preview() {
        let preview = LinkPreview {
            title: "Rust".to_string(),
            description: "A language".to_string(),
            image: "https://example.com/r.png".to_string(),
            website: "https://example.com".to_string(),
        };

        let text = preview_to_text(&preview).unwrap();
        assert_eq!(
            text,
            "Rust\n====\nA language\n\nImage: https://example.com/r.png\nWebsite: https://example.com"
        );
    }

    #[test]
    fn test_underline_counts_characters() {
        let preview = LinkPreview { title: "异步".to_string(), ..Default::default() };
        assert_eq!(preview_to_text(&preview).unwrap(), "异步\n==");
    }

    #[test]
    fn test_website_only() {
        let preview = LinkPreview { website: "https://example.com".to_string(), ..Default::default() };
        assert_eq!(TextFormatter.format_preview(&preview).unwrap(), "Website: https://example.com");
    }
}
