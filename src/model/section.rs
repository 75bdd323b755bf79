//! Section-level types.

use super::HeadingSource;
use serde::{Deserialize, Serialize};

/// A detected heading together with a preview of its body text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    /// Cleaned heading text (never empty)
    pub heading_text: String,

    /// Display name of the heading paragraph style
    pub style_name: Option<String>,

    /// Resolved font name
    pub font_name: Option<String>,

    /// Resolved font size in points
    pub font_size: Option<f32>,

    /// How the heading was recognised
    pub detected_by: HeadingSource,

    /// Words in the full body text
    pub body_word_count: usize,

    /// Cleaned, truncated body text
    pub text_preview: String,
}

impl DocumentSection {
    /// Create a section with no font information and an empty body.
    pub fn new(heading_text: impl Into<String>, detected_by: HeadingSource) -> Self {
        Self {
            heading_text: heading_text.into(),
            style_name: None,
            font_name: None,
            font_size: None,
            detected_by,
            body_word_count: 0,
            text_preview: String::new(),
        }
    }

    /// Set the font name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Set the font size in points.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the style name.
    pub fn with_style_name(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }

    /// Set the preview text.
    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.text_preview = preview.into();
        self
    }

    /// Font name or `"N/A"`.
    pub fn font_name_label(&self) -> &str {
        self.font_name.as_deref().unwrap_or("N/A")
    }

    /// Check whether the section has body text.
    pub fn has_body(&self) -> bool {
        !self.text_preview.is_empty()
    }
}
