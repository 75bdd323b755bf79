//! Paragraph formatting as seen by heading detection.

use super::body::RawParagraph;
use super::styles::{RunProperties, StyleSheet};
use crate::text::{detect_script, Script};

/// Read-only view of the formatting of a paragraph.
///
/// Heading detection only depends on this trait, so it can run against any
/// source that can answer these questions.
pub trait ParagraphFormatting {
    /// Paragraph text.
    fn text(&self) -> &str;

    /// Display name of the paragraph style, if any.
    fn style_name(&self) -> Option<&str>;

    /// Whether the leading run is bold.
    fn is_bold(&self) -> bool;

    /// Effective font size of the leading run in points.
    fn resolved_font_size(&self) -> Option<f32>;

    /// Effective font name of the leading run.
    fn resolved_font_name(&self) -> Option<&str>;
}

/// A paragraph with its formatting resolved against a style sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParagraph {
    text: String,
    style_name: Option<String>,
    bold: bool,
    font_size: Option<f32>,
    font_name: Option<String>,
}

impl ResolvedParagraph {
    /// Create a paragraph with explicit formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set style name.
    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }

    /// Set bold.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set font size in points.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set font name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Resolve a raw paragraph.
    ///
    /// Formatting comes from the first run with visible text. Arabic text
    /// uses the complex-script properties (`w:bCs`, `w:szCs`, `w:rFonts/@w:cs`)
    /// when they are set.
    pub fn resolve(raw: &RawParagraph, styles: &StyleSheet) -> Self {
        let text = raw.text();
        let style_id = styles.paragraph_style_id(raw.style_id.as_deref());
        let style_name = style_id.map(|id| styles.display_name(id));

        let no_run = RunProperties::default();
        let direct = raw.first_run().map(|r| &r.props).unwrap_or(&no_run);
        let run = styles.effective_run(direct, raw.style_id.as_deref());

        let (bold, font_size, font_name) = if detect_script(&text) == Script::Arabic {
            (
                run.bold_cs.or(run.bold),
                run.size_cs_points(),
                run.fonts.complex(),
            )
        } else {
            (run.bold, run.size_points(), run.fonts.latin())
        };

        Self {
            text,
            style_name,
            bold: bold.unwrap_or(false),
            font_size,
            font_name: font_name.map(str::to_string),
        }
    }
}

impl ParagraphFormatting for ResolvedParagraph {
    fn text(&self) -> &str {
        &self.text
    }

    fn style_name(&self) -> Option<&str> {
        self.style_name.as_deref()
    }

    fn is_bold(&self) -> bool {
        self.bold
    }

    fn resolved_font_size(&self) -> Option<f32> {
        self.font_size
    }

    fn resolved_font_name(&self) -> Option<&str> {
        self.font_name.as_deref()
    }
}
