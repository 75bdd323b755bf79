//! Workbook writer options.

use crate::error::{Error, Result};

/// Default header background colour (RGB hex).
pub const DEFAULT_HEADER_BG_COLOR: &str = "366092";

/// Default header text colour (RGB hex).
pub const DEFAULT_HEADER_FONT_COLOR: &str = "FFFFFF";

/// Default maximum column width in characters.
pub const DEFAULT_MAX_COLUMN_WIDTH: f64 = 50.0;

/// Minimum column width in characters.
pub const MIN_COLUMN_WIDTH: f64 = 8.0;

/// Default name of the summary sheet.
pub const DEFAULT_SUMMARY_SHEET: &str = "Summary";

/// Options for writing the workbook.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Header fill colour, six hex digits without `#`
    pub header_bg_color: String,

    /// Header text colour, six hex digits without `#`
    pub header_font_color: String,

    /// Upper bound for column widths
    pub max_column_width: f64,

    /// Name of the summary sheet
    pub summary_sheet_name: String,
}

impl WriterOptions {
    /// Create new writer options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set header colours. Accepts an optional leading `#`.
    pub fn with_header_colors(mut self, background: &str, font: &str) -> Result<Self> {
        self.header_bg_color = normalize_color(background)?;
        self.header_font_color = normalize_color(font)?;
        Ok(self)
    }

    /// Set maximum column width.
    pub fn with_max_column_width(mut self, width: f64) -> Self {
        self.max_column_width = width;
        self
    }

    /// Set summary sheet name.
    pub fn with_summary_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.summary_sheet_name = name.into();
        self
    }

    /// Clamp a content width to the configured bounds.
    pub(crate) fn clamp_width(&self, width: f64) -> f64 {
        width.max(MIN_COLUMN_WIDTH).min(self.max_column_width.max(MIN_COLUMN_WIDTH))
    }
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            header_bg_color: DEFAULT_HEADER_BG_COLOR.to_string(),
            header_font_color: DEFAULT_HEADER_FONT_COLOR.to_string(),
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            summary_sheet_name: DEFAULT_SUMMARY_SHEET.to_string(),
        }
    }
}

/// Normalize an RGB hex colour: strip `#`, require six hex digits, uppercase.
///
/// # Example
///
/// ```
/// use undocx::writer::normalize_color;
///
/// assert_eq!(normalize_color("#366092").unwrap(), "366092");
/// assert!(normalize_color("blue").is_err());
/// ```
pub fn normalize_color(value: &str) -> Result<String> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Configuration(format!(
            "invalid colour '{}': expected six hex digits",
            value
        )));
    }
    Ok(hex.to_ascii_uppercase())
}
