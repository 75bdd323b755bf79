//! Run configuration.
//!
//! [`Config`] holds every tunable of a batch run. It is built by the caller
//! (the CLI maps its arguments onto it), validated once, and then split into
//! [`ProcessOptions`] and [`WriterOptions`].

use std::path::PathBuf;

use log::LevelFilter;

use crate::error::{Error, Result};
use crate::parser::{
    EmptyDocumentPolicy, ProcessOptions, DEFAULT_HEADING_MIN_FONT_SIZE, DEFAULT_PREVIEW_LENGTH,
};
use crate::writer::{
    normalize_color, WriterOptions, DEFAULT_HEADER_BG_COLOR, DEFAULT_HEADER_FONT_COLOR,
    DEFAULT_MAX_COLUMN_WIDTH,
};

/// Default output workbook path.
pub const DEFAULT_OUTPUT_FILE: &str = "document_analysis.xlsx";

/// Batch run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory searched recursively for `.docx` files
    pub input_dir: PathBuf,

    /// Workbook to create or replace
    pub output_file: PathBuf,

    /// Maximum characters kept in each section preview
    pub max_preview_length: usize,

    /// Minimum font size (points) for bold paragraphs to count as headings
    pub heading_min_font_size: f32,

    /// Header fill colour, RGB hex with optional `#`
    pub header_bg_color: String,

    /// Header text colour, RGB hex with optional `#`
    pub header_font_color: String,

    /// Upper bound for column widths
    pub max_column_width: f64,

    /// Handling of documents without paragraphs
    pub empty_document_policy: EmptyDocumentPolicy,

    /// Log level the CLI installs
    pub log_level: LevelFilter,
}

impl Config {
    /// Create a configuration with defaults for the given input directory.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Self::default()
        }
    }

    /// Set output file.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    /// Set preview length.
    pub fn with_preview_length(mut self, length: usize) -> Self {
        self.max_preview_length = length;
        self
    }

    /// Set heading font-size threshold.
    pub fn with_heading_min_font_size(mut self, size: f32) -> Self {
        self.heading_min_font_size = size;
        self
    }

    /// Set header fill colour.
    pub fn with_header_color(mut self, color: impl Into<String>) -> Self {
        self.header_bg_color = color.into();
        self
    }

    /// Set empty document policy.
    pub fn with_empty_document_policy(mut self, policy: EmptyDocumentPolicy) -> Self {
        self.empty_document_policy = policy;
        self
    }

    /// Set log level.
    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// Check every value. Called before any document is processed.
    pub fn validate(&self) -> Result<()> {
        if self.max_preview_length == 0 {
            return Err(Error::Configuration(
                "preview length must be greater than zero".to_string(),
            ));
        }
        if !self.heading_min_font_size.is_finite() || self.heading_min_font_size <= 0.0 {
            return Err(Error::Configuration(format!(
                "heading font size must be a positive number, got {}",
                self.heading_min_font_size
            )));
        }
        if !self.max_column_width.is_finite() || self.max_column_width <= 0.0 {
            return Err(Error::Configuration(format!(
                "column width must be a positive number, got {}",
                self.max_column_width
            )));
        }
        normalize_color(&self.header_bg_color)?;
        normalize_color(&self.header_font_color)?;

        if !self.input_dir.is_dir() {
            return Err(Error::Configuration(format!(
                "input directory not found: {}",
                self.input_dir.display()
            )));
        }
        if self.output_file.as_os_str().is_empty() {
            return Err(Error::Configuration("output file is empty".to_string()));
        }

        Ok(())
    }

    /// Options for the document processor.
    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions::new()
            .with_preview_length(self.max_preview_length)
            .with_heading_min_font_size(self.heading_min_font_size)
            .with_empty_document_policy(self.empty_document_policy)
    }

    /// Options for the workbook writer.
    pub fn writer_options(&self) -> Result<WriterOptions> {
        Ok(WriterOptions::new()
            .with_header_colors(&self.header_bg_color, &self.header_font_color)?
            .with_max_column_width(self.max_column_width))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            max_preview_length: DEFAULT_PREVIEW_LENGTH,
            heading_min_font_size: DEFAULT_HEADING_MIN_FONT_SIZE,
            header_bg_color: DEFAULT_HEADER_BG_COLOR.to_string(),
            header_font_color: DEFAULT_HEADER_FONT_COLOR.to_string(),
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            empty_document_policy: EmptyDocumentPolicy::Accept,
            log_level: LevelFilter::Info,
        }
    }
}
