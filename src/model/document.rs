//! Document-level types.

use std::collections::BTreeMap;

use super::DocumentSection;
use crate::text::Script;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Share of sections that must come from heading styles for a document to
/// count as properly styled.
const HEADING_STYLE_RATIO: f64 = 0.8;

/// A processed Word document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Sequential id assigned at aggregation time (0 until assigned)
    pub id: u32,

    /// File name including extension
    pub file_name: String,

    /// Name of the folder containing the file
    pub parent_folder: String,

    /// Best-effort document title
    pub title: String,

    /// Total words across all paragraphs
    pub word_count: usize,

    /// Distinct images referenced from the main document part
    pub image_count: usize,

    /// Images left after collapsing SVG renditions with a raster fallback
    pub unique_image_count: usize,

    /// Body paragraphs recognised as figure, image or table captions
    pub caption_count: usize,

    /// Script of the document text
    pub script: Script,

    /// Package core properties (docProps/core.xml)
    pub properties: CoreProperties,

    /// Detected sections in document order
    pub sections: Vec<DocumentSection>,
}

impl Document {
    /// Create an empty document for the given file name.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            file_name: file_name.into(),
            parent_folder: String::new(),
            title: String::new(),
            word_count: 0,
            image_count: 0,
            unique_image_count: 0,
            caption_count: 0,
            script: Script::Unknown,
            properties: CoreProperties::default(),
            sections: Vec::new(),
        }
    }

    /// File name without its extension.
    pub fn file_stem(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(idx) if idx > 0 => &self.file_name[..idx],
            _ => &self.file_name,
        }
    }

    /// Number of detected sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Check if the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether most headings were found through heading styles rather than
    /// bold/large formatting.
    ///
    /// A document without sections is considered compliant.
    pub fn uses_heading_styles(&self) -> bool {
        if self.sections.is_empty() {
            return true;
        }
        let styled = self
            .sections
            .iter()
            .filter(|s| s.detected_by == HeadingSource::Style)
            .count();
        styled as f64 / self.sections.len() as f64 >= HEADING_STYLE_RATIO
    }

    /// Number of sections per heading style, sorted by style name.
    ///
    /// Headings found through formatting alone count under `Normal`.
    pub fn style_summary(&self) -> BTreeMap<&str, usize> {
        let mut summary = BTreeMap::new();
        for section in &self.sections {
            let style = section.style_name.as_deref().unwrap_or("Normal");
            *summary.entry(style).or_insert(0) += 1;
        }
        summary
    }

    /// Author from the core properties, if any.
    pub fn author(&self) -> Option<&str> {
        self.properties.author.as_deref()
    }
}

/// Assign sequential 1-based ids in slice order.
pub fn assign_ids(documents: &mut [Document]) {
    for (idx, doc) in documents.iter_mut().enumerate() {
        doc.id = idx as u32 + 1;
    }
}

/// How a section heading was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingSource {
    /// Paragraph style name matched a heading style
    Style,
    /// Bold text at or above the heading font size
    Formatting,
}

impl HeadingSource {
    /// Label used in the workbook.
    pub fn label(&self) -> &'static str {
        match self {
            HeadingSource::Style => "Style",
            HeadingSource::Formatting => "Formatting",
        }
    }
}

/// Document core properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreProperties {
    /// Document title
    pub title: Option<String>,

    /// Document author (dc:creator)
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl CoreProperties {
    /// Trimmed title, or `None` when absent or blank.
    pub fn non_empty_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
