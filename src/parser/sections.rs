//! Heading detection and section grouping.

use regex::Regex;

use super::formatting::ParagraphFormatting;
use super::options::ProcessOptions;
use crate::model::{DocumentSection, HeadingSource};
use crate::text::{clean_text, truncate, word_count};

/// Decides whether a paragraph starts a new section.
///
/// A paragraph is a heading when its style name starts with one of the
/// configured prefixes, or when it is bold and at least the configured
/// font size. Style matches take precedence.
///
/// It also recognises figure and table captions ("Figure 3", "[Table 2]",
/// "الشكل (1)"). Captions are counted separately and do not change whether a
/// paragraph is a heading.
#[derive(Debug, Clone)]
pub struct HeadingDetector {
    style_pattern: Option<Regex>,
    caption_pattern: Option<Regex>,
    min_font_size: f32,
}

/// Caption labels, English and Arabic, followed by a number.
const CAPTION_PATTERN: &str = concat!(
    r"(?i)^(?:",
    r"\[(?:figure|table|image|الشكل|الصورة|الجدول)\s*\d+\]",
    r"|(?:الشكل|الصورة|الجدول)\s*\(\d+\)",
    r"|(?:figure|table|image|شكل|صورة|جدول)\s*\d+",
    r")"
);

impl HeadingDetector {
    /// Build a detector from processing options.
    pub fn new(options: &ProcessOptions) -> Self {
        Self {
            style_pattern: style_pattern(&options.heading_style_prefixes),
            caption_pattern: compile(CAPTION_PATTERN, "Caption detection"),
            min_font_size: options.heading_min_font_size,
        }
    }

    /// Classify a paragraph. Returns `None` for body text.
    pub fn classify<P: ParagraphFormatting + ?Sized>(&self, paragraph: &P) -> Option<HeadingSource> {
        if paragraph.text().trim().is_empty() {
            return None;
        }

        if self.matches_style(paragraph.style_name()) {
            return Some(HeadingSource::Style);
        }

        let large_enough = paragraph
            .resolved_font_size()
            .is_some_and(|size| size >= self.min_font_size);
        if paragraph.is_bold() && large_enough {
            return Some(HeadingSource::Formatting);
        }

        None
    }

    /// Whether `text` is a figure, image or table caption.
    pub fn is_caption(&self, text: &str) -> bool {
        self.caption_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(text.trim()))
    }

    fn matches_style(&self, style_name: Option<&str>) -> bool {
        match (&self.style_pattern, style_name) {
            (Some(pattern), Some(name)) => pattern.is_match(name.trim()),
            _ => false,
        }
    }
}

impl Default for HeadingDetector {
    fn default() -> Self {
        Self::new(&ProcessOptions::default())
    }
}

fn style_pattern(prefixes: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = prefixes
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return None;
    }

    let pattern = format!("(?i)^(?:{})", alternatives.join("|"));
    compile(&pattern, "Heading style matching")
}

fn compile(pattern: &str, what: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("{} disabled: {}", what, e);
            None
        }
    }
}

/// Section grouping state.
#[derive(Debug)]
enum SectionState {
    /// No heading seen yet; body text is preamble and is not attached
    NoOpenSection,
    /// Body text accumulates under the open heading
    SectionOpen {
        section: DocumentSection,
        body: Vec<String>,
    },
}

/// Groups paragraphs into sections.
///
/// Feed headings with [`open`](Self::open) and body paragraphs with
/// [`append`](Self::append) in document order, then call
/// [`finish`](Self::finish).
#[derive(Debug)]
pub struct SectionBuilder {
    state: SectionState,
    sections: Vec<DocumentSection>,
    max_preview_length: usize,
}

impl SectionBuilder {
    /// Create a builder keeping previews of at most `max_preview_length` characters.
    pub fn new(max_preview_length: usize) -> Self {
        Self {
            state: SectionState::NoOpenSection,
            sections: Vec::new(),
            max_preview_length,
        }
    }

    /// Close the open section, if any, and start a new one.
    pub fn open(&mut self, section: DocumentSection) {
        self.close();
        log::debug!(
            "Section '{}' detected by {}",
            section.heading_text,
            section.detected_by.label()
        );
        self.state = SectionState::SectionOpen {
            section,
            body: Vec::new(),
        };
    }

    /// Append a body paragraph to the open section.
    ///
    /// Blank paragraphs and preamble text are dropped.
    pub fn append(&mut self, text: &str) {
        if let SectionState::SectionOpen { body, .. } = &mut self.state {
            let cleaned = clean_text(text);
            if !cleaned.is_empty() {
                body.push(cleaned);
            }
        }
    }

    /// Check whether a section is currently open.
    pub fn has_open_section(&self) -> bool {
        matches!(self.state, SectionState::SectionOpen { .. })
    }

    /// Close the last section and return all sections in order.
    pub fn finish(mut self) -> Vec<DocumentSection> {
        self.close();
        self.sections
    }

    fn close(&mut self) {
        if let SectionState::SectionOpen { mut section, body } =
            std::mem::replace(&mut self.state, SectionState::NoOpenSection)
        {
            let text = body.join(" ");
            section.body_word_count = word_count(&text);
            section.text_preview = truncate(&text, self.max_preview_length);
            self.sections.push(section);
        }
    }
}

/// Build a section from a heading paragraph.
pub fn heading_section<P: ParagraphFormatting + ?Sized>(
    paragraph: &P,
    source: HeadingSource,
) -> DocumentSection {
    let mut section = DocumentSection::new(clean_text(paragraph.text()), source);
    section.style_name = paragraph.style_name().map(str::to_string);
    section.font_name = paragraph.resolved_font_name().map(str::to_string);
    section.font_size = paragraph.resolved_font_size();
    section
}
