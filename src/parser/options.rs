//! Processing options and configuration.

/// Default number of characters kept in a section preview.
pub const DEFAULT_PREVIEW_LENGTH: usize = 200;

/// Default minimum font size (points) for the bold-text heading heuristic.
pub const DEFAULT_HEADING_MIN_FONT_SIZE: f32 = 14.0;

/// Options for processing Word documents.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Maximum characters kept in each section preview
    pub max_preview_length: usize,

    /// Minimum resolved font size for bold paragraphs to count as headings
    pub heading_min_font_size: f32,

    /// Style name prefixes recognised as headings (case-insensitive)
    pub heading_style_prefixes: Vec<String>,

    /// What to do with documents that have no paragraphs
    pub empty_document: EmptyDocumentPolicy,

    /// Whether paragraphs inside tables count towards the word total
    pub count_table_words: bool,
}

impl ProcessOptions {
    /// Create new process options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set preview length.
    pub fn with_preview_length(mut self, length: usize) -> Self {
        self.max_preview_length = length;
        self
    }

    /// Set heading font-size threshold in points.
    pub fn with_heading_min_font_size(mut self, size: f32) -> Self {
        self.heading_min_font_size = size;
        self
    }

    /// Replace the recognised heading style prefixes.
    pub fn with_heading_styles<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.heading_style_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Set empty document policy.
    pub fn with_empty_document_policy(mut self, policy: EmptyDocumentPolicy) -> Self {
        self.empty_document = policy;
        self
    }

    /// Reject documents without paragraphs.
    pub fn reject_empty(mut self) -> Self {
        self.empty_document = EmptyDocumentPolicy::Reject;
        self
    }

    /// Enable or disable counting words inside tables.
    pub fn with_table_words(mut self, count: bool) -> Self {
        self.count_table_words = count;
        self
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            max_preview_length: DEFAULT_PREVIEW_LENGTH,
            heading_min_font_size: DEFAULT_HEADING_MIN_FONT_SIZE,
            heading_style_prefixes: vec!["Heading".to_string()],
            empty_document: EmptyDocumentPolicy::Accept,
            count_table_words: true,
        }
    }
}

/// Handling of documents that contain no paragraphs at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyDocumentPolicy {
    /// Return a document with zero counts
    #[default]
    Accept,
    /// Return a document with zero counts and log a warning
    Warn,
    /// Fail with `Error::EmptyDocument`
    Reject,
}

impl std::str::FromStr for EmptyDocumentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accept" => Ok(EmptyDocumentPolicy::Accept),
            "warn" => Ok(EmptyDocumentPolicy::Warn),
            "reject" => Ok(EmptyDocumentPolicy::Reject),
            other => Err(format!("unknown empty document policy: {}", other)),
        }
    }
}
