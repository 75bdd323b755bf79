//! Text helpers shared by the processor and the writer.
//!
//! Everything here is pure and total: empty input yields empty output and no
//! function can fail.

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Writing system classification of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    /// Only Arabic letters were found
    Arabic,
    /// Only Latin letters were found
    Latin,
    /// Both Arabic and Latin letters were found
    Mixed,
    /// No Arabic or Latin letters at all
    #[default]
    Unknown,
}

impl Script {
    /// Human readable label used in the workbook.
    pub fn label(&self) -> &'static str {
        match self {
            Script::Arabic => "Arabic",
            Script::Latin => "Latin",
            Script::Mixed => "Mixed",
            Script::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalize text to NFC, collapse whitespace runs to single spaces and trim.
///
/// Control characters are treated as whitespace.
///
/// # Example
///
/// ```
/// use undocx::text::clean_text;
///
/// assert_eq!(clean_text("  Hello\t\n  world \u{0007}"), "Hello world");
/// ```
pub fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.nfc() {
        if c.is_whitespace() || c.is_control() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }

    out
}

/// Keep at most `max_len` characters of `text`.
///
/// This is a plain character slice with no ellipsis, so
/// `truncate(&truncate(x, n), n) == truncate(x, n)`.
pub fn truncate(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Count whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Check whether a character belongs to one of the Arabic Unicode blocks.
pub fn is_arabic_char(c: char) -> bool {
    matches!(
        c,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}'
    )
}

/// Check whether a character is a Latin letter.
fn is_latin_letter(c: char) -> bool {
    c.is_alphabetic()
        && matches!(
            c,
            'A'..='Z'
                | 'a'..='z'
                | '\u{00C0}'..='\u{024F}'
                | '\u{1E00}'..='\u{1EFF}'
        )
}

/// Classify text by counting Arabic and Latin letters.
///
/// # Example
///
/// ```
/// use undocx::text::{detect_script, Script};
///
/// assert_eq!(detect_script("Annual report"), Script::Latin);
/// assert_eq!(detect_script("تقرير سنوي"), Script::Arabic);
/// assert_eq!(detect_script("2024 - 42"), Script::Unknown);
/// ```
pub fn detect_script(text: &str) -> Script {
    let mut arabic = 0usize;
    let mut latin = 0usize;

    for c in text.chars() {
        if is_arabic_char(c) && c.is_alphabetic() {
            arabic += 1;
        } else if is_latin_letter(c) {
            latin += 1;
        }
    }

    match (arabic > 0, latin > 0) {
        (true, true) => Script::Mixed,
        (true, false) => Script::Arabic,
        (false, true) => Script::Latin,
        (false, false) => Script::Unknown,
    }
}
