//! Worksheet naming rules.
//!
//! Excel limits sheet names to 31 characters, forbids `\ / ? * [ ] :`,
//! forbids leading or trailing apostrophes and compares names
//! case-insensitively.

use std::collections::HashSet;

/// Maximum sheet name length in characters.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Name used when nothing usable is left after sanitizing.
const FALLBACK_SHEET_NAME: &str = "Document";

/// Name Excel reserves for its own use.
const RESERVED_SHEET_NAME: &str = "history";

const FORBIDDEN_CHARS: &[char] = &['\\', '/', '?', '*', '[', ']', ':'];

/// Make a string usable as a sheet name.
///
/// # Example
///
/// ```
/// use undocx::writer::sanitize_sheet_name;
///
/// assert_eq!(sanitize_sheet_name("Q1/Q2: plan"), "Q1_Q2_ plan");
/// assert_eq!(sanitize_sheet_name("''"), "Document");
/// ```
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if FORBIDDEN_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let truncated: String = replaced
        .trim()
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = truncated.trim_end().trim_end_matches('\'');

    if cleaned.is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Hands out unique sheet names.
#[derive(Debug, Clone)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    /// Create a namer with no names taken except the reserved one.
    pub fn new() -> Self {
        let mut used = HashSet::new();
        used.insert(RESERVED_SHEET_NAME.to_string());
        Self { used }
    }

    /// Sanitize `name` and make it unique among the names handed out so far.
    ///
    /// Collisions get `_2`, `_3`, ... appended, shortening the base so the
    /// result stays within the length limit.
    pub fn unique(&mut self, name: &str) -> String {
        let base = sanitize_sheet_name(name);
        if self.claim(&base) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!("_{}", n);
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            let stem: String = base.chars().take(keep).collect();
            let candidate = format!("{}{}", stem.trim_end_matches('\''), suffix);
            if self.claim(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn claim(&mut self, name: &str) -> bool {
        self.used.insert(name.to_lowercase())
    }
}

impl Default for SheetNamer {
    fn default() -> Self {
        Self::new()
    }
}
