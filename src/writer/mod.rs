//! XLSX workbook output.

mod naming;
mod options;
mod sheet;
mod styles;
mod workbook;

pub use naming::{sanitize_sheet_name, SheetNamer, MAX_SHEET_NAME_LEN};
pub use options::{
    normalize_color, WriterOptions, DEFAULT_HEADER_BG_COLOR, DEFAULT_HEADER_FONT_COLOR,
    DEFAULT_MAX_COLUMN_WIDTH, DEFAULT_SUMMARY_SHEET, MIN_COLUMN_WIDTH,
};
pub use sheet::{Cell, CellValue, Worksheet};
pub use styles::{styles_xml, CellStyle};
pub use workbook::{SpreadsheetWriter, SECTION_COLUMNS, SUMMARY_COLUMNS};

/// Escape XML special characters and drop characters XML 1.0 cannot carry.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c.is_control() || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}
