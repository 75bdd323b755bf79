//! Worksheet model and `xl/worksheets/sheetN.xml` generation.

use std::fmt::Write as FmtWrite;

use super::escape_xml;
use super::options::WriterOptions;
use super::styles::CellStyle;
use crate::error::Result;

/// Maximum characters Excel accepts in a single cell.
const MAX_CELL_CHARS: usize = 32_767;

/// A cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Nothing is written for the cell
    Empty,
    /// Inline string
    Text(String),
    /// Numeric value
    Number(f64),
}

impl CellValue {
    /// Displayed width of the value in characters.
    fn display_len(&self) -> usize {
        match self {
            CellValue::Empty => 0,
            CellValue::Text(s) => s.chars().count().min(MAX_CELL_CHARS),
            CellValue::Number(n) => n.to_string().len(),
        }
    }

    /// Text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content, if this is a number cell.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<usize> for CellValue {
    fn from(n: usize) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// A styled cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Cell value
    pub value: CellValue,
    /// Cell format
    pub style: CellStyle,
}

impl Cell {
    /// Create a cell with the default format.
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            style: CellStyle::Default,
        }
    }

    /// Create a cell with the given format.
    pub fn styled(value: impl Into<CellValue>, style: CellStyle) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }
}

/// A worksheet held in memory until the workbook is written.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Worksheet {
    /// Create an empty worksheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Sheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a row.
    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    /// Append a row of header cells.
    pub fn push_header<I, S>(&mut self, titles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells = titles
            .into_iter()
            .map(|t| Cell::styled(t.into(), CellStyle::Header))
            .collect();
        self.rows.push(cells);
    }

    /// Append an empty row.
    pub fn push_blank_row(&mut self) {
        self.rows.push(Vec::new());
    }

    /// Number of rows, blank rows included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows in order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at a 0-based position.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Column widths: widest cell + 2, clamped to the configured bounds.
    pub fn column_widths(&self, options: &WriterOptions) -> Vec<f64> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for row in &self.rows {
            for (col, cell) in row.iter().enumerate() {
                widths[col] = widths[col].max(cell.value.display_len());
            }
        }
        widths
            .into_iter()
            .map(|w| options.clamp_width((w + 2) as f64))
            .collect()
    }

    /// Generate the worksheet XML.
    pub fn to_xml(&self, options: &WriterOptions, selected: bool) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        let widths = self.column_widths(options);
        match (self.rows.is_empty(), widths.len()) {
            (false, cols) if cols > 0 => write!(
                xml,
                r#"<dimension ref="A1:{}{}"/>"#,
                column_to_letters(cols as u32),
                self.rows.len()
            )?,
            _ => xml.push_str(r#"<dimension ref="A1"/>"#),
        }

        xml.push_str(r#"<sheetViews><sheetView workbookViewId="0""#);
        if selected {
            xml.push_str(r#" tabSelected="1""#);
        }
        xml.push_str("/></sheetViews>");
        xml.push_str(r#"<sheetFormatPr defaultRowHeight="15"/>"#);

        if !widths.is_empty() {
            xml.push_str("<cols>");
            for (col, width) in widths.iter().enumerate() {
                write!(
                    xml,
                    r#"<col min="{}" max="{}" width="{}" customWidth="1"/>"#,
                    col + 1,
                    col + 1,
                    width
                )?;
            }
            xml.push_str("</cols>");
        }

        xml.push_str("<sheetData>");
        for (row_idx, row) in self.rows.iter().enumerate() {
            let row_num = row_idx + 1;
            if row.iter().all(|c| c.value == CellValue::Empty) {
                continue;
            }
            write!(xml, r#"<row r="{}">"#, row_num)?;
            for (col_idx, cell) in row.iter().enumerate() {
                let cell_ref = format!("{}{}", column_to_letters(col_idx as u32 + 1), row_num);
                write_cell(&mut xml, &cell_ref, cell)?;
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData>");

        xml.push_str(
            r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#,
        );
        xml.push_str("</worksheet>");

        Ok(xml)
    }
}

fn write_cell(xml: &mut String, cell_ref: &str, cell: &Cell) -> Result<()> {
    let style_attr = match cell.style {
        CellStyle::Default => String::new(),
        style => format!(r#" s="{}""#, style.index()),
    };

    match &cell.value {
        CellValue::Empty => {
            if cell.style != CellStyle::Default {
                write!(xml, r#"<c r="{}"{}/>"#, cell_ref, style_attr)?;
            }
        }
        CellValue::Number(n) if n.is_finite() => {
            write!(xml, r#"<c r="{}"{}><v>{}</v></c>"#, cell_ref, style_attr, n)?;
        }
        CellValue::Number(_) => {
            write!(xml, r#"<c r="{}"{}/>"#, cell_ref, style_attr)?;
        }
        CellValue::Text(text) => {
            let text = clip(text);
            let space = if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
                r#" xml:space="preserve""#
            } else {
                ""
            };
            write!(
                xml,
                r#"<c r="{}"{} t="inlineStr"><is><t{}>{}</t></is></c>"#,
                cell_ref,
                style_attr,
                space,
                escape_xml(text)
            )?;
        }
    }
    Ok(())
}

fn clip(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Convert a 1-based column number to letters (1 → A, 27 → AA).
pub(crate) fn column_to_letters(col: u32) -> String {
    let mut letters = String::new();
    let mut col = col;

    while col > 0 {
        col -= 1;
        let letter = ((col % 26) as u8 + b'A') as char;
        letters.insert(0, letter);
        col /= 26;
    }

    letters
}
