//! Stylesheet (`xl/styles.xml`) for the generated workbook.
//!
//! The workbook uses a fixed set of cell formats, so the stylesheet is
//! written directly rather than collected from the cells.

use std::fmt::Write as FmtWrite;

use super::escape_xml;
use super::options::WriterOptions;
use crate::error::Result;

/// Cell format applied to a cell. The discriminant is the `cellXfs` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    /// Workbook default
    #[default]
    Default = 0,
    /// Table header: bold coloured text on a solid fill, centred
    Header = 1,
    /// Bold metadata label
    Label = 2,
}

impl CellStyle {
    /// Index into `cellXfs`.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Generate the complete styles.xml content.
pub fn styles_xml(options: &WriterOptions) -> Result<String> {
    let mut xml = String::with_capacity(2048);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );

    // 0: default, 1: header, 2: bold label
    xml.push_str(r#"<fonts count="3">"#);
    xml.push_str(r#"<font><sz val="11"/><name val="Calibri"/><family val="2"/></font>"#);
    write!(
        xml,
        r#"<font><b/><sz val="11"/><color rgb="FF{}"/><name val="Calibri"/><family val="2"/></font>"#,
        escape_xml(&options.header_font_color)
    )?;
    xml.push_str(r#"<font><b/><sz val="11"/><name val="Calibri"/><family val="2"/></font>"#);
    xml.push_str("</fonts>");

    // Fills 0 and 1 are required by Excel
    xml.push_str(r#"<fills count="3">"#);
    xml.push_str(r#"<fill><patternFill patternType="none"/></fill>"#);
    xml.push_str(r#"<fill><patternFill patternType="gray125"/></fill>"#);
    write!(
        xml,
        r#"<fill><patternFill patternType="solid"><fgColor rgb="FF{}"/><bgColor indexed="64"/></patternFill></fill>"#,
        escape_xml(&options.header_bg_color)
    )?;
    xml.push_str("</fills>");

    xml.push_str(r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#);

    xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

    xml.push_str(r#"<cellXfs count="3">"#);
    xml.push_str(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#);
    xml.push_str(r#"<xf numFmtId="0" fontId="1" fillId="2" borderId="0" xfId="0" applyFont="1" applyFill="1" applyAlignment="1"><alignment horizontal="center" vertical="center"/></xf>"#);
    xml.push_str(r#"<xf numFmtId="0" fontId="2" fillId="0" borderId="0" xfId="0" applyFont="1"/>"#);
    xml.push_str("</cellXfs>");

    xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);

    xml.push_str("</styleSheet>");

    Ok(xml)
}
