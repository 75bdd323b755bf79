//! XLSX package assembly.

use std::fmt::Write as FmtWrite;
use std::io::{Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::escape_xml;
use super::naming::SheetNamer;
use super::options::WriterOptions;
use super::sheet::{Cell, CellValue, Worksheet};
use super::styles::{styles_xml, CellStyle};
use crate::error::{Error, Result};
use crate::model::{Document, DocumentSection};

/// Summary sheet header.
pub const SUMMARY_COLUMNS: [&str; 12] = [
    "ID",
    "Document Name",
    "Document Title",
    "Word Count",
    "Image Count",
    "Unique Images",
    "Sections",
    "Captions",
    "Script",
    "Uses Heading Styles",
    "Parent Folder",
    "Author",
];

/// Section table header on document sheets.
pub const SECTION_COLUMNS: [&str; 7] = [
    "Section Heading",
    "Font Name",
    "Font Size",
    "Text Preview",
    "Style",
    "Detected By",
    "Body Words",
];

const NOT_AVAILABLE: &str = "N/A";

const APPLICATION: &str = "undocx";

/// Writes processed documents into an XLSX workbook.
///
/// The first sheet summarises every document; each document then gets a
/// sheet of its own with a metadata block and its section table.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetWriter {
    options: WriterOptions,
}

impl SpreadsheetWriter {
    /// Create a writer with the given options.
    pub fn new(options: WriterOptions) -> Self {
        Self { options }
    }

    /// Writer options in use.
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Write the workbook to `path`.
    ///
    /// The package is assembled in a temporary file next to the target and
    /// renamed over it once complete, so a failed write leaves any existing
    /// file untouched.
    pub fn write<P: AsRef<Path>>(&self, documents: &[Document], path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::output(path, e))?;
        self.write_to(documents, &mut tmp)
            .map_err(|e| Error::output(path, e))?;
        tmp.as_file().sync_all().map_err(|e| Error::output(path, e))?;
        tmp.persist(path).map_err(|e| Error::output(path, e.error))?;

        log::info!(
            "Wrote {} ({} documents)",
            path.display(),
            documents.len()
        );
        Ok(())
    }

    /// Write the workbook into any seekable writer.
    pub fn write_to<W: Write + Seek>(&self, documents: &[Document], writer: W) -> Result<W> {
        let sheets = self.build_sheets(documents);

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());
        let mut zip = ZipWriter::new(writer);

        let mut add = |name: &str, content: &str| -> Result<()> {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
            Ok(())
        };

        add("[Content_Types].xml", &content_types_xml(sheets.len())?)?;
        add("_rels/.rels", ROOT_RELS_XML)?;
        add("docProps/core.xml", CORE_XML)?;
        add("docProps/app.xml", &app_xml(&sheets)?)?;
        add("xl/workbook.xml", &workbook_xml(&sheets)?)?;
        add("xl/_rels/workbook.xml.rels", &workbook_rels_xml(sheets.len())?)?;
        add("xl/styles.xml", &styles_xml(&self.options)?)?;
        for (idx, sheet) in sheets.iter().enumerate() {
            let name = format!("xl/worksheets/sheet{}.xml", idx + 1);
            add(&name, &sheet.to_xml(&self.options, idx == 0)?)?;
        }

        Ok(zip.finish()?)
    }

    /// Build the summary sheet followed by one sheet per document.
    pub fn build_sheets(&self, documents: &[Document]) -> Vec<Worksheet> {
        let mut namer = SheetNamer::new();
        let mut sheets = Vec::with_capacity(documents.len() + 1);

        let summary_name = namer.unique(&self.options.summary_sheet_name);
        sheets.push(self.summary_sheet(summary_name, documents));

        for document in documents {
            let name = namer.unique(document.file_stem());
            sheets.push(self.document_sheet(name, document));
        }

        sheets
    }

    /// Summary sheet with one row per document.
    pub fn summary_sheet(&self, name: impl Into<String>, documents: &[Document]) -> Worksheet {
        let mut sheet = Worksheet::new(name);
        sheet.push_header(SUMMARY_COLUMNS);

        for document in documents {
            sheet.push_row(vec![
                Cell::new(document.id),
                Cell::new(document.file_name.as_str()),
                Cell::new(document.title.as_str()),
                Cell::new(document.word_count),
                Cell::new(document.image_count),
                Cell::new(document.unique_image_count),
                Cell::new(document.section_count()),
                Cell::new(document.caption_count),
                Cell::new(document.script.label()),
                Cell::new(yes_no(document.uses_heading_styles())),
                Cell::new(document.parent_folder.as_str()),
                Cell::new(document.author().unwrap_or_default()),
            ]);
        }

        sheet
    }

    /// Detail sheet of one document.
    pub fn document_sheet(&self, name: impl Into<String>, document: &Document) -> Worksheet {
        let mut sheet = Worksheet::new(name);

        let metadata: [(&str, CellValue); 7] = [
            ("ID", document.id.into()),
            ("Document Name", document.file_name.as_str().into()),
            ("Document Title", document.title.as_str().into()),
            ("Author", document.author().unwrap_or(NOT_AVAILABLE).into()),
            ("Script", document.script.label().into()),
            ("Word Count", document.word_count.into()),
            ("Image Count", document.image_count.into()),
        ];
        for (label, value) in metadata {
            sheet.push_row(vec![
                Cell::styled(label, CellStyle::Label),
                Cell::new(value),
            ]);
        }

        sheet.push_blank_row();
        sheet.push_header(SECTION_COLUMNS);
        for section in &document.sections {
            sheet.push_row(section_row(section));
        }

        sheet
    }
}

fn section_row(section: &DocumentSection) -> Vec<Cell> {
    let font_size = match section.font_size {
        Some(size) => Cell::new(size),
        None => Cell::new(NOT_AVAILABLE),
    };
    vec![
        Cell::new(section.heading_text.as_str()),
        Cell::new(section.font_name_label()),
        font_size,
        Cell::new(section.text_preview.as_str()),
        Cell::new(section.style_name.as_deref().unwrap_or_default()),
        Cell::new(section.detected_by.label()),
        Cell::new(section.body_word_count),
    ]
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
    r#"</Relationships>"#
);

// No timestamps: identical input gives identical bytes.
const CORE_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    r#"<dc:title>Document Analysis</dc:title>"#,
    r#"<dc:creator>undocx</dc:creator>"#,
    r#"</cp:coreProperties>"#
);

fn content_types_xml(sheet_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    for idx in 1..=sheet_count {
        write!(
            xml,
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            idx
        )?;
    }
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    xml.push_str("</Types>");
    Ok(xml)
}

fn app_xml(sheets: &[Worksheet]) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    write!(xml, "<Application>{}</Application>", APPLICATION)?;
    write!(
        xml,
        r#"<TitlesOfParts><vt:vector size="{}" baseType="lpstr">"#,
        sheets.len()
    )?;
    for sheet in sheets {
        write!(xml, "<vt:lpstr>{}</vt:lpstr>", escape_xml(sheet.name()))?;
    }
    xml.push_str("</vt:vector></TitlesOfParts>");
    xml.push_str("</Properties>");
    Ok(xml)
}

fn workbook_xml(sheets: &[Worksheet]) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
    );
    xml.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    xml.push_str(r#"<bookViews><workbookView activeTab="0"/></bookViews>"#);

    xml.push_str("<sheets>");
    for (idx, sheet) in sheets.iter().enumerate() {
        write!(
            xml,
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(sheet.name()),
            idx + 1,
            idx + 1
        )?;
    }
    xml.push_str("</sheets>");

    xml.push_str("</workbook>");
    Ok(xml)
}

fn workbook_rels_xml(sheet_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    for idx in 1..=sheet_count {
        write!(
            xml,
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            idx, idx
        )?;
    }
    write!(
        xml,
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        sheet_count + 1
    )?;
    xml.push_str("</Relationships>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingSource;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn sample_documents() -> Vec<Document> {
        let mut intro = Document::new("report.docx");
        intro.id = 1;
        intro.title = "Report A".to_string();
        intro.word_count = 120;
        intro.image_count = 2;
        intro.unique_image_count = 2;
        intro.caption_count = 3;
        intro.sections = vec![
            DocumentSection::new("Intro", HeadingSource::Formatting)
                .with_font_name("Calibri")
                .with_font_size(16.0)
                .with_preview("Hello world"),
            DocumentSection::new("Scope", HeadingSource::Style).with_style_name("Heading 1"),
        ];

        let mut other = Document::new("Report.docx");
        other.id = 2;
        other.title = "Report".to_string();

        vec![intro, other]
    }

    fn read_entry(data: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_build_sheets() {
        let writer = SpreadsheetWriter::default();
        let sheets = writer.build_sheets(&sample_documents());

        let names: Vec<&str> = sheets.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Summary", "report", "Report_2"]);
        assert_eq!(sheets[0].row_count(), 3);
    }

    #[test]
    fn test_summary_sheet() {
        let writer = SpreadsheetWriter::default();
        let sheet = writer.summary_sheet("Summary", &sample_documents());

        assert_eq!(sheet.cell(0, 0).unwrap().style, CellStyle::Header);
        assert_eq!(sheet.cell(0, 4).unwrap().value.as_text(), Some("Image Count"));
        assert_eq!(sheet.cell(1, 0).unwrap().value.as_number(), Some(1.0));
        assert_eq!(sheet.cell(1, 2).unwrap().value.as_text(), Some("Report A"));
        assert_eq!(sheet.cell(1, 4).unwrap().value.as_number(), Some(2.0));
        assert_eq!(sheet.cell(1, 6).unwrap().value.as_number(), Some(2.0));
        assert_eq!(sheet.cell(0, 7).unwrap().value.as_text(), Some("Captions"));
        assert_eq!(sheet.cell(1, 7).unwrap().value.as_number(), Some(3.0));
        assert_eq!(sheet.cell(2, 7).unwrap().value.as_number(), Some(0.0));
        assert_eq!(sheet.cell(1, 9).unwrap().value.as_text(), Some("No"));
        assert_eq!(sheet.cell(2, 9).unwrap().value.as_text(), Some("Yes"));
    }

    #[test]
    fn test_document_sheet() {
        let writer = SpreadsheetWriter::default();
        let docs = sample_documents();
        let sheet = writer.document_sheet("report", &docs[0]);

        assert_eq!(sheet.cell(0, 0).unwrap().style, CellStyle::Label);
        assert_eq!(sheet.cell(3, 1).unwrap().value.as_text(), Some("N/A"));
        assert_eq!(sheet.cell(6, 1).unwrap().value.as_number(), Some(2.0));
        assert!(sheet.rows()[7].is_empty());
        assert_eq!(sheet.cell(8, 0).unwrap().value.as_text(), Some("Section Heading"));

        assert_eq!(sheet.cell(9, 0).unwrap().value.as_text(), Some("Intro"));
        assert_eq!(sheet.cell(9, 2).unwrap().value.as_number(), Some(16.0));
        assert_eq!(sheet.cell(9, 5).unwrap().value.as_text(), Some("Formatting"));
        assert_eq!(sheet.cell(10, 1).unwrap().value.as_text(), Some("N/A"));
        assert_eq!(sheet.cell(10, 2).unwrap().value.as_text(), Some("N/A"));
        assert_eq!(sheet.cell(10, 4).unwrap().value.as_text(), Some("Heading 1"));
    }

    #[test]
    fn test_write_to_package() {
        let writer = SpreadsheetWriter::default();
        let cursor = writer
            .write_to(&sample_documents(), Cursor::new(Vec::new()))
            .unwrap();
        let data = cursor.into_inner();

        let workbook = read_entry(&data, "xl/workbook.xml");
        assert!(workbook.contains(r#"<sheet name="Summary" sheetId="1" r:id="rId1"/>"#));
        assert!(workbook.contains(r#"<sheet name="Report_2" sheetId="3" r:id="rId3"/>"#));

        let rels = read_entry(&data, "xl/_rels/workbook.xml.rels");
        assert!(rels.contains(r#"Id="rId4""#));
        assert!(rels.contains("styles.xml"));

        let types = read_entry(&data, "[Content_Types].xml");
        assert!(types.contains("/xl/worksheets/sheet3.xml"));

        let summary = read_entry(&data, "xl/worksheets/sheet1.xml");
        assert!(summary.contains("Report A"));
        assert!(!read_entry(&data, "docProps/core.xml").contains("dcterms:created"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let writer = SpreadsheetWriter::default();
        let docs = sample_documents();
        let first = writer.write_to(&docs, Cursor::new(Vec::new())).unwrap();
        let second = writer.write_to(&docs, Cursor::new(Vec::new())).unwrap();
        assert_eq!(first.into_inner(), second.into_inner());
    }

    #[test]
    fn test_empty_workbook_has_summary() {
        let writer = SpreadsheetWriter::default();
        let sheets = writer.build_sheets(&[]);
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].row_count(), 1);
    }
}
