//! In-memory `.docx` fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture" "#,
    r#"xmlns:asvg="http://schemas.microsoft.com/office/drawing/2016/SVG/main""#
);

const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Styles part with built-in heading styles and a Calibri 11pt default.
pub const STANDARD_STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Arial"/><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/><w:basedOn w:val="Normal"/>
    <w:rPr><w:rFonts w:ascii="Calibri Light" w:hAnsi="Calibri Light"/><w:b/><w:sz w:val="32"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading2">
    <w:name w:val="heading 2"/><w:basedOn w:val="Heading1"/>
    <w:rPr><w:sz w:val="26"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/></w:style>
</w:styles>"#;

/// Builder for a minimal Word package.
#[derive(Debug, Default, Clone)]
pub struct DocxBuilder {
    body: Vec<String>,
    styles: Option<String>,
    title: Option<String>,
    author: Option<String>,
    images: Vec<(String, String)>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_styles(mut self, xml: &str) -> Self {
        self.styles = Some(xml.to_string());
        self
    }

    pub fn with_standard_styles(self) -> Self {
        self.with_styles(STANDARD_STYLES)
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    /// Plain paragraph.
    pub fn paragraph(self, text: &str) -> Self {
        self.raw(format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text))
    }

    /// Paragraph in a named paragraph style.
    pub fn styled(self, style_id: &str, text: &str) -> Self {
        self.raw(format!(
            "<w:p><w:pPr><w:pStyle w:val=\"{}\"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>",
            style_id, text
        ))
    }

    /// Bold paragraph with a direct font size in points.
    pub fn bold(self, text: &str, size: f32) -> Self {
        let half_points = (size * 2.0).round() as u32;
        self.raw(format!(
            "<w:p><w:r><w:rPr><w:rFonts w:ascii=\"Arial\" w:hAnsi=\"Arial\"/><w:b/><w:sz w:val=\"{0}\"/></w:rPr><w:t>{1}</w:t></w:r></w:p>",
            half_points, text
        ))
    }

    /// Right-to-left paragraph using complex-script bold and size.
    pub fn arabic_heading(self, text: &str, size: f32) -> Self {
        let half_points = (size * 2.0).round() as u32;
        self.raw(format!(
            "<w:p><w:pPr><w:bidi/></w:pPr><w:r><w:rPr><w:rFonts w:cs=\"Traditional Arabic\"/><w:bCs/><w:szCs w:val=\"{0}\"/><w:rtl/></w:rPr><w:t>{1}</w:t></w:r></w:p>",
            half_points, text
        ))
    }

    /// One-cell table holding `text`.
    pub fn table(self, text: &str) -> Self {
        self.raw(format!(
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
            text
        ))
    }

    /// Inline picture backed by a new media part.
    pub fn image(mut self, file_name: &str) -> Self {
        let id = format!("rIdImg{}", self.images.len() + 1);
        self.images
            .push((id.clone(), format!("media/{}", file_name)));
        self.raw(picture(&id, None))
    }

    /// Picture with an SVG rendition and its raster fallback.
    pub fn svg_image(mut self, svg_name: &str, png_name: &str) -> Self {
        let png_id = format!("rIdImg{}", self.images.len() + 1);
        let svg_id = format!("rIdImg{}", self.images.len() + 2);
        self.images.push((png_id.clone(), format!("media/{}", png_name)));
        self.images.push((svg_id.clone(), format!("media/{}", svg_name)));
        self.raw(picture(&png_id, Some(svg_id.as_str())))
    }

    /// Append raw body XML.
    pub fn raw(mut self, xml: impl Into<String>) -> Self {
        self.body.push(xml.into());
        self
    }

    /// Serialize the package.
    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        add(&mut zip, options, "[Content_Types].xml", &content_types());
        add(&mut zip, options, "_rels/.rels", ROOT_RELS);
        add(
            &mut zip,
            options,
            "word/document.xml",
            &format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document {}><w:body>{}<w:sectPr/></w:body></w:document>",
                NAMESPACES,
                self.body.concat()
            ),
        );
        add(&mut zip, options, "word/_rels/document.xml.rels", &self.document_rels());

        if let Some(styles) = &self.styles {
            add(&mut zip, options, "word/styles.xml", styles);
        }
        add(&mut zip, options, "docProps/core.xml", &self.core_xml());

        for (_, target) in &self.images {
            zip.start_file(format!("word/{}", target), options).unwrap();
            zip.write_all(&[0x89, b'P', b'N', b'G']).unwrap();
        }

        zip.finish().unwrap().into_inner()
    }

    /// Serialize the package to `dir/name`.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }

    fn document_rels(&self) -> String {
        let mut rels = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        );
        if self.styles.is_some() {
            rels.push_str("<Relationship Id=\"rIdStyles\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>");
        }
        for (id, target) in &self.images {
            rels.push_str(&format!(
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>",
                id, REL_IMAGE, target
            ));
        }
        rels.push_str("</Relationships>");
        rels
    }

    fn core_xml(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
        );
        if let Some(title) = &self.title {
            xml.push_str(&format!("<dc:title>{}</dc:title>", title));
        }
        if let Some(author) = &self.author {
            xml.push_str(&format!("<dc:creator>{}</dc:creator>", author));
        }
        xml.push_str("<dcterms:created xsi:type=\"dcterms:W3CDTF\">2024-03-01T09:30:00Z</dcterms:created>");
        xml.push_str("</cp:coreProperties>");
        xml
    }
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

fn content_types() -> String {
    concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
        "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
        "<Default Extension=\"png\" ContentType=\"image/png\"/>",
        "<Default Extension=\"svg\" ContentType=\"image/svg+xml\"/>",
        "<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>",
        "</Types>"
    )
    .to_string()
}

fn picture(embed: &str, svg: Option<&str>) -> String {
    let ext = match svg {
        Some(id) => format!(
            "<a:extLst><a:ext uri=\"{{96DAC541-7B7A-43D3-8B79-37D633B846F1}}\"><asvg:svgBlip r:embed=\"{}\"/></a:ext></a:extLst>",
            id
        ),
        None => String::new(),
    };
    format!(
        "<w:p><w:r><w:drawing><wp:inline><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed=\"{}\">{}</a:blip></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>",
        embed, ext
    )
}

fn add(zip: &mut ZipWriter<Cursor<Vec<u8>>>, options: SimpleFileOptions, name: &str, content: &str) {
    zip.start_file(name, options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();
}

/// The "Report A" document: two pictures and a bold 16pt heading.
pub fn report_a() -> DocxBuilder {
    DocxBuilder::new()
        .with_standard_styles()
        .bold("Intro", 16.0)
        .paragraph("This report covers the first quarter of operations.")
        .image("image1.png")
        .paragraph("Revenue grew in every region.")
        .image("image2.png")
}
