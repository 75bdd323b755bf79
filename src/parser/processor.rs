//! Word document processor.

use std::io::{Read, Seek};
use std::path::Path;

use crate::detect::{check_container_bytes, check_container_path};
use crate::error::{Error, Result};
use crate::model::{CoreProperties, Document};
use crate::text::{clean_text, detect_script, word_count};

use super::body::{parse_body, BodyContent};
use super::formatting::ResolvedParagraph;
use super::images::ImageInventory;
use super::options::{EmptyDocumentPolicy, ProcessOptions};
use super::package::{DocxPackage, Relationships, REL_STYLES};
use super::properties::parse_core_properties;
use super::sections::{heading_section, HeadingDetector, SectionBuilder};
use super::styles::StyleSheet;

/// Parts of a package needed to build a [`Document`].
struct PackageParts {
    properties: CoreProperties,
    styles: StyleSheet,
    body: BodyContent,
    relationships: Relationships,
}

/// Extracts a [`Document`] from a Word package.
///
/// Every failure to open or parse the package is reported as
/// [`Error::UnreadableDocument`] carrying the source path.
#[derive(Debug, Clone, Default)]
pub struct DocumentProcessor {
    options: ProcessOptions,
    detector: HeadingDetector,
}

impl DocumentProcessor {
    /// Create a processor with the given options.
    pub fn new(options: ProcessOptions) -> Self {
        let detector = HeadingDetector::new(&options);
        Self { options, detector }
    }

    /// Processing options in use.
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Process a document on disk.
    pub fn process<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let path = path.as_ref();
        let parts = check_container_path(path)
            .and_then(|_| DocxPackage::open(path))
            .and_then(|mut package| read_parts(&mut package))
            .map_err(|e| Error::unreadable(path, e))?;
        self.build(parts, path)
    }

    /// Process a document held in memory. `path` names it in the result and
    /// in errors.
    pub fn process_bytes<P: AsRef<Path>>(&self, data: &[u8], path: P) -> Result<Document> {
        let path = path.as_ref();
        let parts = check_container_bytes(data)
            .and_then(|_| DocxPackage::from_bytes(data))
            .and_then(|mut package| read_parts(&mut package))
            .map_err(|e| Error::unreadable(path, e))?;
        self.build(parts, path)
    }

    /// Process a document from a reader.
    pub fn process_reader<R: Read, P: AsRef<Path>>(&self, mut reader: R, path: P) -> Result<Document> {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .map_err(|e| Error::unreadable(path.as_ref(), e))?;
        self.process_bytes(&data, path)
    }

    fn build(&self, parts: PackageParts, path: &Path) -> Result<Document> {
        let PackageParts {
            properties,
            styles,
            body,
            relationships,
        } = parts;

        if body.paragraphs.is_empty() {
            match self.options.empty_document {
                EmptyDocumentPolicy::Reject => return Err(Error::EmptyDocument(path.to_path_buf())),
                EmptyDocumentPolicy::Warn => {
                    log::warn!("Document has no paragraphs: {}", path.display());
                }
                EmptyDocumentPolicy::Accept => {}
            }
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut document = Document::new(file_name);
        document.parent_folder = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut texts = Vec::with_capacity(body.paragraphs.len());
        let mut builder = SectionBuilder::new(self.options.max_preview_length);

        for raw in &body.paragraphs {
            let text = clean_text(&raw.text());

            if raw.in_table {
                if self.options.count_table_words {
                    document.word_count += word_count(&text);
                    texts.push(text);
                }
                continue;
            }
            document.word_count += word_count(&text);
            if self.detector.is_caption(&text) {
                document.caption_count += 1;
            }

            let paragraph = ResolvedParagraph::resolve(raw, &styles);
            match self.detector.classify(&paragraph) {
                Some(source) => builder.open(heading_section(&paragraph, source)),
                None => builder.append(&text),
            }
            texts.push(text);
        }

        document.sections = builder.finish();
        document.script = detect_script(&texts.join(" "));

        let images = ImageInventory::collect(&relationships, &body.blips);
        document.image_count = images.total();
        document.unique_image_count = images.unique();

        document.title = match properties.non_empty_title() {
            Some(title) => title.to_string(),
            None => document
                .sections
                .first()
                .map(|s| s.heading_text.clone())
                .unwrap_or_else(|| document.file_stem().to_string()),
        };
        document.properties = properties;

        log::debug!(
            "{}: {} words, {} images, {} sections",
            document.file_name,
            document.word_count,
            document.image_count,
            document.section_count()
        );
        log_style_summary(&document);

        Ok(document)
    }
}

fn log_style_summary(document: &Document) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    log::debug!("Style summary for {}:", document.file_name);
    for (style, count) in document.style_summary() {
        log::debug!("  {}: {}", style, count);
    }
    log::debug!("  captions: {}", document.caption_count);
}

fn read_parts<R: Read + Seek>(package: &mut DocxPackage<R>) -> Result<PackageParts> {
    let main_part = package.main_part().to_string();
    let core_part = package.core_part().to_string();

    let body = parse_body(&package.read_required_part(&main_part)?)?;
    let relationships = package.relationships(&main_part)?;

    let styles_part = relationships
        .first_of_type(REL_STYLES)
        .map(|r| r.target.clone());
    let styles_xml = match styles_part {
        Some(part) => package.read_part(&part)?,
        None => None,
    };
    let styles = match styles_xml {
        Some(xml) => StyleSheet::parse(&xml)?,
        None => {
            log::warn!("Package has no styles part, using direct formatting only");
            StyleSheet::default()
        }
    };

    // Broken metadata does not make the document unreadable.
    let properties = match package.read_part(&core_part)? {
        Some(xml) => parse_core_properties(&xml).unwrap_or_else(|e| {
            log::warn!("Ignoring core properties in {}: {}", core_part, e);
            CoreProperties::default()
        }),
        None => CoreProperties::default(),
    };

    Ok(PackageParts {
        properties,
        styles,
        body,
        relationships,
    })
}
