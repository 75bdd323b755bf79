//! OPC package access for Word documents.
//!
//! A `.docx` file is a ZIP archive of XML parts linked by relationship parts:
//! - `_rels/.rels`: package relationships (main document, core properties)
//! - `word/document.xml`: main document part
//! - `word/_rels/document.xml.rels`: relationships of the main part (images,
//!   styles, headers, ...)
//! - `word/styles.xml`: style definitions
//! - `docProps/core.xml`: core properties (title, creator, dates)

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use super::xml::{get_attr, strip_bom};
use crate::error::{Error, Result};

/// Fallback location of the main document part.
const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Fallback location of the core properties part.
const DEFAULT_CORE_PART: &str = "docProps/core.xml";

/// Upper bound on the buffer reserved up front for a part. The size stored in
/// the archive is not trusted beyond this.
const MAX_PART_PREALLOC: u64 = 16 << 20;

/// Relationship type suffixes (transitional and strict namespaces share them).
pub(crate) const REL_OFFICE_DOCUMENT: &str = "/officeDocument";
pub(crate) const REL_CORE_PROPERTIES: &str = "/core-properties";
pub(crate) const REL_STYLES: &str = "/styles";
pub(crate) const REL_IMAGE: &str = "/image";

/// A relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship id (e.g. "rId7")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target part name resolved against the source part, or the raw URI for
    /// external targets
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

impl Relationship {
    /// Check whether the relationship type ends with `suffix`.
    pub fn is_type(&self, suffix: &str) -> bool {
        self.rel_type.ends_with(suffix)
    }
}

/// Relationships of a single part, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    /// Look up a relationship by id.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// First internal relationship whose type ends with `suffix`.
    pub fn first_of_type(&self, suffix: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| !r.external && r.is_type(suffix))
    }

    /// All relationships whose type ends with `suffix`.
    pub fn of_type<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.items.iter().filter(move |r| r.is_type(suffix))
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An opened Word package.
pub struct DocxPackage<R: Read + Seek> {
    archive: ZipArchive<R>,
    main_part: String,
    core_part: String,
}

impl DocxPackage<File> {
    /// Open a package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file)
    }
}

impl<'a> DocxPackage<Cursor<&'a [u8]>> {
    /// Open a package held in memory.
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        Self::new(Cursor::new(data))
    }
}

impl<R: Read + Seek> DocxPackage<R> {
    /// Open a package from any seekable reader.
    ///
    /// Fails when the archive is invalid or has no main document part.
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        let mut package = Self {
            archive,
            main_part: DEFAULT_MAIN_PART.to_string(),
            core_part: DEFAULT_CORE_PART.to_string(),
        };

        let root = package.relationships("")?;
        if let Some(rel) = root.first_of_type(REL_OFFICE_DOCUMENT) {
            package.main_part = rel.target.clone();
        }
        if let Some(rel) = root.first_of_type(REL_CORE_PROPERTIES) {
            package.core_part = rel.target.clone();
        }

        let main_part = package.main_part.clone();
        if !package.has_part(&main_part) {
            return Err(Error::MissingPart(main_part));
        }

        Ok(package)
    }

    /// Name of the main document part.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Name of the core properties part.
    pub fn core_part(&self) -> &str {
        &self.core_part
    }

    /// Check whether the archive contains a part.
    pub fn has_part(&mut self, name: &str) -> bool {
        self.archive.by_name(name).is_ok()
    }

    /// Read a part as UTF-8 text, or `None` when it does not exist.
    pub fn read_part(&mut self, name: &str) -> Result<Option<String>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::with_capacity(part_capacity(entry.size()));
        entry.read_to_end(&mut bytes)?;
        let content = String::from_utf8(bytes)
            .map_err(|e| Error::Xml(format!("part {} is not UTF-8: {}", name, e)))?;
        Ok(Some(strip_bom(&content).to_string()))
    }

    /// Read a part that must exist.
    pub fn read_required_part(&mut self, name: &str) -> Result<String> {
        self.read_part(name)?
            .ok_or_else(|| Error::MissingPart(name.to_string()))
    }

    /// Read the relationships of `part` (`""` for the package itself).
    ///
    /// A missing relationship part yields an empty set.
    pub fn relationships(&mut self, part: &str) -> Result<Relationships> {
        let rels_name = rels_part_name(part);
        match self.read_part(&rels_name)? {
            Some(xml) => parse_relationships(&xml, part),
            None => Ok(Relationships::default()),
        }
    }
}

/// Name of the relationship part belonging to `part`.
fn rels_part_name(part: &str) -> String {
    match part.rfind('/') {
        Some(idx) => format!("{}/_rels/{}.rels", &part[..idx], &part[idx + 1..]),
        None if part.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", part),
    }
}

/// Parse a relationship part, resolving targets against `source_part`.
pub(crate) fn parse_relationships(xml: &str, source_part: &str) -> Result<Relationships> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut items = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(rel_type), Some(target)) = (
                    get_attr(&e, b"Id"),
                    get_attr(&e, b"Type"),
                    get_attr(&e, b"Target"),
                ) {
                    items.push(make_relationship(source_part, &e, id, rel_type, target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(Relationships { items })
}

fn make_relationship(
    source_part: &str,
    e: &BytesStart<'_>,
    id: String,
    rel_type: String,
    target: String,
) -> Relationship {
    let external = get_attr(e, b"TargetMode")
        .map(|m| m.eq_ignore_ascii_case("External"))
        .unwrap_or(false);
    let target = if external {
        target
    } else {
        resolve_target(source_part, &target)
    };
    Relationship {
        id,
        rel_type,
        target,
        external,
    }
}

/// Resolve a relative relationship target to an archive part name.
pub(crate) fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rfind('/') {
        Some(idx) => source_part[..idx].split('/').collect(),
        None => Vec::new(),
    };

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

fn part_capacity(declared: u64) -> usize {
    declared.min(MAX_PART_PREALLOC) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_capacity_is_capped() {
        assert_eq!(part_capacity(0), 0);
        assert_eq!(part_capacity(4096), 4096);
        assert_eq!(part_capacity(u64::MAX), 16 << 20);
        assert_eq!(part_capacity(u32::MAX as u64 * 4), 16 << 20);
    }

    #[test]
    fn test_rels_part_name() {
        assert_eq!(rels_part_name(""), "_rels/.rels");
        assert_eq!(
            rels_part_name("word/document.xml"),
            "word/_rels/document.xml.rels"
        );
        assert_eq!(rels_part_name("document.xml"), "_rels/document.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("word/document.xml", "media/image1.png"),
            "word/media/image1.png"
        );
        assert_eq!(
            resolve_target("word/document.xml", "../media/image1.png"),
            "media/image1.png"
        );
        assert_eq!(
            resolve_target("word/document.xml", "/word/media/image1.png"),
            "word/media/image1.png"
        );
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("", "./word/document.xml"), "word/document.xml");
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
  <Relationship Id="rId6" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;

        let rels = parse_relationships(xml, "word/document.xml").unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(rels.get("rId1").unwrap().target, "word/styles.xml");
        assert_eq!(rels.get("rId5").unwrap().target, "word/media/image1.png");
        assert!(rels.get("rId6").unwrap().external);
        assert_eq!(rels.get("rId6").unwrap().target, "https://example.com");
        assert_eq!(rels.of_type(REL_IMAGE).count(), 1);
        assert_eq!(rels.first_of_type(REL_STYLES).unwrap().id, "rId1");
    }

    #[test]
    fn test_open_rejects_garbage() {
        let result = DocxPackage::from_bytes(b"definitely not a zip archive");
        assert!(matches!(result, Err(Error::Zip(_))));
    }
}
