//! Word package detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// ZIP local file header magic bytes: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Extension of Word packages handled by this crate.
pub const DOCX_EXTENSION: &str = "docx";

/// Check that a file starts with a ZIP local file header.
///
/// # Example
/// ```no_run
/// use undocx::detect::check_container_path;
///
/// check_container_path("report.docx").unwrap();
/// ```
pub fn check_container_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 4];
    reader.read_exact(&mut header)?;
    check_container_bytes(&header)
}

/// Check that bytes start with a ZIP local file header.
pub fn check_container_bytes(data: &[u8]) -> Result<()> {
    if data.len() < ZIP_MAGIC.len() || !data.starts_with(ZIP_MAGIC) {
        return Err(Error::Other("not a ZIP container".to_string()));
    }
    Ok(())
}

/// Check if bytes look like a ZIP container.
pub fn is_container_bytes(data: &[u8]) -> bool {
    check_container_bytes(data).is_ok()
}

/// Check whether a path names a Word package worth processing.
///
/// The extension match is case-insensitive. Office lock files (`~$name.docx`)
/// and other names starting with `~` are rejected.
pub fn is_docx_path<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();

    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('~') {
        return false;
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(DOCX_EXTENSION))
        .unwrap_or(false)
}
