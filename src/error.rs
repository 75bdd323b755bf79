//! Error types for undocx library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::batch::BatchReport;

/// Result type alias for undocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting documents or writing workbooks.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source file is not a valid Word package or is corrupt.
    #[error("Unreadable document {}: {reason}", .path.display())]
    UnreadableDocument {
        /// Path of the offending document
        path: PathBuf,
        /// Why the document could not be read
        reason: String,
    },

    /// The document contains no paragraphs and the policy rejects it.
    #[error("Document has no paragraphs: {}", .0.display())]
    EmptyDocument(PathBuf),

    /// The output workbook could not be created or written.
    #[error("Cannot write output {}: {reason}", .path.display())]
    OutputWrite {
        /// Target workbook path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// A batch processed its documents but could not write the workbook.
    ///
    /// The report keeps the extracted documents and the failures so they
    /// can still be reported.
    #[error("{source} ({} processed, {} failed)", .report.succeeded(), .report.failed())]
    BatchWrite {
        /// Outcome of the run up to the write
        report: Box<BatchReport>,
        /// The output failure
        source: Box<Error>,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// ZIP container error.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed XML inside a package part.
    #[error("XML error: {0}")]
    Xml(String),

    /// A required package part is missing.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// Formatting error while generating XML.
    #[error("XML write error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap any error as an unreadable-document failure for `path`.
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::UnreadableDocument {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap any error as an output failure for `path`.
    pub(crate) fn output(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::OutputWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Report of a batch whose workbook could not be written.
    pub fn batch_report(&self) -> Option<&BatchReport> {
        match self {
            Error::BatchWrite { report, .. } => Some(report.as_ref()),
            _ => None,
        }
    }

    /// Whether the error only affects a single document of a batch.
    pub fn is_per_document(&self) -> bool {
        matches!(
            self,
            Error::UnreadableDocument { .. } | Error::EmptyDocument(_)
        )
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}
