//! # undocx
//!
//! Batch extraction of Word documents into an Excel workbook.
//!
//! Each `.docx` file is read for its title, word count, image count and
//! heading sections (with the font the heading is set in). The results are
//! written to one `.xlsx` file: a summary sheet listing every document and
//! one sheet per document with its sections.
//!
//! ## Quick Start
//!
//! ```no_run
//! use undocx::{process_file, write_workbook};
//!
//! fn main() -> undocx::Result<()> {
//!     let mut doc = process_file("report.docx")?;
//!     doc.id = 1;
//!     println!("{}: {} words, {} sections", doc.title, doc.word_count, doc.section_count());
//!
//!     write_workbook(&[doc], "analysis.xlsx")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Batch runs
//!
//! ```no_run
//! use undocx::{run_batch, Config};
//!
//! let report = run_batch(Config::new("./documents").with_output("analysis.xlsx"))?;
//! println!("{} processed, {} failed", report.succeeded(), report.failed());
//! # Ok::<(), undocx::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Heading detection**: heading styles, or bold text at a minimum size
//! - **Style resolution**: run, character style, paragraph style and document
//!   defaults, including complex-script properties for Arabic text
//! - **Script detection**: Arabic, Latin or mixed
//! - **Atomic output**: the workbook replaces the target only once complete

pub mod batch;
pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod text;
pub mod writer;

// Re-export commonly used types
pub use batch::{discover, BatchEvent, BatchProcessor, BatchReport, BatchTotals, FailedDocument};
pub use config::Config;
pub use detect::{is_docx_path, DOCX_EXTENSION};
pub use error::{Error, Result};
pub use model::{assign_ids, CoreProperties, Document, DocumentSection, HeadingSource};
pub use parser::{
    DocumentProcessor, EmptyDocumentPolicy, ParagraphFormatting, ProcessOptions,
    ResolvedParagraph,
};
pub use report::JsonFormat;
pub use text::Script;
pub use writer::{SpreadsheetWriter, WriterOptions};

use std::io::Read;
use std::path::Path;

/// Process a Word document with default options.
///
/// # Example
///
/// ```no_run
/// use undocx::process_file;
///
/// let doc = process_file("report.docx").unwrap();
/// println!("Sections: {}", doc.section_count());
/// ```
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    DocumentProcessor::default().process(path)
}

/// Process a Word document with custom options.
///
/// # Example
///
/// ```no_run
/// use undocx::{process_file_with_options, ProcessOptions};
///
/// let options = ProcessOptions::new()
///     .with_preview_length(80)
///     .with_heading_min_font_size(16.0);
/// let doc = process_file_with_options("report.docx", options).unwrap();
/// ```
pub fn process_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ProcessOptions,
) -> Result<Document> {
    DocumentProcessor::new(options).process(path)
}

/// Process a Word document held in memory. `name` is used as its file name.
///
/// # Example
///
/// ```no_run
/// use undocx::process_bytes;
///
/// let data = std::fs::read("report.docx").unwrap();
/// let doc = process_bytes(&data, "report.docx").unwrap();
/// ```
pub fn process_bytes<P: AsRef<Path>>(data: &[u8], name: P) -> Result<Document> {
    DocumentProcessor::default().process_bytes(data, name)
}

/// Process a Word document from a reader.
pub fn process_reader<R: Read, P: AsRef<Path>>(reader: R, name: P) -> Result<Document> {
    DocumentProcessor::default().process_reader(reader, name)
}

/// Process a Word document and render it as JSON.
///
/// # Example
///
/// ```no_run
/// use undocx::{to_json, JsonFormat};
///
/// let json = to_json("report.docx", JsonFormat::Pretty).unwrap();
/// std::fs::write("report.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = process_file(path)?;
    report::to_json(&doc, format)
}

/// Write documents to a workbook with default formatting.
pub fn write_workbook<P: AsRef<Path>>(documents: &[Document], path: P) -> Result<()> {
    SpreadsheetWriter::default().write(documents, path)
}

/// Validate `config`, process every document under its input directory and
/// write the workbook.
pub fn run_batch(config: Config) -> Result<BatchReport> {
    BatchProcessor::new(config)?.run()
}
