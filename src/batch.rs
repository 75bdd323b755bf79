//! Batch processing of a directory of Word documents.
//!
//! Documents are discovered recursively, processed one at a time in sorted
//! order, and written to a single workbook. A document that fails is logged
//! and skipped. A failure to write the workbook fails the run with
//! [`Error::BatchWrite`], which still carries the report.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Config;
use crate::detect::is_docx_path;
use crate::error::{Error, Result};
use crate::model::{assign_ids, Document};
use crate::parser::DocumentProcessor;
use crate::writer::SpreadsheetWriter;

/// Find `.docx` files under `dir`, sorted by file name within each directory.
///
/// Lock files (`~$report.docx`) are skipped. Entries that cannot be read are
/// logged and skipped; an unreadable root is an error.
pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_docx_path(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) if e.depth() == 0 => return Err(Error::Io(e.into())),
            Err(e) => log::warn!("Skipping unreadable entry: {}", e),
        }
    }

    Ok(files)
}

/// Progress notifications emitted during a run.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// Input files were discovered
    Discovered {
        /// Number of files to process
        total: usize,
    },
    /// A document is about to be processed
    Started {
        /// 1-based position
        index: usize,
        /// Number of files to process
        total: usize,
        /// Document path
        path: &'a Path,
    },
    /// A document was processed
    Processed {
        /// 1-based position
        index: usize,
        /// Extracted document
        document: &'a Document,
    },
    /// A document failed and was skipped
    Failed {
        /// 1-based position
        index: usize,
        /// Document path
        path: &'a Path,
        /// Failure
        error: &'a Error,
    },
    /// The workbook is being written
    Writing {
        /// Output path
        path: &'a Path,
    },
}

/// A document that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDocument {
    /// Document path
    pub path: PathBuf,
    /// Failure message
    pub reason: String,
}

/// Aggregate counts over the processed documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTotals {
    /// Documents written to the workbook
    pub documents: usize,
    /// Sum of word counts
    pub words: usize,
    /// Sum of image counts
    pub images: usize,
    /// Sum of section counts
    pub sections: usize,
}

/// Outcome of a batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Processed documents in workbook order
    pub documents: Vec<Document>,
    /// Documents that were skipped
    pub failures: Vec<FailedDocument>,
    /// Workbook path
    pub output: PathBuf,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of documents written.
    pub fn succeeded(&self) -> usize {
        self.documents.len()
    }

    /// Number of documents skipped.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether every discovered document was processed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Aggregate counts.
    pub fn totals(&self) -> BatchTotals {
        self.documents
            .iter()
            .fold(BatchTotals::default(), |mut totals, doc| {
                totals.documents += 1;
                totals.words += doc.word_count;
                totals.images += doc.image_count;
                totals.sections += doc.section_count();
                totals
            })
    }
}

/// Runs the processor over a directory and writes the workbook.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    config: Config,
    processor: DocumentProcessor,
    writer: SpreadsheetWriter,
}

impl BatchProcessor {
    /// Validate `config` and prepare a run.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let processor = DocumentProcessor::new(config.process_options());
        let writer = SpreadsheetWriter::new(config.writer_options()?);
        Ok(Self {
            config,
            processor,
            writer,
        })
    }

    /// Configuration of this run.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the batch.
    pub fn run(&self) -> Result<BatchReport> {
        self.run_with(|_| {})
    }

    /// Run the batch, reporting progress to `on_event`.
    pub fn run_with<F>(&self, mut on_event: F) -> Result<BatchReport>
    where
        F: FnMut(BatchEvent<'_>),
    {
        let started = Instant::now();
        let input = &self.config.input_dir;
        let output = &self.config.output_file;

        log::info!("Starting batch in {}", input.display());
        let files = discover(input)?;
        let total = files.len();
        log::info!("Found {} documents", total);
        on_event(BatchEvent::Discovered { total });

        let mut documents = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (idx, path) in files.iter().enumerate() {
            let index = idx + 1;
            log::info!("Processing [{}/{}] {}", index, total, path.display());
            on_event(BatchEvent::Started { index, total, path });

            match self.processor.process(path) {
                Ok(document) => {
                    log::info!(
                        "Processed {}: {} words, {} images, {} sections",
                        document.file_name,
                        document.word_count,
                        document.image_count,
                        document.section_count()
                    );
                    on_event(BatchEvent::Processed {
                        index,
                        document: &document,
                    });
                    documents.push(document);
                }
                Err(error) => {
                    log::error!("Failed to process {}: {}", path.display(), error);
                    on_event(BatchEvent::Failed {
                        index,
                        path,
                        error: &error,
                    });
                    failures.push(FailedDocument {
                        path: path.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        assign_ids(&mut documents);

        on_event(BatchEvent::Writing { path: output });
        let written = self.writer.write(&documents, output);

        let report = BatchReport {
            documents,
            failures,
            output: output.clone(),
            elapsed: started.elapsed(),
        };
        log_summary(&report, total);

        match written {
            Ok(()) => Ok(report),
            Err(source) => {
                log::error!(
                    "Workbook not written, {} processed documents are only in the run report",
                    report.succeeded()
                );
                Err(Error::BatchWrite {
                    report: Box::new(report),
                    source: Box::new(source),
                })
            }
        }
    }
}

fn log_summary(report: &BatchReport, total: usize) {
    let totals = report.totals();
    log::info!(
        "Batch complete: {} found, {} processed, {} failed in {}",
        total,
        report.succeeded(),
        report.failed(),
        format_elapsed(report.elapsed)
    );
    log::info!(
        "Totals: {} words, {} images, {} sections",
        totals.words,
        totals.images,
        totals.sections
    );
    for failure in &report.failures {
        log::info!("  failed: {}: {}", failure.path.display(), failure.reason);
    }
}

/// Human readable duration: `42s`, `3.5m`, `1.2h`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs_f64();
    if seconds < 60.0 {
        format!("{:.0}s", seconds)
    } else if seconds < 3600.0 {
        format!("{:.1}m", seconds / 60.0)
    } else {
        format!("{:.1}h", seconds / 3600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();

        for name in ["b.docx", "a.DOCX", "~$a.docx", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::write(nested.join("c.docx"), b"").unwrap();

        let files = discover(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "a.DOCX".to_string(),
                "b.docx".to_string(),
                format!("nested{}c.docx", std::path::MAIN_SEPARATOR)
            ]
        );
    }

    #[test]
    fn test_discover_missing_root() {
        assert!(discover("/definitely/not/here").is_err());
    }

    #[test]
    fn test_totals() {
        let mut a = Document::new("a.docx");
        a.word_count = 10;
        a.image_count = 1;
        let mut b = Document::new("b.docx");
        b.word_count = 5;

        let report = BatchReport {
            documents: vec![a, b],
            failures: vec![FailedDocument {
                path: PathBuf::from("c.docx"),
                reason: "broken".to_string(),
            }],
            output: PathBuf::from("out.xlsx"),
            elapsed: Duration::from_secs(1),
        };

        let totals = report.totals();
        assert_eq!(totals.documents, 2);
        assert_eq!(totals.words, 15);
        assert_eq!(totals.images, 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(42)), "42s");
        assert_eq!(format_elapsed(Duration::from_secs(210)), "3.5m");
        assert_eq!(format_elapsed(Duration::from_secs(4320)), "1.2h");
    }
}
