//! JSON rendering of processed documents and batch results.

use serde::Serialize;

use crate::batch::{BatchReport, BatchTotals, FailedDocument};
use crate::error::Result;
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    serialize(doc, format)
}

#[derive(Serialize)]
struct BatchJson<'a> {
    output: &'a std::path::Path,
    elapsed_secs: f64,
    totals: BatchTotals,
    documents: &'a [Document],
    failures: &'a [FailedDocument],
}

/// Convert a batch report to JSON.
pub fn batch_to_json(report: &BatchReport, format: JsonFormat) -> Result<String> {
    let json = BatchJson {
        output: &report.output,
        elapsed_secs: report.elapsed.as_secs_f64(),
        totals: report.totals(),
        documents: &report.documents,
        failures: &report.failures,
    };
    serialize(&json, format)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}
