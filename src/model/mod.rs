//! Document model types.
//!
//! This module defines the records produced by the processor and consumed by
//! the spreadsheet writer. A `Document` owns its sections exclusively.

mod document;
mod section;

pub use document::{assign_ids, CoreProperties, Document, HeadingSource};
pub use section::DocumentSection;
