//! Word document parsing module.

mod body;
mod formatting;
mod images;
mod options;
mod package;
mod processor;
mod properties;
mod sections;
mod styles;
mod xml;

pub use body::{parse_body, BlipRef, BodyContent, RawParagraph, RawRun};
pub use formatting::{ParagraphFormatting, ResolvedParagraph};
pub use images::ImageInventory;
pub use options::{
    EmptyDocumentPolicy, ProcessOptions, DEFAULT_HEADING_MIN_FONT_SIZE, DEFAULT_PREVIEW_LENGTH,
};
pub use package::{DocxPackage, Relationship, Relationships};
pub use processor::DocumentProcessor;
pub use properties::parse_core_properties;
pub use sections::{heading_section, HeadingDetector, SectionBuilder};
pub use styles::{FontSet, RunProperties, StyleDef, StyleKind, StyleSheet};
