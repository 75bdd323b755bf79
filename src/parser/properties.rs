//! Core properties (`docProps/core.xml`).
//!
//! Example part:
//! ```xml
//! <cp:coreProperties>
//!   <dc:title>Annual Report</dc:title>
//!   <dc:creator>Jane Doe</dc:creator>
//!   <dcterms:created xsi:type="dcterms:W3CDTF">2024-01-15T10:30:00Z</dcterms:created>
//! </cp:coreProperties>
//! ```

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Result;
use crate::model::CoreProperties;

#[derive(Clone, Copy)]
enum Field {
    Title,
    Creator,
    Subject,
    Created,
    Modified,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"dc:title" => Some(Field::Title),
            b"dc:creator" => Some(Field::Creator),
            b"dc:subject" => Some(Field::Subject),
            b"dcterms:created" => Some(Field::Created),
            b"dcterms:modified" => Some(Field::Modified),
            _ => None,
        }
    }
}

/// Parse the core properties part.
pub fn parse_core_properties(xml: &str) -> Result<CoreProperties> {
    let mut reader = Reader::from_str(xml);

    let mut props = CoreProperties::default();
    let mut current: Option<Field> = None;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                current = Field::from_name(e.name().as_ref());
                text.clear();
            }
            Event::Text(e) if current.is_some() => {
                text.push_str(&e.unescape()?);
            }
            Event::End(_) => {
                if let Some(field) = current.take() {
                    apply(&mut props, field, text.trim());
                }
                text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(props)
}

fn apply(props: &mut CoreProperties, field: Field, value: &str) {
    if value.is_empty() {
        return;
    }
    match field {
        Field::Title => props.title = Some(value.to_string()),
        Field::Creator => props.author = Some(value.to_string()),
        Field::Subject => props.subject = Some(value.to_string()),
        Field::Created => props.created = parse_datetime(value),
        Field::Modified => props.modified = parse_datetime(value),
    }
}

/// Parse a W3CDTF timestamp (`2024-01-15T10:30:00Z`).
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
