//! Small helpers over quick-xml events.

use quick_xml::events::BytesStart;

/// Extract an attribute value by qualified key.
pub(crate) fn get_attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
}

/// Read a WordprocessingML on/off property such as `<w:b/>`.
///
/// A missing `w:val` means "on"; `0`, `false`, `off` and `none` mean "off".
pub(crate) fn on_off(e: &BytesStart<'_>) -> bool {
    match get_attr(e, b"w:val") {
        None => true,
        Some(v) => !matches!(v.as_str(), "0" | "false" | "off" | "none"),
    }
}

/// Parse the `w:val` attribute as an unsigned number.
pub(crate) fn val_u32(e: &BytesStart<'_>) -> Option<u32> {
    get_attr(e, b"w:val").and_then(|v| v.trim().parse().ok())
}

/// Drop a leading byte order mark from decoded part content.
pub(crate) fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{FEFF}').unwrap_or(content)
}
