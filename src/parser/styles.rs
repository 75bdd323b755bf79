//! Style definitions (`word/styles.xml`) and run property resolution.
//!
//! Effective run formatting is resolved in the order Word applies it:
//! direct run formatting, the run's character style chain, the paragraph
//! style chain, then the document defaults.

use std::collections::{HashMap, HashSet};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::xml::{get_attr, on_off, val_u32};
use crate::error::Result;

/// Upper bound on `basedOn` chain length.
const MAX_STYLE_DEPTH: usize = 32;

/// Font names declared by `w:rFonts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSet {
    /// Font for ASCII text
    pub ascii: Option<String>,
    /// Font for high-ANSI text
    pub h_ansi: Option<String>,
    /// Font for complex-script text (Arabic, Hebrew, ...)
    pub cs: Option<String>,
    /// Font for East Asian text
    pub east_asia: Option<String>,
}

impl FontSet {
    fn merge_missing(&mut self, fallback: &FontSet) {
        fill(&mut self.ascii, &fallback.ascii);
        fill(&mut self.h_ansi, &fallback.h_ansi);
        fill(&mut self.cs, &fallback.cs);
        fill(&mut self.east_asia, &fallback.east_asia);
    }

    /// Font for Latin text.
    pub fn latin(&self) -> Option<&str> {
        self.ascii
            .as_deref()
            .or(self.h_ansi.as_deref())
            .or(self.east_asia.as_deref())
            .or(self.cs.as_deref())
    }

    /// Font for complex-script text.
    pub fn complex(&self) -> Option<&str> {
        self.cs
            .as_deref()
            .or(self.ascii.as_deref())
            .or(self.h_ansi.as_deref())
    }
}

/// Run properties (`w:rPr`). `None` means "not specified at this level".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProperties {
    /// `w:b`
    pub bold: Option<bool>,
    /// `w:bCs`
    pub bold_cs: Option<bool>,
    /// `w:sz` in half-points
    pub size: Option<u32>,
    /// `w:szCs` in half-points
    pub size_cs: Option<u32>,
    /// `w:rFonts`
    pub fonts: FontSet,
    /// `w:rStyle` (runs only)
    pub style_id: Option<String>,
}

impl RunProperties {
    /// Apply a child element of `w:rPr`. Returns `false` for unrelated elements.
    pub(crate) fn apply_element(&mut self, e: &BytesStart<'_>) -> bool {
        match e.name().as_ref() {
            b"w:b" => self.bold = Some(on_off(e)),
            b"w:bCs" => self.bold_cs = Some(on_off(e)),
            b"w:sz" => self.size = val_u32(e).or(self.size),
            b"w:szCs" => self.size_cs = val_u32(e).or(self.size_cs),
            b"w:rStyle" => self.style_id = get_attr(e, b"w:val"),
            b"w:rFonts" => {
                let fonts = &mut self.fonts;
                fonts.ascii = get_attr(e, b"w:ascii").or(fonts.ascii.take());
                fonts.h_ansi = get_attr(e, b"w:hAnsi").or(fonts.h_ansi.take());
                fonts.cs = get_attr(e, b"w:cs").or(fonts.cs.take());
                fonts.east_asia = get_attr(e, b"w:eastAsia").or(fonts.east_asia.take());
            }
            _ => return false,
        }
        true
    }

    /// Fill every unspecified property from `fallback`.
    pub fn merge_missing(&mut self, fallback: &RunProperties) {
        fill(&mut self.bold, &fallback.bold);
        fill(&mut self.bold_cs, &fallback.bold_cs);
        fill(&mut self.size, &fallback.size);
        fill(&mut self.size_cs, &fallback.size_cs);
        self.fonts.merge_missing(&fallback.fonts);
    }

    /// Font size in points.
    pub fn size_points(&self) -> Option<f32> {
        self.size.map(half_points)
    }

    /// Complex-script font size in points, falling back to the regular size.
    pub fn size_cs_points(&self) -> Option<f32> {
        self.size_cs.or(self.size).map(half_points)
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, fallback: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(fallback);
    }
}

fn half_points(value: u32) -> f32 {
    value as f32 / 2.0
}

/// Kind of a style definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    /// Paragraph style
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

impl StyleKind {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("character") => StyleKind::Character,
            Some("table") => StyleKind::Table,
            Some("numbering") => StyleKind::Numbering,
            _ => StyleKind::Paragraph,
        }
    }
}

/// A single `w:style` definition.
#[derive(Debug, Clone)]
pub struct StyleDef {
    /// Style id referenced from the document (e.g. "Heading1")
    pub id: String,
    /// Style name (e.g. "heading 1")
    pub name: Option<String>,
    /// Style kind
    pub kind: StyleKind,
    /// Parent style id
    pub based_on: Option<String>,
    /// Run properties declared by the style
    pub run: RunProperties,
    /// Whether this is the default style of its kind
    pub is_default: bool,
}

/// Parsed style sheet.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: HashMap<String, StyleDef>,
    defaults: RunProperties,
    default_paragraph: Option<String>,
    default_character: Option<String>,
}

impl StyleSheet {
    /// Parse `word/styles.xml`.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut sheet = StyleSheet::default();
        let mut current: Option<StyleDef> = None;
        let mut in_rpr_default = false;
        let mut in_rpr = false;
        let mut nested = 0usize; // pPr, tblPr, tblStylePr, ... inside a style
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"w:rPrDefault" => in_rpr_default = true,
                    b"w:style" => current = Some(start_style(&e)),
                    b"w:rPr" if in_rpr_default || (current.is_some() && nested == 0) => {
                        in_rpr = true;
                    }
                    _ if current.is_some() && !in_rpr => nested += 1,
                    _ => {
                        sheet.apply_rpr_child(&e, in_rpr, in_rpr_default, current.as_mut());
                    }
                },
                Event::Empty(e) => {
                    if in_rpr {
                        sheet.apply_rpr_child(&e, in_rpr, in_rpr_default, current.as_mut());
                    } else if let Some(style) = current.as_mut().filter(|_| nested == 0) {
                        match e.name().as_ref() {
                            b"w:name" => style.name = get_attr(&e, b"w:val"),
                            b"w:basedOn" => style.based_on = get_attr(&e, b"w:val"),
                            _ => {}
                        }
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"w:rPrDefault" => in_rpr_default = false,
                    b"w:rPr" if in_rpr => in_rpr = false,
                    b"w:style" => {
                        if let Some(style) = current.take() {
                            sheet.insert(style);
                        }
                        nested = 0;
                    }
                    _ if current.is_some() && !in_rpr && nested > 0 => nested -= 1,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }

    fn apply_rpr_child(
        &mut self,
        e: &BytesStart<'_>,
        in_rpr: bool,
        in_rpr_default: bool,
        style: Option<&mut StyleDef>,
    ) {
        if !in_rpr {
            return;
        }
        if in_rpr_default {
            self.defaults.apply_element(e);
        } else if let Some(style) = style {
            style.run.apply_element(e);
        }
    }

    fn insert(&mut self, style: StyleDef) {
        if style.is_default {
            match style.kind {
                StyleKind::Paragraph => self.default_paragraph = Some(style.id.clone()),
                StyleKind::Character => self.default_character = Some(style.id.clone()),
                _ => {}
            }
        }
        self.styles.insert(style.id.clone(), style);
    }

    /// Look up a style by id.
    pub fn get(&self, id: &str) -> Option<&StyleDef> {
        self.styles.get(id)
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the sheet has no styles.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Document default run properties.
    pub fn defaults(&self) -> &RunProperties {
        &self.defaults
    }

    /// Paragraph style id in effect: the explicit one or the default.
    pub fn paragraph_style_id<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit.or(self.default_paragraph.as_deref())
    }

    /// Display name of a style.
    ///
    /// Built-in styles are stored with lowercase names ("heading 1"); they
    /// are shown capitalised. Unknown ids are returned as-is.
    pub fn display_name(&self, id: &str) -> String {
        match self.styles.get(id).and_then(|s| s.name.as_deref()) {
            Some(name) => capitalize(name),
            None => id.to_string(),
        }
    }

    /// Run properties accumulated along a style's `basedOn` chain.
    pub fn resolve_style(&self, id: &str) -> RunProperties {
        let mut resolved = RunProperties::default();
        let mut seen = HashSet::new();
        let mut next = Some(id);

        while let Some(style_id) = next {
            if seen.len() >= MAX_STYLE_DEPTH || !seen.insert(style_id) {
                log::debug!("Style chain cycle or depth limit at {}", style_id);
                break;
            }
            let Some(style) = self.styles.get(style_id) else {
                break;
            };
            resolved.merge_missing(&style.run);
            next = style.based_on.as_deref();
        }

        resolved
    }

    /// Effective formatting of a run inside a paragraph with the given style.
    pub fn effective_run(&self, run: &RunProperties, paragraph_style: Option<&str>) -> RunProperties {
        let mut effective = run.clone();

        let character_style = run
            .style_id
            .as_deref()
            .or(self.default_character.as_deref());
        if let Some(id) = character_style {
            effective.merge_missing(&self.resolve_style(id));
        }
        if let Some(id) = self.paragraph_style_id(paragraph_style) {
            effective.merge_missing(&self.resolve_style(id));
        }
        effective.merge_missing(&self.defaults);

        effective
    }
}

fn start_style(e: &BytesStart<'_>) -> StyleDef {
    let kind = StyleKind::from_attr(get_attr(e, b"w:type").as_deref());
    let is_default = matches!(
        get_attr(e, b"w:default").as_deref(),
        Some("1") | Some("true") | Some("on")
    );
    StyleDef {
        id: get_attr(e, b"w:styleId").unwrap_or_default(),
        name: None,
        kind,
        based_on: None,
        run: RunProperties::default(),
        is_default,
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        _ => name.to_string(),
    }
}
