//! Main document part walker.
//!
//! Produces the paragraphs of `word/document.xml` in document order together
//! with their runs and the image references found along the way. Content of
//! text boxes (`w:txbxContent`) and legacy fallbacks (`mc:Fallback`) is not
//! part of the body flow and is skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::styles::RunProperties;
use super::xml::get_attr;
use crate::error::Result;

/// A run of text with its direct formatting.
#[derive(Debug, Clone, Default)]
pub struct RawRun {
    /// Direct run properties (`w:rPr`)
    pub props: RunProperties,
    /// Run text
    pub text: String,
}

impl RawRun {
    /// Check whether the run carries visible text.
    pub fn has_text(&self) -> bool {
        self.text.chars().any(|c| !c.is_whitespace())
    }
}

/// A body paragraph before style resolution.
#[derive(Debug, Clone, Default)]
pub struct RawParagraph {
    /// Paragraph style id (`w:pStyle`)
    pub style_id: Option<String>,
    /// Runs in order
    pub runs: Vec<RawRun>,
    /// Whether the paragraph sits inside a table cell
    pub in_table: bool,
}

impl RawParagraph {
    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// First run with visible text, else the first run.
    pub fn first_run(&self) -> Option<&RawRun> {
        self.runs
            .iter()
            .find(|r| r.has_text())
            .or_else(|| self.runs.first())
    }
}

/// A picture reference (`a:blip`, `v:imagedata`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlipRef {
    /// Relationship id of the picture
    pub embed: Option<String>,
    /// Relationship id of an SVG alternative (`asvg:svgBlip`)
    pub svg_embed: Option<String>,
}

/// Everything extracted from the main document part.
#[derive(Debug, Clone, Default)]
pub struct BodyContent {
    /// Paragraphs in document order
    pub paragraphs: Vec<RawParagraph>,
    /// Picture references in document order
    pub blips: Vec<BlipRef>,
}

#[derive(Default)]
struct Walker {
    content: BodyContent,
    paragraph: Option<RawParagraph>,
    run: Option<RawRun>,
    blip: Option<BlipRef>,
    table_depth: usize,
    skip_depth: usize,
    in_ppr: bool,
    in_rpr: bool,
    in_text: bool,
}

impl Walker {
    fn start(&mut self, e: &BytesStart<'_>) {
        let name = e.name();
        let name = name.as_ref();

        if matches!(name, b"w:txbxContent" | b"mc:Fallback") {
            self.skip_depth += 1;
            return;
        }
        if self.skip_depth > 0 {
            return;
        }

        match name {
            b"w:tbl" => self.table_depth += 1,
            b"w:p" => self.open_paragraph(),
            b"w:pPr" if self.run.is_none() => self.in_ppr = true,
            b"w:r" if !self.in_ppr => self.run = Some(RawRun::default()),
            b"w:rPr" if self.run.is_some() => self.in_rpr = true,
            b"w:t" if self.run.is_some() && !self.in_rpr => self.in_text = true,
            b"a:blip" => self.blip = Some(blip_ref(e)),
            _ => self.element(e),
        }
    }

    fn empty(&mut self, e: &BytesStart<'_>) {
        if self.skip_depth > 0 {
            return;
        }

        match e.name().as_ref() {
            b"w:p" => {
                self.open_paragraph();
                self.close_paragraph();
            }
            b"a:blip" => self.content.blips.push(blip_ref(e)),
            _ => self.element(e),
        }
    }

    /// Elements that act the same whether written as empty or not.
    fn element(&mut self, e: &BytesStart<'_>) {
        let name = e.name();
        let name = name.as_ref();

        if self.in_ppr {
            if name == b"w:pStyle" {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.style_id = get_attr(e, b"w:val");
                }
            }
            return;
        }

        if self.in_rpr {
            if let Some(run) = self.run.as_mut() {
                run.props.apply_element(e);
            }
            return;
        }

        match name {
            b"w:tab" | b"w:br" | b"w:cr" => self.push_text(" "),
            b"w:noBreakHyphen" => self.push_text("-"),
            b"asvg:svgBlip" => {
                if let Some(blip) = self.blip.as_mut() {
                    blip.svg_embed = get_attr(e, b"r:embed");
                }
            }
            b"v:imagedata" => self.content.blips.push(BlipRef {
                embed: get_attr(e, b"r:id"),
                svg_embed: None,
            }),
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        if matches!(name, b"w:txbxContent" | b"mc:Fallback") {
            self.skip_depth = self.skip_depth.saturating_sub(1);
            return;
        }
        if self.skip_depth > 0 {
            return;
        }

        match name {
            b"w:tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            b"w:p" => self.close_paragraph(),
            b"w:pPr" => self.in_ppr = false,
            b"w:rPr" => self.in_rpr = false,
            b"w:t" => self.in_text = false,
            b"w:r" => {
                if let (Some(run), Some(paragraph)) = (self.run.take(), self.paragraph.as_mut()) {
                    paragraph.runs.push(run);
                }
                self.in_rpr = false;
                self.in_text = false;
            }
            b"a:blip" => {
                if let Some(blip) = self.blip.take() {
                    self.content.blips.push(blip);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text && self.skip_depth == 0 {
            self.push_text(text);
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }

    fn open_paragraph(&mut self) {
        self.paragraph = Some(RawParagraph {
            in_table: self.table_depth > 0,
            ..Default::default()
        });
        self.run = None;
        self.in_ppr = false;
        self.in_rpr = false;
        self.in_text = false;
    }

    fn close_paragraph(&mut self) {
        if let Some(paragraph) = self.paragraph.take() {
            self.content.paragraphs.push(paragraph);
        }
        self.run = None;
        self.in_ppr = false;
    }
}

fn blip_ref(e: &BytesStart<'_>) -> BlipRef {
    BlipRef {
        embed: get_attr(e, b"r:embed"),
        svg_embed: None,
    }
}

/// Walk the main document part.
pub fn parse_body(xml: &str) -> Result<BodyContent> {
    let mut reader = Reader::from_str(xml);
    let mut walker = Walker::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => walker.start(&e),
            Event::Empty(e) => walker.empty(&e),
            Event::End(e) => walker.end(e.name().as_ref()),
            Event::Text(e) => {
                if walker.in_text {
                    walker.text(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if walker.in_text {
                    walker.text(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(walker.content)
}
