//! Image inventory of the main document part.

use std::collections::BTreeSet;

use super::body::BlipRef;
use super::package::{Relationships, REL_IMAGE};

/// Images referenced from the main document part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageInventory {
    /// Distinct embedded media parts, sorted
    pub targets: BTreeSet<String>,
    /// SVG parts that are alternates of a raster picture
    pub svg_alternates: BTreeSet<String>,
}

impl ImageInventory {
    /// Build the inventory from the main part's relationships and the
    /// pictures found in the body.
    ///
    /// Every internal image relationship counts once per target part. An SVG
    /// attached to a picture through `asvg:svgBlip` is the same image as the
    /// picture's raster fallback and is recorded as an alternate.
    pub fn collect(relationships: &Relationships, blips: &[BlipRef]) -> Self {
        let targets: BTreeSet<String> = relationships
            .of_type(REL_IMAGE)
            .filter(|r| !r.external)
            .map(|r| r.target.clone())
            .collect();

        let image_target = |id: &Option<String>| {
            id.as_deref()
                .and_then(|id| relationships.get(id))
                .filter(|r| !r.external && r.is_type(REL_IMAGE))
                .map(|r| r.target.clone())
        };

        let mut svg_alternates = BTreeSet::new();
        for blip in blips {
            if let (Some(raster), Some(svg)) = (image_target(&blip.embed), image_target(&blip.svg_embed)) {
                if raster != svg {
                    svg_alternates.insert(svg);
                }
            }
        }

        Self {
            targets,
            svg_alternates,
        }
    }

    /// Number of distinct images.
    pub fn total(&self) -> usize {
        self.targets.len()
    }

    /// Number of images once SVG alternates are collapsed.
    pub fn unique(&self) -> usize {
        self.targets.len() - self.svg_alternates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::package::parse_relationships;

    const RELS_XML: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
  <Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image2.svg"/>
  <Relationship Id="rId6" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image3.jpeg"/>
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image3.jpeg"/>
  <Relationship Id="rId8" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="http://example.com/logo.png" TargetMode="External"/>
</Relationships>"#;

    fn blip(embed: &str, svg: Option<&str>) -> BlipRef {
        BlipRef {
            embed: Some(embed.to_string()),
            svg_embed: svg.map(str::to_string),
        }
    }

    #[test]
    fn test_distinct_internal_targets() {
        let rels = parse_relationships(RELS_XML, "word/document.xml").unwrap();
        let inventory = ImageInventory::collect(&rels, &[]);
        assert_eq!(inventory.total(), 3);
        assert_eq!(inventory.unique(), 3);
    }

    #[test]
    fn test_svg_alternate_collapsed() {
        let rels = parse_relationships(RELS_XML, "word/document.xml").unwrap();
        let blips = vec![blip("rId4", Some("rId5")), blip("rId6", None)];
        let inventory = ImageInventory::collect(&rels, &blips);
        assert_eq!(inventory.total(), 3);
        assert_eq!(inventory.unique(), 2);
        assert!(inventory.svg_alternates.contains("word/media/image2.svg"));
    }

    #[test]
    fn test_unknown_blip_ids_ignored() {
        let rels = parse_relationships(RELS_XML, "word/document.xml").unwrap();
        let blips = vec![blip("rId99", Some("rId5")), blip("rId1", Some("rId5"))];
        let inventory = ImageInventory::collect(&rels, &blips);
        assert_eq!(inventory.unique(), 3);
    }

    #[test]
    fn test_no_images() {
        let inventory = ImageInventory::collect(&Relationships::default(), &[]);
        assert_eq!(inventory.total(), 0);
        assert_eq!(inventory.unique(), 0);
    }
}
