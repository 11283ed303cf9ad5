use crate::error::{Error, Result};
use crate::gff::Feature;
use crate::svg::{escape_xml, selector_token};
use bio_types::strand::Strand;
use std::fmt;

/// Attribute holding the gene identifier.
pub const ID_ATTRIBUTE: &str = "ID";

/// Gene boxes sit half a track below the track top, a quarter track high.
const BOX_Y: f64 = 0.5;
const BOX_HEIGHT: f64 = 0.25;

/// Reading direction of a gene along its chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftRight,
    RightLeft,
}

impl Direction {
    pub fn from_strand(strand: Option<Strand>) -> Option<Self> {
        match strand {
            Some(Strand::Forward) => Some(Direction::LeftRight),
            Some(Strand::Reverse) => Some(Direction::RightLeft),
            _ => None,
        }
    }

    /// CSS class token.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::LeftRight => "left-right",
            Direction::RightLeft => "right-left",
        }
    }

    /// Vertical scale of the box transform. Forward genes are mirrored
    /// around the baseline so they sit above it.
    pub fn flip(self) -> f64 {
        match self {
            Direction::LeftRight => -1.0,
            Direction::RightLeft => 1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `gene` feature, validated for drawing.
#[derive(Debug, Clone)]
pub struct Gene<'a> {
    feature: &'a Feature,
    id: String,
    direction: Direction,
}

impl<'a> Gene<'a> {
    pub fn new(feature: &'a Feature) -> Result<Self> {
        let raw_id = feature
            .attribute(ID_ATTRIBUTE)
            .ok_or_else(|| Error::MissingAttribute {
                attribute: ID_ATTRIBUTE,
                feature_type: feature.feature_type().to_string(),
                seqid: feature.seqid().to_string(),
                start: feature.start(),
                end: feature.end(),
            })?;
        let direction =
            Direction::from_strand(feature.strand()).ok_or_else(|| Error::InvalidStrand {
                id: raw_id.to_string(),
            })?;

        Ok(Gene {
            feature,
            id: selector_token(raw_id),
            direction,
        })
    }

    pub fn feature(&self) -> &'a Feature {
        self.feature
    }

    /// Length in basepairs.
    pub fn extent(&self) -> u64 {
        self.feature.end() - self.feature.start() + 1
    }

    /// Element id, safe to use as a CSS selector.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn shape(&self) -> GeneBox {
        GeneBox {
            x: self.feature.start() - 1,
            y: BOX_Y,
            width: self.extent(),
            height: BOX_HEIGHT,
            direction: self.direction,
            id: self.id.clone(),
        }
    }

    pub fn render(&self) -> String {
        self.shape().to_string()
    }
}

/// The rectangle drawn for a gene, in track-local coordinates (x in
/// basepairs from 0, y in track units).
#[derive(Debug, Clone, PartialEq)]
pub struct GeneBox {
    pub x: u64,
    pub y: f64,
    pub width: u64,
    pub height: f64,
    pub direction: Direction,
    pub id: String,
}

impl GeneBox {
    /// Reflection around the baseline, translated back so the box stays
    /// adjacent to it.
    pub fn transform(&self) -> String {
        let d = self.direction.flip();
        let f = (1.0 - d) * 0.5;
        format!("matrix(1, 0, 0, {}, 0, {})", d, f)
    }
}

impl fmt::Display for GeneBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<rect x="{}" y="{}" width="{}" height="{}" transform="{}" class="gene {}" id="{}"/>"#,
            self.x,
            self.y,
            self.width,
            self.height,
            self.transform(),
            self.direction,
            escape_xml(&self.id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gff::Annotation;

    fn annotation(lines: &str) -> Annotation {
        Annotation::from_reader(lines.as_bytes()).unwrap()
    }

    fn first_feature(annotation: &Annotation) -> &Feature {
        &annotation.regions()[0].features()[0]
    }

    #[test]
    fn test_forward_gene() {
        let ann = annotation("chr1\tsrc\tgene\t1000\t2000\t.\t+\t.\tID=g1\n");
        let gene = Gene::new(first_feature(&ann)).unwrap();
        assert_eq!(gene.extent(), 1001);
        assert_eq!(gene.id(), "g1");
        assert_eq!(gene.direction(), Direction::LeftRight);

        let shape = gene.shape();
        assert_eq!(shape.x, 999);
        assert_eq!(shape.width, 1001);
        assert_eq!(shape.transform(), "matrix(1, 0, 0, -1, 0, 1)");
        assert_eq!(
            gene.render(),
            r#"<rect x="999" y="0.5" width="1001" height="0.25" transform="matrix(1, 0, 0, -1, 0, 1)" class="gene left-right" id="g1"/>"#
        );
    }

    #[test]
    fn test_reverse_gene() {
        let ann = annotation("chr1\tsrc\tgene\t7\t7\t.\t-\t.\tID=AT1G.2\n");
        let gene = Gene::new(first_feature(&ann)).unwrap();
        assert_eq!(gene.extent(), 1);
        assert_eq!(gene.id(), "AT1G_2");
        assert_eq!(gene.direction(), Direction::RightLeft);
        assert_eq!(gene.shape().transform(), "matrix(1, 0, 0, 1, 0, 0)");
        assert!(gene.render().contains(r#"class="gene right-left" id="AT1G_2""#));
    }

    #[test]
    fn test_box_geometry_ignores_strand() {
        let ann = annotation(
            "chr1\tsrc\tgene\t10\t20\t.\t+\t.\tID=a\nchr1\tsrc\tgene\t10\t20\t.\t-\t.\tID=b\n",
        );
        let features = ann.regions()[0].features();
        let fwd = Gene::new(&features[0]).unwrap().shape();
        let rev = Gene::new(&features[1]).unwrap().shape();
        assert_eq!((fwd.x, fwd.y, fwd.width, fwd.height), (rev.x, rev.y, rev.width, rev.height));
    }

    #[test]
    fn test_invalid_strand() {
        let ann = annotation("chr1\tsrc\tgene\t10\t20\t.\t.\t.\tID=g.9\n");
        match Gene::new(first_feature(&ann)) {
            Err(Error::InvalidStrand { id }) => assert_eq!(id, "g.9"),
            other => panic!("expected InvalidStrand, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_id() {
        let ann = annotation("chr1\tsrc\tgene\t10\t20\t.\t+\t.\tName=nameless\n");
        let err = Gene::new(first_feature(&ann)).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute {
                attribute: "ID",
                start: 10,
                end: 20,
                ..
            }
        ));
    }

    #[test]
    fn test_id_is_escaped_in_markup() {
        let ann = annotation("chr1\tsrc\tgene\t1\t5\t.\t+\t.\tID=a&b\n");
        let gene = Gene::new(first_feature(&ann)).unwrap();
        assert_eq!(gene.id(), "a&b");
        assert!(gene.render().contains(r#"id="a&amp;b""#));
    }
}
