use crate::error::Result;
use crate::gene::Gene;
use crate::gff::SequenceRegion;
use crate::svg::{escape_xml, selector_token};
use log::debug;

/// Feature type drawn on a track; everything else is ignored.
pub const GENE_TYPE: &str = "gene";

/// Labels are squashed back to a readable width; the x axis spans basepairs.
const LABEL_SCALE_X: u32 = 10_000;
const LABEL_Y: f64 = 0.2;
const BASELINE_Y: f64 = 0.5;

/// One sequence region drawn as a unit-height horizontal track.
#[derive(Debug, Clone)]
pub struct Chromosome<'a> {
    region: &'a SequenceRegion,
    id: String,
}

impl<'a> Chromosome<'a> {
    pub fn new(region: &'a SequenceRegion) -> Self {
        Chromosome {
            region,
            id: selector_token(region.name()),
        }
    }

    pub fn region(&self) -> &'a SequenceRegion {
        self.region
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Unmodified region name, used for the label.
    pub fn name(&self) -> &'a str {
        self.region.name()
    }

    /// Length in basepairs.
    pub fn extent(&self) -> u64 {
        self.region.end() - self.region.start() + 1
    }

    /// Gene features in file order. Fails on the first gene that cannot be
    /// drawn.
    pub fn genes(&self) -> Result<Vec<Gene<'a>>> {
        self.region
            .features()
            .iter()
            .filter(|feature| feature.feature_type() == GENE_TYPE)
            .map(Gene::new)
            .collect()
    }

    /// Renders the track shifted down by `offset` track heights.
    pub fn render(&self, offset: usize) -> Result<String> {
        let genes = self.genes()?;
        debug!("Track {}: {} with {} genes", offset, self.name(), genes.len());

        let mut s = format!(
            r#"<g transform="translate(0 {})" id="{}">"#,
            offset,
            escape_xml(&self.id)
        );
        s.push('\n');
        s.push_str(&format!(
            r#"<text y="{}" transform="scale({}, 1)" class="chromosome-name">{}</text>"#,
            LABEL_Y,
            LABEL_SCALE_X,
            escape_xml(self.name())
        ));
        s.push('\n');
        for gene in &genes {
            s.push_str(&gene.render());
            s.push('\n');
        }
        s.push_str(&format!(
            r#"<path d="M 0,{} h {}" class="chromosome"/>"#,
            BASELINE_Y,
            self.extent()
        ));
        s.push_str("</g>");
        Ok(s)
    }
}
