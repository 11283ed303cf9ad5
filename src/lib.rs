//! Render a genome annotation (GFF3) as an SVG drawing: one horizontal line per
//! chromosome, with colored boxes for genes, flipped above or below the line by
//! strand.
//!
//! ```no_run
//! use geneflock::{ChromosomeFilter, Drawing, Genome, StrandColors};
//! use std::path::Path;
//!
//! let genome = Genome::from_path(
//!     Path::new("genome.gff3"),
//!     ChromosomeFilter::default(),
//!     StrandColors::default(),
//! )?;
//! let svg = genome.render()?;
//! # Ok::<(), geneflock::Error>(())
//! ```

pub mod chromosome;
pub mod error;
pub mod gene;
pub mod genome;
pub mod gff;
pub mod highlight;
pub mod svg;

pub use chromosome::Chromosome;
pub use error::{Error, Result};
pub use gene::{Direction, Gene, GeneBox};
pub use genome::{ChromosomeFilter, Genome, StrandColors};
pub use gff::{Annotation, Feature, ParseError, SequenceRegion};
pub use highlight::{load_highlight_ids, HighlightedGenome};

/// Something that renders to a complete SVG document.
pub trait Drawing {
    /// Contents of the embedded `<style>` block.
    fn style(&self) -> String;

    fn render(&self) -> Result<String>;
}
