use crate::chromosome::Chromosome;
use crate::error::{Error, Result};
use crate::gff::Annotation;
use crate::svg::escape_xml;
use crate::Drawing;
use log::{debug, info};
use std::fmt;
use std::path::Path;

/// Chromosomes must be strictly longer than this to be drawn by default.
pub const DEFAULT_MIN_EXTENT: u64 = 100_000;

/// Pixel size of the root element relative to the view box.
const HEIGHT_SCALE: u64 = 100;
const WIDTH_SCALE: f64 = 100.0;

/// Decides which chromosomes get a track. Fixed once the genome is built.
pub struct ChromosomeFilter(Box<dyn Fn(&Chromosome<'_>) -> bool>);

impl ChromosomeFilter {
    pub fn new(predicate: impl Fn(&Chromosome<'_>) -> bool + 'static) -> Self {
        ChromosomeFilter(Box::new(predicate))
    }

    /// Keeps chromosomes with extent strictly greater than `min_extent`.
    pub fn longer_than(min_extent: u64) -> Self {
        Self::new(move |chromosome| chromosome.extent() > min_extent)
    }

    pub fn all() -> Self {
        Self::new(|_| true)
    }

    pub fn accepts(&self, chromosome: &Chromosome<'_>) -> bool {
        (self.0)(chromosome)
    }
}

impl Default for ChromosomeFilter {
    fn default() -> Self {
        Self::longer_than(DEFAULT_MIN_EXTENT)
    }
}

impl fmt::Debug for ChromosomeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChromosomeFilter(..)")
    }
}

/// Fill colors for the two strands, as CSS color values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrandColors {
    pub forward: String,
    pub reverse: String,
}

impl StrandColors {
    pub fn new(forward: impl Into<String>, reverse: impl Into<String>) -> Self {
        StrandColors {
            forward: forward.into(),
            reverse: reverse.into(),
        }
    }
}

impl Default for StrandColors {
    fn default() -> Self {
        StrandColors::new("red", "blue")
    }
}

/// A whole annotation drawn as stacked chromosome tracks.
///
/// Holds at least one chromosome; construction fails with
/// [`Error::EmptyChromosomeSet`] otherwise.
#[derive(Debug)]
pub struct Genome {
    annotation: Annotation,
    included: Vec<usize>,
    width: u64,
    colors: StrandColors,
}

impl Genome {
    pub fn new(annotation: Annotation, filter: ChromosomeFilter, colors: StrandColors) -> Result<Self> {
        let mut included = Vec::new();
        for (idx, region) in annotation.regions().iter().enumerate() {
            if region.is_empty() {
                debug!("Skipping {}: no features", region.name());
                continue;
            }
            let chromosome = Chromosome::new(region);
            if filter.accepts(&chromosome) {
                included.push(idx);
            } else {
                debug!(
                    "Excluding {} ({} bp) by chromosome filter",
                    chromosome.name(),
                    chromosome.extent()
                );
            }
        }

        let width = included
            .iter()
            .map(|&idx| Chromosome::new(&annotation.regions()[idx]).extent())
            .max()
            .ok_or(Error::EmptyChromosomeSet)?;

        info!(
            "Drawing {} of {} sequence regions, longest {} bp",
            included.len(),
            annotation.len(),
            width
        );

        Ok(Genome {
            annotation,
            included,
            width,
            colors,
        })
    }

    /// Parses the GFF3 file at `path` and builds the genome from it.
    pub fn from_path(path: &Path, filter: ChromosomeFilter, colors: StrandColors) -> Result<Self> {
        let annotation = Annotation::from_path(path)?;
        Self::new(annotation, filter, colors)
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn colors(&self) -> &StrandColors {
        &self.colors
    }

    /// Included chromosomes, in annotation order.
    pub fn chromosomes(&self) -> impl Iterator<Item = Chromosome<'_>> + '_ {
        self.included
            .iter()
            .map(move |&idx| Chromosome::new(&self.annotation.regions()[idx]))
    }

    /// Number of tracks.
    pub fn height(&self) -> usize {
        self.included.len()
    }

    /// Extent of the longest included chromosome, in basepairs.
    pub fn width(&self) -> u64 {
        self.width
    }

    pub(crate) fn render_with_style(&self, style: &str) -> Result<String> {
        let mut svg = String::new();

        svg.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg viewBox="0 0 {} {}" preserveAspectRatio="none" xmlns="http://www.w3.org/2000/svg" height="{}" width="{}">
"#,
            self.width(),
            self.height(),
            self.height() as u64 * HEIGHT_SCALE,
            self.width() as f64 / WIDTH_SCALE
        ));
        // Selectors carry raw gene ids, which may contain markup characters.
        svg.push_str(&format!("<style>{}</style>\n", escape_xml(style)));
        svg.push_str(r#"<rect height="100%" width="100%" class="background"/>"#);
        svg.push('\n');

        for (offset, chromosome) in self.chromosomes().enumerate() {
            svg.push_str(&chromosome.render(offset)?);
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

impl Drawing for Genome {
    fn style(&self) -> String {
        style_sheet(&self.colors)
    }

    fn render(&self) -> Result<String> {
        self.render_with_style(&self.style())
    }
}

fn style_sheet(colors: &StrandColors) -> String {
    format!(
        r#"
.background {{
    fill: white;
}}

.chromosome {{
    stroke: black;
    stroke-width: 0.1px;
    zorder: 100;
}}

.gene {{
    height: 0.25px;
}}

.left-right {{
    fill: {forward};
}}

.right-left {{
    fill: {reverse};
}}

.chromosome-name {{
    font-size: 0.25px;
    font-family: sans-serif;
}}
"#,
        forward = colors.forward,
        reverse = colors.reverse
    )
}
