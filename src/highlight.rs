use crate::error::{Error, Result};
use crate::genome::Genome;
use crate::svg::selector_token;
use crate::Drawing;
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const DEFAULT_HIGHLIGHT_COLOR: &str = "green";

/// A [`Genome`] whose listed genes are filled with a highlight color.
///
/// Gene selection and the base style are left untouched; the highlight is a
/// single extra style rule appended after them, so it wins over the strand
/// colors. Unknown identifiers simply match nothing.
#[derive(Debug)]
pub struct HighlightedGenome {
    genome: Genome,
    ids: Vec<String>,
    color: String,
}

impl HighlightedGenome {
    pub fn new(genome: Genome, ids: Vec<String>, color: impl Into<String>) -> Self {
        HighlightedGenome {
            genome,
            ids,
            color: color.into(),
        }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Raw identifiers, in the order given.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// `#a,#b{ fill: color; }`, or `None` when there is nothing to highlight.
    pub fn rule(&self) -> Option<String> {
        if self.ids.is_empty() {
            return None;
        }
        let selectors: Vec<String> = self
            .ids
            .iter()
            .map(|id| format!("#{}", selector_token(id)))
            .collect();
        Some(format!("{}{{ fill: {}; }}", selectors.join(","), self.color))
    }
}

impl Drawing for HighlightedGenome {
    fn style(&self) -> String {
        let mut style = self.genome.style();
        if let Some(rule) = self.rule() {
            style.push_str(&rule);
        }
        style
    }

    fn render(&self) -> Result<String> {
        info!("Highlighting {} genes in {}", self.ids.len(), self.color);
        self.genome.render_with_style(&self.style())
    }
}

/// Reads gene identifiers, one per line. Surrounding whitespace is stripped
/// and blank lines are skipped.
pub fn load_highlight_ids(path: &Path) -> Result<Vec<String>> {
    let io_error = |source| Error::HighlightList {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let reader = BufReader::new(file);
    let mut ids = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(io_error)?;
        let line = line.trim();
        if !line.is_empty() {
            ids.push(line.to_string());
        }
    }

    debug!("Read {} highlight ids from {:?}", ids.len(), path);
    Ok(ids)
}
