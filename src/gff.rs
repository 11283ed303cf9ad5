//! GFF3 annotation model the renderers consume.
//!
//! Feature lines are read with `bio::io::gff`; this module only groups them
//! into sequence regions. Region extents come from `##sequence-region`
//! pragmas, which the record reader skips as comments, so they are collected
//! in a separate pass. Parent/child relations are not resolved.

use bio::io::gff::{self, GffType};
use bio_types::strand::Strand;
use log::{debug, info};
use rustc_hash::FxHashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Failure while reading a GFF3 file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not read annotation: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed feature line: {message}")]
    Record { message: String },
    #[error("feature on {seqid} has invalid interval {start}-{end}")]
    InvalidInterval { seqid: String, start: u64, end: u64 },
    #[error("line {line}: malformed ##sequence-region pragma")]
    InvalidSequenceRegion { line: usize },
}

/// One feature line.
#[derive(Debug, Clone)]
pub struct Feature {
    record: gff::Record,
}

impl Feature {
    fn new(record: gff::Record) -> Result<Self, ParseError> {
        let (start, end) = (*record.start(), *record.end());
        if start == 0 || end < start {
            return Err(ParseError::InvalidInterval {
                seqid: record.seqname().to_string(),
                start,
                end,
            });
        }
        Ok(Feature { record })
    }

    pub fn record(&self) -> &gff::Record {
        &self.record
    }

    pub fn seqid(&self) -> &str {
        self.record.seqname()
    }

    pub fn feature_type(&self) -> &str {
        self.record.feature_type()
    }

    /// 1-based, inclusive. Never 0.
    pub fn start(&self) -> u64 {
        *self.record.start()
    }

    /// 1-based, inclusive. Never smaller than `start`.
    pub fn end(&self) -> u64 {
        *self.record.end()
    }

    /// `None` unless the strand column is `+` or `-`.
    pub fn strand(&self) -> Option<Strand> {
        self.record.strand()
    }

    /// First value of a string-keyed attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.record.attributes().get(key).map(String::as_str)
    }
}

/// A named sequence (usually a chromosome) and the features annotated on it,
/// in file order, one per `ID`.
#[derive(Debug, Clone)]
pub struct SequenceRegion {
    name: String,
    start: u64,
    end: u64,
    declared: bool,
    features: Vec<Feature>,
    ids: FxHashMap<String, usize>,
}

impl SequenceRegion {
    fn new(name: &str, start: u64, end: u64, declared: bool) -> Self {
        SequenceRegion {
            name: name.to_string(),
            start,
            end,
            declared,
            features: Vec::new(),
            ids: FxHashMap::default(),
        }
    }

    fn push(&mut self, feature: Feature) {
        // Multi-line features share an ID; the first line stands for all.
        if let Some(id) = feature.attribute("ID") {
            if self.ids.contains_key(id) {
                debug!("Skipping repeated line for {} on {}", id, self.name);
                return;
            }
            self.ids.insert(id.to_string(), self.features.len());
        }
        // Regions without a pragma grow to cover their features.
        if !self.declared {
            self.end = self.end.max(feature.end());
        }
        self.features.push(feature);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Whether the extent came from a `##sequence-region` pragma.
    pub fn is_declared(&self) -> bool {
        self.declared
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Looks up a feature by its `ID` attribute.
    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.ids.get(id).map(|&idx| &self.features[idx])
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A parsed GFF3 file. Declared regions come first in pragma order, then
/// regions known only from their features in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    regions: Vec<SequenceRegion>,
    index: FxHashMap<String, usize>,
}

impl Annotation {
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        info!("Loading GFF file {:?}...", path);
        let text = fs::read_to_string(path)?;
        let annotation = Self::parse(&text)?;
        info!(
            "Found {} sequence regions, {} features",
            annotation.len(),
            annotation.regions.iter().map(SequenceRegion::len).sum::<usize>()
        );
        Ok(annotation)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ParseError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    fn parse(text: &str) -> Result<Self, ParseError> {
        let body = annotation_section(text);
        let mut annotation = Annotation::default();

        // First pass: region extents
        for (line_idx, line) in body.lines().enumerate() {
            if let Some(rest) = line.strip_prefix("##sequence-region") {
                annotation.declare_region(rest, line_idx + 1)?;
            }
        }

        // Second pass: feature records
        let mut reader = gff::Reader::new(body.as_bytes(), GffType::GFF3);
        for result in reader.records() {
            let record = result.map_err(|e| ParseError::Record {
                message: e.to_string(),
            })?;
            let feature = Feature::new(record)?;
            annotation.region_mut(feature.seqid()).push(feature);
        }

        Ok(annotation)
    }

    pub fn regions(&self) -> &[SequenceRegion] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&SequenceRegion> {
        self.index.get(name).map(|&idx| &self.regions[idx])
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn declare_region(&mut self, pragma: &str, line_no: usize) -> Result<(), ParseError> {
        let parts: Vec<&str> = pragma.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(ParseError::InvalidSequenceRegion { line: line_no });
        }
        // 1-based, so the extent `end - start + 1` always fits.
        let (start, end) = match (parts[1].parse::<u64>(), parts[2].parse::<u64>()) {
            (Ok(start), Ok(end)) if start >= 1 && end >= start => (start, end),
            _ => return Err(ParseError::InvalidSequenceRegion { line: line_no }),
        };

        if self.index.contains_key(parts[0]) {
            debug!(
                "Ignoring repeated ##sequence-region for {} at line {}",
                parts[0], line_no
            );
        } else {
            self.insert(SequenceRegion::new(parts[0], start, end, true));
        }
        Ok(())
    }

    fn region_mut(&mut self, name: &str) -> &mut SequenceRegion {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                debug!("No ##sequence-region for {}, spanning its features", name);
                self.insert(SequenceRegion::new(name, 1, 0, false));
                self.regions.len() - 1
            }
        };
        &mut self.regions[idx]
    }

    fn insert(&mut self, region: SequenceRegion) {
        self.index.insert(region.name.clone(), self.regions.len());
        self.regions.push(region);
    }
}

/// Everything before an embedded `##FASTA` section.
fn annotation_section(text: &str) -> &str {
    if text.starts_with("##FASTA") {
        return "";
    }
    match text.find("\n##FASTA") {
        Some(idx) => &text[..idx + 1],
        None => text,
    }
}
