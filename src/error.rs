use crate::gff::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a render. None of these leave partial output.
#[derive(Debug, Error)]
pub enum Error {
    #[error("gene {id} is on neither the '+' nor the '-' strand")]
    InvalidStrand { id: String },

    #[error("no chromosomes met the inclusion criteria")]
    EmptyChromosomeSet,

    #[error("{feature_type} feature at {seqid}:{start}-{end} has no {attribute} attribute")]
    MissingAttribute {
        attribute: &'static str,
        feature_type: String,
        seqid: String,
        start: u64,
        end: u64,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("could not read highlight list {}", path.display())]
    HighlightList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
