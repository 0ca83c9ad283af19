use crate::core::types::PictogramId;
use thiserror::Error;

/// Corpus problems are configuration errors: they abort initialization and
/// are never recovered from at runtime.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus contains no pictograms")]
    Empty,
    #[error("pictogram {id} appears more than once in the corpus")]
    DuplicateId { id: PictogramId },
    #[error("pictogram {id} has no keywords")]
    MissingKeywords { id: PictogramId },
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse corpus: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure of an external suggestion collaborator (predictive model or
/// query generator). Surfaced to the caller as-is; the engine never
/// substitutes fabricated results.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("suggestion source unavailable: {0}")]
    Unavailable(String),
    #[error("suggestion source returned a malformed payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Codec(#[from] bincode::Error),
}
