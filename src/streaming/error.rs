use thiserror::Error;

use crate::engine::EngineError;
use crate::io::IoError;

/// Errors that abort an ingestion run
#[derive(Error, Debug)]
pub enum IngestError {
    /// The input could not be read; no further batches are dispatched
    #[error("Read error: {0}")]
    Read(#[from] IoError),

    /// A dispatched batch failed; the run reports no partial totals
    #[error("Batch {sequence} failed: {source}")]
    Batch {
        sequence: usize,
        source: EngineError,
    },
}
