use thiserror::Error;

use crate::storage::StorageError;

/// Engine-level errors for batch reconciliation and upsert
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Client document not resolved after upsert: {0}")]
    UnresolvedClient(String),

    #[error("Batch task failed: {0}")]
    BatchTask(String),
}
