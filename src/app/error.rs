use std::io;
use thiserror::Error;

use crate::io::IoError;
use crate::storage::StorageError;
use crate::streaming::IngestError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Input error: {0}")]
    Input(#[from] IoError),

    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}
