use std::io;
use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// IO-level errors for reading and parsing input lines
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Line reader error: {0}")]
    Reader(#[from] LinesCodecError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Input too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}
