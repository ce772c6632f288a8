pub mod error;
pub mod line_reader;
pub mod parse;

// Re-export commonly used types
pub use error::IoError;
pub use line_reader::{LineOutcome, LineRecordStream};
pub use parse::{LineError, RawTransactionRecord, ValidatedTransaction};
