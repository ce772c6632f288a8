pub mod error;
pub mod policy;
pub mod processor;
pub mod report;

// Re-export commonly used types
pub use error::IngestError;
pub use policy::{LineErrorPolicy, LogAndSkip, SilentSkip};
pub use processor::IngestPipeline;
pub use report::{IngestReport, IngestSummary};
