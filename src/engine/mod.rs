pub mod batch;
pub mod error;
pub mod processor;
pub mod reconciler;
pub mod upserter;

// Re-export commonly used types
pub use batch::{Batch, BatchAccumulator, PendingTransaction};
pub use error::EngineError;
pub use processor::BatchProcessor;
pub use reconciler::{ClientIdMap, ClientReconciler, distinct_last_wins};
pub use upserter::TransactionUpserter;
