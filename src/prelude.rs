//! Prelude module for convenient imports
//!
//! Import everything you need with: `use ingest::prelude::*;`

// Domain types
pub use crate::domain::{
    BulkWriteResult, Client, ClientId, ClientUpsert, DomainError, Transaction, TransactionUpsert,
};

// Storage types
pub use crate::storage::{
    ClientFilter, ClientStore, ConcurrentClientStore, ConcurrentTransactionStore, Pagination,
    Sort, SortField, SortOrder, StorageError, TransactionFilter, TransactionPage, TransactionStore,
};

// Engine types
pub use crate::engine::{BatchAccumulator, BatchProcessor, EngineError};

// IO types
pub use crate::io::{IoError, LineError, LineOutcome, LineRecordStream, ValidatedTransaction};

// Streaming types
pub use crate::streaming::{
    IngestError, IngestPipeline, IngestReport, IngestSummary, LineErrorPolicy, LogAndSkip,
    SilentSkip,
};

// App types
pub use crate::app::{AppError, CliApp, CliArgs, Config, setup_logging};
