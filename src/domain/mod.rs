pub mod client;
pub mod error;
pub mod transaction;

// Re-export commonly used types
pub use client::{Client, ClientId, ClientUpsert};
pub use error::DomainError;
pub use transaction::{
    BulkWriteResult, Transaction, TransactionFields, TransactionUpsert, parse_date,
};
