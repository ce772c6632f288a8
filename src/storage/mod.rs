pub mod concurrent_client_store;
pub mod concurrent_transaction_store;
pub mod error;
pub mod query;
pub mod traits;

// Re-export commonly used types
pub use concurrent_client_store::ConcurrentClientStore;
pub use concurrent_transaction_store::ConcurrentTransactionStore;
pub use error::StorageError;
pub use query::{
    ClientFilter, ClientSummary, Pagination, Sort, SortField, SortOrder, TransactionFilter,
    TransactionPage, TransactionView,
};
pub use traits::{ClientStore, TransactionStore};
