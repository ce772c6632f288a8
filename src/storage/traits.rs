use async_trait::async_trait;

use super::error::StorageError;
use super::query::{ClientFilter, Pagination, TransactionFilter, TransactionPage};
use crate::domain::{BulkWriteResult, Client, ClientId, ClientUpsert, TransactionUpsert};

/// Client persistence keyed by the natural key `document`
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Match on `document`, set `name` and `document`, create if absent.
    /// Returns the ids of clients created by this call.
    async fn bulk_upsert(&self, items: &[ClientUpsert]) -> Result<Vec<ClientId>, StorageError>;

    /// Fetch clients matching every set field of the filter
    async fn list(&self, filter: &ClientFilter) -> Result<Vec<Client>, StorageError>;
}

/// Transaction persistence keyed by the external `transaction_id`
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Match on `transaction_id`, set `client`, `date` and `amount`, create if absent
    async fn bulk_upsert(
        &self,
        items: Vec<TransactionUpsert>,
    ) -> Result<BulkWriteResult, StorageError>;

    /// Filtered, sorted, paginated read with client details attached
    async fn paginate(
        &self,
        filter: &TransactionFilter,
        pagination: &Pagination,
    ) -> Result<TransactionPage, StorageError>;
}
