use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::batch::Batch;
use super::error::EngineError;
use super::reconciler::ClientReconciler;
use super::upserter::TransactionUpserter;
use crate::domain::BulkWriteResult;
use crate::storage::{ClientStore, TransactionStore};

/// Runs one batch through client reconciliation and the transaction upsert
#[derive(Clone)]
pub struct BatchProcessor {
    reconciler: ClientReconciler,
    upserter: TransactionUpserter,
}

impl BatchProcessor {
    /// Create a new batch processor over the given stores
    pub fn new(clients: Arc<dyn ClientStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        Self {
            reconciler: ClientReconciler::new(clients),
            upserter: TransactionUpserter::new(transactions),
        }
    }

    /// Process a single batch
    ///
    /// Client resolution always completes before any transaction of the batch
    /// is written.
    pub async fn process(&self, batch: Batch) -> Result<BulkWriteResult, EngineError> {
        let Batch {
            sequence,
            clients,
            transactions,
        } = batch;

        let started = Instant::now();
        let ids = self.reconciler.reconcile(&clients).await?;
        debug!(
            sequence,
            clients = clients.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Bulk upserted clients"
        );

        let started = Instant::now();
        let count = transactions.len();
        let linked = TransactionUpserter::link(transactions, &ids);
        let result = self.upserter.upsert(linked).await?;
        debug!(
            sequence,
            transactions = count,
            inserted = result.inserted_count,
            modified = result.modified_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Bulk upserted transactions"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientUpsert, TransactionUpsert};
    use crate::engine::batch::PendingTransaction;
    use crate::storage::{
        ConcurrentClientStore, ConcurrentTransactionStore, Pagination, StorageError,
        TransactionFilter, TransactionPage,
    };
    use async_trait::async_trait;

    struct RejectingTransactionStore;

    #[async_trait]
    impl TransactionStore for RejectingTransactionStore {
        async fn bulk_upsert(
            &self,
            _: Vec<TransactionUpsert>,
        ) -> Result<BulkWriteResult, StorageError> {
            Err(StorageError::Unavailable("write timeout".to_string()))
        }

        async fn paginate(
            &self,
            _: &TransactionFilter,
            _: &Pagination,
        ) -> Result<TransactionPage, StorageError> {
            Err(StorageError::Unavailable("read timeout".to_string()))
        }
    }

    fn batch(lines: &[(&str, &str, &str)]) -> Batch {
        Batch {
            sequence: 0,
            clients: lines
                .iter()
                .map(|(_, name, doc)| ClientUpsert::new(*name, *doc))
                .collect(),
            transactions: lines
                .iter()
                .map(|(id, _, doc)| PendingTransaction {
                    transaction_id: id.to_string(),
                    document: doc.to_string(),
                    date: "2024-01-01".to_string(),
                    amount: "1000".to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn process_links_transactions_to_clients() {
        let clients = Arc::new(ConcurrentClientStore::new());
        let transactions = Arc::new(ConcurrentTransactionStore::new(clients.clone()));
        let processor = BatchProcessor::new(clients.clone(), transactions.clone());

        let result = processor
            .process(batch(&[("1", "Ana", "111"), ("2", "Bob", "222"), ("3", "Ana", "111")]))
            .await
            .unwrap();

        assert_eq!(result.total_processed, 3);
        assert_eq!(result.inserted_count, 3);
        assert_eq!(clients.len(), 2);
        assert_eq!(
            transactions.get("3").unwrap().client,
            clients.get("111").unwrap().id
        );
        assert_eq!(
            transactions.get("2").unwrap().client,
            clients.get("222").unwrap().id
        );
    }

    #[tokio::test]
    async fn client_writes_survive_transaction_failure() {
        let clients = Arc::new(ConcurrentClientStore::new());
        let processor = BatchProcessor::new(clients.clone(), Arc::new(RejectingTransactionStore));

        let result = processor.process(batch(&[("1", "Ana", "111")])).await;

        assert!(matches!(
            result,
            Err(EngineError::Storage(StorageError::Unavailable(_)))
        ));
        // No atomicity across the two phases
        assert_eq!(clients.len(), 1);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let clients = Arc::new(ConcurrentClientStore::new());
        let processor = BatchProcessor::new(clients.clone(), Arc::new(RejectingTransactionStore));

        let result = processor.process(Batch::default()).await.unwrap();

        assert_eq!(result, BulkWriteResult::default());
        assert!(clients.is_empty());
    }
}
