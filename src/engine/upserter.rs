use std::sync::Arc;

use tracing::warn;

use super::batch::PendingTransaction;
use super::error::EngineError;
use super::reconciler::ClientIdMap;
use crate::domain::{BulkWriteResult, TransactionUpsert};
use crate::storage::TransactionStore;

/// Links transaction candidates to resolved clients and writes them in bulk
#[derive(Clone)]
pub struct TransactionUpserter {
    store: Arc<dyn TransactionStore>,
}

impl TransactionUpserter {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Rewrite each candidate's client reference from document to surrogate id
    ///
    /// A document missing from `ids` leaves an empty reference, which the
    /// store rejects when the batch is written.
    pub fn link(pending: Vec<PendingTransaction>, ids: &ClientIdMap) -> Vec<TransactionUpsert> {
        pending
            .into_iter()
            .map(|tx| {
                let client = ids.get(&tx.document).copied();
                if client.is_none() {
                    warn!(
                        transaction_id = %tx.transaction_id,
                        document = %tx.document,
                        "No client id for document"
                    );
                }
                TransactionUpsert {
                    transaction_id: tx.transaction_id,
                    client,
                    date: tx.date,
                    amount: tx.amount,
                }
            })
            .collect()
    }

    /// Idempotent bulk write keyed by transaction id
    pub async fn upsert(
        &self,
        transactions: Vec<TransactionUpsert>,
    ) -> Result<BulkWriteResult, EngineError> {
        if transactions.is_empty() {
            return Ok(BulkWriteResult::default());
        }
        Ok(self.store.bulk_upsert(transactions).await?)
    }
}
