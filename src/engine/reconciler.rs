use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::error::EngineError;
use crate::domain::{ClientId, ClientUpsert};
use crate::storage::{ClientFilter, ClientStore};

/// Resolved `document -> surrogate id` mapping for one batch
pub type ClientIdMap = HashMap<String, ClientId>;

/// Resolves client natural keys to store identifiers in two explicit phases:
/// bulk upsert, then bulk read-back by document.
#[derive(Clone)]
pub struct ClientReconciler {
    store: Arc<dyn ClientStore>,
}

impl ClientReconciler {
    pub fn new(store: Arc<dyn ClientStore>) -> Self {
        Self { store }
    }

    /// Upsert the batch's clients and return an id for every document in it
    ///
    /// Fails if either store call fails or a document is absent from the
    /// read-back; no partial mapping is ever returned.
    pub async fn reconcile(&self, batch: &[ClientUpsert]) -> Result<ClientIdMap, EngineError> {
        if batch.is_empty() {
            return Ok(ClientIdMap::new());
        }

        let distinct = distinct_last_wins(batch);
        let created = self.store.bulk_upsert(&distinct).await?;

        let documents = distinct.iter().map(|c| c.document.clone()).collect();
        let clients = self.store.list(&ClientFilter::by_documents(documents)).await?;

        let ids: ClientIdMap = clients.into_iter().map(|c| (c.document, c.id)).collect();

        if let Some(missing) = distinct.iter().find(|c| !ids.contains_key(&c.document)) {
            warn!(document = %missing.document, "Client missing from read-back");
            return Err(EngineError::UnresolvedClient(missing.document.clone()));
        }

        debug!(
            lines = batch.len(),
            distinct = distinct.len(),
            created = created.len(),
            "Clients reconciled"
        );
        Ok(ids)
    }
}

/// One upsert per document, in first-seen order, carrying the last name seen
pub fn distinct_last_wins(batch: &[ClientUpsert]) -> Vec<ClientUpsert> {
    let mut position: HashMap<&str, usize> = HashMap::with_capacity(batch.len());
    let mut distinct: Vec<ClientUpsert> = Vec::new();

    for item in batch {
        match position.get(item.document.as_str()) {
            Some(&i) => distinct[i].name.clone_from(&item.name),
            None => {
                position.insert(item.document.as_str(), distinct.len());
                distinct.push(item.clone());
            }
        }
    }

    distinct
}
