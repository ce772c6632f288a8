use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, Entry};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::error::StorageError;
use super::query::ClientFilter;
use super::traits::ClientStore;
use crate::domain::{Client, ClientId, ClientUpsert};

/// Concurrent in-memory client store using DashMap, keyed by document
pub struct ConcurrentClientStore {
    clients: DashMap<String, Client>,
    // Secondary index for lookups by surrogate key
    documents_by_id: DashMap<ClientId, String>,
}

impl ConcurrentClientStore {
    /// Create a new empty client store
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
            documents_by_id: DashMap::new(),
        }
    }

    /// Number of stored clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Look up a single client by document
    pub fn get(&self, document: &str) -> Option<Client> {
        self.clients.get(document).map(|r| r.value().clone())
    }
}

impl Default for ConcurrentClientStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile a case-insensitive name pattern
pub(crate) fn name_matcher(pattern: &str) -> Result<Regex, StorageError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| StorageError::InvalidQuery(format!("name pattern: {e}")))
}

#[async_trait]
impl ClientStore for ConcurrentClientStore {
    async fn bulk_upsert(&self, items: &[ClientUpsert]) -> Result<Vec<ClientId>, StorageError> {
        let now = Utc::now();
        let mut created = Vec::new();
        let mut renamed = 0usize;

        // Items apply in order, so a repeated document ends with its last name
        for item in items {
            match self.clients.entry(item.document.clone()) {
                Entry::Occupied(mut e) => {
                    if e.get_mut().rename(&item.name, now) {
                        renamed += 1;
                    }
                }
                Entry::Vacant(e) => {
                    let client = Client::new(item, now);
                    created.push(client.id);
                    self.documents_by_id
                        .insert(client.id, client.document.clone());
                    e.insert(client);
                }
            }
        }

        debug!(
            items = items.len(),
            created = created.len(),
            renamed,
            "Clients upserted"
        );
        Ok(created)
    }

    async fn list(&self, filter: &ClientFilter) -> Result<Vec<Client>, StorageError> {
        let name = filter.name.as_deref().map(name_matcher).transpose()?;

        let documents: Option<HashSet<&str>> = filter
            .documents
            .as_ref()
            .filter(|docs| !docs.is_empty())
            .map(|docs| docs.iter().map(String::as_str).collect());
        let ids: Option<HashSet<ClientId>> = filter
            .ids
            .as_ref()
            .filter(|ids| !ids.is_empty())
            .map(|ids| ids.iter().copied().collect());

        let candidates: Vec<Client> = match (&documents, &ids) {
            (Some(docs), _) => docs.iter().filter_map(|doc| self.get(doc)).collect(),
            (None, Some(ids)) => ids
                .iter()
                .filter_map(|id| self.documents_by_id.get(id).map(|d| d.value().clone()))
                .filter_map(|doc| self.get(&doc))
                .collect(),
            (None, None) => self.clients.iter().map(|r| r.value().clone()).collect(),
        };

        Ok(candidates
            .into_iter()
            .filter(|c| ids.as_ref().is_none_or(|ids| ids.contains(&c.id)))
            .filter(|c| name.as_ref().is_none_or(|re| re.is_match(&c.name)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn upserts(items: &[(&str, &str)]) -> Vec<ClientUpsert> {
        items
            .iter()
            .map(|(name, doc)| ClientUpsert::new(*name, *doc))
            .collect()
    }

    #[tokio::test]
    async fn bulk_upsert_creates_new_clients() {
        let store = ConcurrentClientStore::new();

        let created = store
            .bulk_upsert(&upserts(&[("Ana", "111"), ("Bob", "222")]))
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("111").unwrap().name, "Ana");
    }

    #[tokio::test]
    async fn bulk_upsert_returns_only_created_ids() {
        let store = ConcurrentClientStore::new();
        store.bulk_upsert(&upserts(&[("Ana", "111")])).await.unwrap();

        let created = store
            .bulk_upsert(&upserts(&[("Ana", "111"), ("Bob", "222")]))
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0], store.get("222").unwrap().id);
    }

    #[tokio::test]
    async fn repeated_document_keeps_last_name() {
        let store = ConcurrentClientStore::new();

        store
            .bulk_upsert(&upserts(&[("Ana", "111"), ("Ana Maria", "111"), ("A. M.", "111")]))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("111").unwrap().name, "A. M.");
    }

    #[tokio::test]
    async fn upsert_keeps_surrogate_key_stable() {
        let store = ConcurrentClientStore::new();
        store.bulk_upsert(&upserts(&[("Ana", "111")])).await.unwrap();
        let first = store.get("111").unwrap().id;

        store.bulk_upsert(&upserts(&[("Ana B", "111")])).await.unwrap();

        assert_eq!(store.get("111").unwrap().id, first);
    }

    #[tokio::test]
    async fn unchanged_name_keeps_updated_at() {
        let store = ConcurrentClientStore::new();
        store.bulk_upsert(&[ClientUpsert::new("Ana", "111")]).await.unwrap();
        let before = store.get("111").unwrap();

        store.bulk_upsert(&[ClientUpsert::new("Ana", "111")]).await.unwrap();
        assert_eq!(store.get("111").unwrap().updated_at, before.updated_at);

        store
            .bulk_upsert(&[ClientUpsert::new("Ana Maria", "111")])
            .await
            .unwrap();
        let after = store.get("111").unwrap();
        assert_eq!(after.name, "Ana Maria");
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn list_by_documents() {
        let store = ConcurrentClientStore::new();
        store
            .bulk_upsert(&upserts(&[("Ana", "111"), ("Bob", "222"), ("Cid", "333")]))
            .await
            .unwrap();

        let mut found = store
            .list(&ClientFilter::by_documents(vec![
                "111".to_string(),
                "333".to_string(),
                "999".to_string(),
                "111".to_string(),
            ]))
            .await
            .unwrap();
        found.sort_by(|a, b| a.document.cmp(&b.document));

        let docs: Vec<_> = found.iter().map(|c| c.document.as_str()).collect();
        assert_eq!(docs, vec!["111", "333"]);
    }

    #[tokio::test]
    async fn list_by_ids() {
        let store = ConcurrentClientStore::new();
        store
            .bulk_upsert(&upserts(&[("Ana", "111"), ("Bob", "222")]))
            .await
            .unwrap();
        let bob = store.get("222").unwrap();

        let found = store
            .list(&ClientFilter::by_ids(vec![bob.id]))
            .await
            .unwrap();

        assert_eq!(found, vec![bob]);
    }

    #[tokio::test]
    async fn list_by_name_is_case_insensitive_pattern() {
        let store = ConcurrentClientStore::new();
        store
            .bulk_upsert(&upserts(&[("Ana Souza", "111"), ("Bob", "222"), ("Mariana", "333")]))
            .await
            .unwrap();

        let found = store.list(&ClientFilter::by_name("ANA")).await.unwrap();
        assert_eq!(found.len(), 2);

        let anchored = store.list(&ClientFilter::by_name("^ana")).await.unwrap();
        assert_eq!(anchored.len(), 1);
        assert_eq!(anchored[0].document, "111");
    }

    #[tokio::test]
    async fn list_rejects_invalid_pattern() {
        let store = ConcurrentClientStore::new();
        let result = store.list(&ClientFilter::by_name("(unclosed")).await;
        assert!(matches!(result, Err(StorageError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn list_without_filter_returns_everything() {
        let store = ConcurrentClientStore::new();
        store
            .bulk_upsert(&upserts(&[("Ana", "111"), ("Bob", "222")]))
            .await
            .unwrap();

        let found = store.list(&ClientFilter::default()).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_upserts_of_same_document_create_one_client() {
        let store = Arc::new(ConcurrentClientStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let name = format!("Name {i}");
                    store
                        .bulk_upsert(&[ClientUpsert::new(name, "111")])
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            created += handle.await.unwrap().len();
        }

        assert_eq!(created, 1);
        assert_eq!(store.len(), 1);
    }
}
