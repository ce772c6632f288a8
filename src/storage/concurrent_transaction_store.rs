use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, Entry};

use super::error::StorageError;
use super::query::{
    ClientFilter, ClientSummary, Pagination, Sort, SortField, SortOrder, TransactionFilter,
    TransactionPage, TransactionView,
};
use super::traits::{ClientStore, TransactionStore};
use crate::domain::{BulkWriteResult, ClientId, Transaction, TransactionUpsert, parse_date};

/// DashMap-based concurrent transaction store keyed by external transaction id
///
/// Holds a handle to the client store to resolve name filters and attach
/// client details on reads.
pub struct ConcurrentTransactionStore {
    records: DashMap<String, Transaction>,
    clients: Arc<dyn ClientStore>,
}

impl ConcurrentTransactionStore {
    /// Create a new empty transaction store reading clients from `clients`
    pub fn new(clients: Arc<dyn ClientStore>) -> Self {
        Self {
            records: DashMap::new(),
            clients,
        }
    }

    /// Number of stored transactions
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, transaction_id: &str) -> Option<Transaction> {
        self.records.get(transaction_id).map(|r| r.value().clone())
    }
}

fn compare(a: &Transaction, b: &Transaction, sort: Sort) -> Ordering {
    let primary = match sort.field {
        SortField::Date => a.date.cmp(&b.date),
        SortField::Amount => a.amount.cmp(&b.amount),
    };
    let primary = match sort.order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };
    primary.then_with(|| a.transaction_id.cmp(&b.transaction_id))
}

#[async_trait]
impl TransactionStore for ConcurrentTransactionStore {
    async fn bulk_upsert(
        &self,
        items: Vec<TransactionUpsert>,
    ) -> Result<BulkWriteResult, StorageError> {
        if items.is_empty() {
            return Ok(BulkWriteResult::default());
        }

        let total_processed = items.len();

        // Reject the whole call before touching any record
        let accepted = items
            .into_iter()
            .map(TransactionUpsert::into_fields)
            .collect::<Result<Vec<_>, _>>()?;

        let now = Utc::now();
        let mut result = BulkWriteResult {
            total_processed,
            ..BulkWriteResult::default()
        };

        for (transaction_id, fields) in accepted {
            match self.records.entry(transaction_id) {
                Entry::Occupied(mut e) => {
                    if e.get_mut().apply(fields, now) {
                        result.modified_count += 1;
                    }
                }
                Entry::Vacant(e) => {
                    let transaction_id = e.key().clone();
                    e.insert(Transaction::new(transaction_id, fields, now));
                    result.inserted_count += 1;
                }
            }
        }

        Ok(result)
    }

    async fn paginate(
        &self,
        filter: &TransactionFilter,
        pagination: &Pagination,
    ) -> Result<TransactionPage, StorageError> {
        if pagination.page == 0 {
            return Err(StorageError::InvalidQuery("page must be >= 1".to_string()));
        }
        if pagination.limit == 0 {
            return Err(StorageError::InvalidQuery("limit must be >= 1".to_string()));
        }

        let parse_bound = |raw: &Option<String>| {
            raw.as_deref()
                .map(parse_date)
                .transpose()
                .map_err(|e| StorageError::InvalidQuery(e.to_string()))
        };
        let start = parse_bound(&filter.start_date)?;
        let end = parse_bound(&filter.end_date)?;

        let client_ids: Option<HashSet<ClientId>> = match &filter.name {
            Some(name) => {
                let clients = self.clients.list(&ClientFilter::by_name(name.clone())).await?;
                if clients.is_empty() {
                    return Ok(TransactionPage::empty(pagination.page));
                }
                Some(clients.into_iter().map(|c| c.id).collect())
            }
            None => None,
        };

        let mut matching: Vec<Transaction> = self
            .records
            .iter()
            .filter(|r| {
                let tx = r.value();
                client_ids.as_ref().is_none_or(|ids| ids.contains(&tx.client))
                    && start.is_none_or(|s| tx.date >= s)
                    && end.is_none_or(|e| tx.date <= e)
            })
            .map(|r| r.value().clone())
            .collect();

        matching.sort_by(|a, b| compare(a, b, pagination.sort));

        let total_count = matching.len();
        let page: Vec<Transaction> = matching
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.limit)
            .collect();

        let ids: Vec<ClientId> = page
            .iter()
            .map(|tx| tx.client)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let clients: HashMap<ClientId, ClientSummary> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.clients
                .list(&ClientFilter::by_ids(ids))
                .await?
                .into_iter()
                .map(|c| {
                    (
                        c.id,
                        ClientSummary {
                            name: c.name,
                            document: c.document,
                        },
                    )
                })
                .collect()
        };

        let transactions = page
            .into_iter()
            .map(|tx| TransactionView {
                client: clients.get(&tx.client).cloned(),
                transaction_id: tx.transaction_id,
                client_id: tx.client,
                date: tx.date,
                amount: tx.amount,
                created_at: tx.created_at,
                updated_at: tx.updated_at,
            })
            .collect();

        Ok(TransactionPage {
            transactions,
            total_count,
            total_pages: total_count.div_ceil(pagination.limit),
            current_page: pagination.page,
        })
    }
}
