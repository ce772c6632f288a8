use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ClientId;

/// Client lookup filter; unset fields do not constrain the result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    /// Exact-match set of documents (ignored when empty)
    pub documents: Option<Vec<String>>,
    /// Exact-match set of surrogate ids (ignored when empty)
    pub ids: Option<Vec<ClientId>>,
    /// Case-insensitive regular expression on the client name
    pub name: Option<String>,
}

impl ClientFilter {
    pub fn by_documents(documents: Vec<String>) -> Self {
        Self {
            documents: Some(documents),
            ..Self::default()
        }
    }

    pub fn by_ids(ids: Vec<ClientId>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Transaction read filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Case-insensitive regular expression on the linked client's name
    pub name: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD` or RFC 3339
    pub start_date: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD` or RFC 3339
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Date,
    Amount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Result ordering; defaults to newest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

/// One-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub sort: Sort,
}

impl Pagination {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page,
            limit,
            sort: Sort::default(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Number of records preceding this page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Client fields attached to a transaction in query results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    pub name: String,
    pub document: String,
}

/// Transaction as returned by the read path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub transaction_id: String,
    pub client_id: ClientId,
    pub client: Option<ClientSummary>,
    pub date: DateTime<Utc>,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<TransactionView>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

impl TransactionPage {
    pub fn empty(page: usize) -> Self {
        Self {
            transactions: Vec::new(),
            total_count: 0,
            total_pages: 0,
            current_page: page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sort_is_newest_first() {
        let sort = Sort::default();
        assert_eq!(sort.field, SortField::Date);
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(Pagination::new(1, 10).offset(), 0);
        assert_eq!(Pagination::new(3, 25).offset(), 50);
        assert_eq!(Pagination::new(0, 25).offset(), 0);
    }

    #[test]
    fn page_serializes_in_camel_case() {
        let json = serde_json::to_value(TransactionPage::empty(4)).unwrap();
        assert_eq!(json["totalCount"], 0);
        assert_eq!(json["totalPages"], 0);
        assert_eq!(json["currentPage"], 4);
        assert!(json["transactions"].as_array().unwrap().is_empty());
    }
}
