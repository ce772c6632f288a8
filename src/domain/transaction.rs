use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::client::ClientId;
use super::error::DomainError;

/// Write candidate for one transaction, keyed by its external `transaction_id`
///
/// `date` and `amount` keep their textual form from the input line; they are
/// only interpreted when the store accepts the write (see [`TransactionUpsert::into_fields`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionUpsert {
    pub transaction_id: String,
    pub client: Option<ClientId>,
    pub date: String,
    pub amount: String,
}

/// Typed values a store writes for an accepted [`TransactionUpsert`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFields {
    pub client: ClientId,
    pub date: DateTime<Utc>,
    pub amount: i64,
}

impl TransactionUpsert {
    /// Convert into storable values, rejecting empty references and malformed date/amount
    pub fn into_fields(self) -> Result<(String, TransactionFields), DomainError> {
        let client = self
            .client
            .ok_or_else(|| DomainError::MissingClientReference(self.transaction_id.clone()))?;
        let amount = self
            .amount
            .trim()
            .parse::<i64>()
            .map_err(|_| DomainError::InvalidAmount(self.amount.clone()))?;
        let date = parse_date(&self.date)?;

        Ok((
            self.transaction_id,
            TransactionFields {
                client,
                date,
                amount,
            },
        ))
    }
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, DomainError> {
    let s = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| DomainError::InvalidDate(input.to_string()));
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidDate(input.to_string()))
}

/// Persisted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub client: ClientId,
    pub date: DateTime<Utc>,
    /// Minor currency units
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(transaction_id: String, fields: TransactionFields, now: DateTime<Utc>) -> Self {
        Self {
            transaction_id,
            client: fields.client,
            date: fields.date,
            amount: fields.amount,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite client, date and amount; returns whether anything changed
    pub(crate) fn apply(&mut self, fields: TransactionFields, now: DateTime<Utc>) -> bool {
        if self.client == fields.client && self.date == fields.date && self.amount == fields.amount
        {
            return false;
        }
        self.client = fields.client;
        self.date = fields.date;
        self.amount = fields.amount;
        self.updated_at = now;
        true
    }
}

/// Outcome of a bulk transaction upsert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkWriteResult {
    pub inserted_count: usize,
    pub modified_count: usize,
    pub total_processed: usize,
}

impl BulkWriteResult {
    /// Fold another batch's counts into this one
    pub fn merge(self, other: BulkWriteResult) -> Self {
        Self {
            inserted_count: self.inserted_count + other.inserted_count,
            modified_count: self.modified_count + other.modified_count,
            total_processed: self.total_processed + other.total_processed,
        }
    }
}
