use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Store-assigned surrogate key of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Client identity as seen in an input line; `document` is the natural key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientUpsert {
    pub name: String,
    pub document: String,
}

impl ClientUpsert {
    pub fn new(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: document.into(),
        }
    }
}

/// Persisted client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub document: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Create a client on first sighting of its document
    pub fn new(upsert: &ClientUpsert, now: DateTime<Utc>) -> Self {
        Self {
            id: ClientId::new(),
            name: upsert.name.clone(),
            document: upsert.document.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the name; returns whether anything changed
    pub(crate) fn rename(&mut self, name: &str, now: DateTime<Utc>) -> bool {
        if self.name == name {
            return false;
        }
        self.name = name.to_string();
        self.updated_at = now;
        true
    }
}
