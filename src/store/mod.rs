//! Document store abstraction.
//!
//! Every collection (users, programs, lessons, media, onboarding configs,
//! commands, audit logs) is persisted as JSON documents behind the
//! [`DocumentStore`] trait. The production backend is PostgreSQL
//! ([`postgres::PgStore`], JSONB rows); [`memory::MemoryStore`] backs tests.
//! The store handle is constructed once and passed explicitly through
//! application state, never held in a global.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use tracing::warn;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Hard cap on any single list scan, bounding worst-case latency.
pub const MAX_SCAN_LIMIT: i64 = 5000;

/// A stored document: store-assigned id plus a JSON object payload.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A list query: equality filters on document fields, an optional order key,
/// a bounded page size, and an opaque cursor (the id of the last item of the
/// previous page).
///
/// Order keys compare as text; documents missing the key sort as empty text.
/// The cursor must name an existing document in the collection, otherwise the
/// query fails with [`StoreError::InvalidCursor`].
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filters: Vec<(String, String)>,
    pub order_by: Option<String>,
    pub descending: bool,
    pub limit: i64,
    pub start_after: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl ListQuery {
    pub fn new(limit: i64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn start_after(mut self, cursor: Option<String>) -> Self {
        self.start_after = cursor;
        self
    }

    pub fn created_after(mut self, ts: DateTime<Utc>) -> Self {
        self.created_after = Some(ts);
        self
    }

    pub fn created_before(mut self, ts: DateTime<Utc>) -> Self {
        self.created_before = Some(ts);
        self
    }

    /// The same query with the ordering dropped, for fallback retries.
    pub fn without_order(mut self) -> Self {
        self.order_by = None;
        self
    }

    /// Effective page size after clamping to the scan cap.
    pub fn effective_limit(&self) -> i64 {
        self.limit.clamp(1, MAX_SCAN_LIMIT)
    }
}

/// One page of a list query.
#[derive(Debug)]
pub struct Page {
    pub documents: Vec<Document>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Store-level failures.
///
/// `InvalidCursor` is surfaced to callers as a validation error; `Backend`
/// failures are internal.
#[derive(Debug)]
pub enum StoreError {
    InvalidCursor(String),
    Backend(anyhow::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCursor(cursor) => write!(f, "unknown pagination cursor: {}", cursor),
            Self::Backend(err) => write!(f, "store backend error: {}", err),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Backend(err.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Backend(err.into())
    }
}

/// Per-collection document operations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Inserts `data` under a store-assigned id and returns the new document.
    async fn insert(&self, collection: &str, data: Value) -> Result<Document, StoreError>;

    /// Merges the top-level fields of `patch` into the document, bumping
    /// `updated_at`. Returns `None` for an unknown id.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> Result<Option<Document>, StoreError>;

    /// Returns whether a document was actually removed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    async fn list(&self, collection: &str, query: ListQuery) -> Result<Page, StoreError>;
}

/// Runs a list query, retrying once without the ordering when an ordered
/// query fails at the backend. The retry is logged; callers get a page with
/// reduced ordering guarantees instead of a 500.
pub async fn list_with_fallback(
    store: &dyn DocumentStore,
    collection: &str,
    query: ListQuery,
) -> Result<Page, StoreError> {
    if query.order_by.is_none() {
        return store.list(collection, query).await;
    }

    match store.list(collection, query.clone()).await {
        Ok(page) => Ok(page),
        Err(StoreError::Backend(err)) => {
            warn!(
                collection,
                error = %err,
                "ordered list query failed, retrying without ordering"
            );
            store.list(collection, query.without_order()).await
        }
        Err(err) => Err(err),
    }
}

/// Renders a document field the way Postgres `->>` does: strings unquoted,
/// other values as their JSON text, null/missing as `None`.
pub(crate) fn field_as_text(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}
