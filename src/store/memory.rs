//! In-memory document store.
//!
//! Backs unit and integration tests, mirroring the PostgreSQL backend's
//! semantics: text comparison for filters and order keys, cursor pagination
//! with id tiebreak, merge-style updates.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use super::{Document, DocumentStore, ListQuery, Page, StoreError, field_as_text};

type Collections = HashMap<String, BTreeMap<String, Document>>;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Collections> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}

// Sort key mirroring `(COALESCE(data->>field, ''), id)` on the SQL side.
fn sort_key(doc: &Document, order_by: Option<&str>) -> (String, String) {
    let value = order_by
        .and_then(|field| field_as_text(doc.data.get(field)))
        .unwrap_or_default();
    (value, doc.id.clone())
}

fn matches(doc: &Document, query: &ListQuery) -> bool {
    for (field, expected) in &query.filters {
        if field_as_text(doc.data.get(field)).as_deref() != Some(expected.as_str()) {
            return false;
        }
    }
    if let Some(after) = query.created_after
        && doc.created_at < after
    {
        return false;
    }
    if let Some(before) = query.created_before
        && doc.created_at > before
    {
        return false;
    }
    true
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn insert(&self, collection: &str, data: Value) -> Result<Document, StoreError> {
        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .insert(doc.id.clone(), doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.lock();
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        else {
            return Ok(None);
        };

        if let (Some(target), Value::Object(fields)) = (doc.data.as_object_mut(), patch) {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        doc.updated_at = Utc::now();
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    async fn list(&self, collection: &str, query: ListQuery) -> Result<Page, StoreError> {
        let collections = self.read();
        let docs = collections.get(collection);

        // The cursor must name an existing document in the collection.
        let cursor_key = match &query.start_after {
            Some(cursor) => {
                let Some(cursor_doc) = docs.and_then(|d| d.get(cursor)) else {
                    return Err(StoreError::InvalidCursor(cursor.clone()));
                };
                Some(sort_key(cursor_doc, query.order_by.as_deref()))
            }
            None => None,
        };

        let mut matched: Vec<&Document> = docs
            .map(|d| d.values().filter(|doc| matches(doc, &query)).collect())
            .unwrap_or_default();

        matched.sort_by(|a, b| {
            let ord = sort_key(a, query.order_by.as_deref())
                .cmp(&sort_key(b, query.order_by.as_deref()));
            if query.descending { ord.reverse() } else { ord }
        });

        if let Some(cursor_key) = cursor_key {
            matched.retain(|doc| {
                let ord = sort_key(doc, query.order_by.as_deref()).cmp(&cursor_key);
                if query.descending {
                    ord == Ordering::Less
                } else {
                    ord == Ordering::Greater
                }
            });
        }

        let limit = query.effective_limit() as usize;
        let has_more = matched.len() > limit;
        matched.truncate(limit);
        let next_cursor = if has_more {
            matched.last().map(|doc| doc.id.clone())
        } else {
            None
        };

        Ok(Page {
            documents: matched.into_iter().cloned().collect(),
            has_more,
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_then_get_round_trip() {
        let store = MemoryStore::new();
        let doc = store
            .insert("programs", json!({"title": "T", "description": "D"}))
            .await
            .unwrap();

        let fetched = store.get("programs", &doc.id).await.unwrap().unwrap();
        assert_eq!(fetched.data["title"], "T");
        assert_eq!(fetched.data["description"], "D");
        assert_eq!(fetched.created_at, doc.created_at);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("programs", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_top_level_fields() {
        let store = MemoryStore::new();
        let doc = store
            .insert("programs", json!({"title": "old", "status": "draft"}))
            .await
            .unwrap();

        let updated = store
            .update("programs", &doc.id, json!({"title": "new"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.data["title"], "new");
        assert_eq!(updated.data["status"], "draft");
        assert!(updated.updated_at >= doc.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_none() {
        let store = MemoryStore::new();
        let result = store
            .update("programs", "missing", json!({"title": "x"}))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let doc = store.insert("programs", json!({})).await.unwrap();
        assert!(store.delete("programs", &doc.id).await.unwrap());
        assert!(!store.delete("programs", &doc.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_equality_filter() {
        let store = MemoryStore::new();
        store
            .insert("programs", json!({"status": "draft"}))
            .await
            .unwrap();
        store
            .insert("programs", json!({"status": "published"}))
            .await
            .unwrap();

        let page = store
            .list("programs", ListQuery::new(10).filter("status", "draft"))
            .await
            .unwrap();
        assert_eq!(page.documents.len(), 1);
        assert_eq!(page.documents[0].data["status"], "draft");
    }

    #[tokio::test]
    async fn test_list_orders_by_field_with_id_tiebreak() {
        let store = MemoryStore::new();
        store
            .insert("lessons", json!({"title": "b", "position": "2"}))
            .await
            .unwrap();
        store
            .insert("lessons", json!({"title": "a", "position": "1"}))
            .await
            .unwrap();

        let page = store
            .list("lessons", ListQuery::new(10).order_by("position"))
            .await
            .unwrap();
        let titles: Vec<_> = page
            .documents
            .iter()
            .map(|d| d.data["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_cursor_pagination_covers_all_documents() {
        let store = MemoryStore::new();
        for i in 0..25 {
            store
                .insert("programs", json!({"title": format!("p{i}")}))
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = store
                .list("programs", ListQuery::new(10).start_after(cursor.clone()))
                .await
                .unwrap();
            seen.extend(page.documents.iter().map(|d| d.id.clone()));
            if !page.has_more {
                break;
            }
            cursor = page.next_cursor;
        }

        let all = store.list("programs", ListQuery::new(100)).await.unwrap();
        let mut all_ids: Vec<_> = all.documents.iter().map(|d| d.id.clone()).collect();
        let mut seen_sorted = seen.clone();
        all_ids.sort();
        seen_sorted.sort();
        assert_eq!(seen.len(), 25);
        assert_eq!(seen_sorted, all_ids);
    }

    #[tokio::test]
    async fn test_unknown_cursor_is_rejected() {
        let store = MemoryStore::new();
        store.insert("programs", json!({})).await.unwrap();

        let err = store
            .list(
                "programs",
                ListQuery::new(10).start_after(Some("bogus".to_string())),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidCursor(_)));
    }

    #[tokio::test]
    async fn test_created_range_filter() {
        let store = MemoryStore::new();
        let doc = store.insert("commands", json!({})).await.unwrap();

        let page = store
            .list(
                "commands",
                ListQuery::new(10).created_after(doc.created_at - chrono::Duration::seconds(1)),
            )
            .await
            .unwrap();
        assert_eq!(page.documents.len(), 1);

        let page = store
            .list(
                "commands",
                ListQuery::new(10).created_before(doc.created_at - chrono::Duration::seconds(1)),
            )
            .await
            .unwrap();
        assert!(page.documents.is_empty());
    }
}
