//! PostgreSQL document store.
//!
//! Documents live in a single `documents` table keyed by `(collection, id)`
//! with a JSONB payload. Filters and order keys go through `data->>`, so all
//! comparisons are text comparisons; order keys are coalesced to empty text
//! so that documents missing the key still sort deterministically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use uuid::Uuid;

use super::{Document, DocumentStore, ListQuery, Page, StoreError, field_as_text};

const SELECT_COLUMNS: &str = "id, data, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_document(row: PgRow) -> Result<Document, sqlx::Error> {
    Ok(Document {
        id: row.try_get("id")?,
        data: row.try_get("data")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE collection = $1 AND id = $2"
        ))
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_document).transpose().map_err(Into::into)
    }

    async fn insert(&self, collection: &str, data: Value) -> Result<Document, StoreError> {
        let id = Uuid::new_v4().to_string();
        let row = sqlx::query(&format!(
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(collection)
        .bind(id)
        .bind(data)
        .fetch_one(&self.pool)
        .await?;

        row_to_document(row).map_err(Into::into)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE documents SET data = data || $3, updated_at = NOW() \
             WHERE collection = $1 AND id = $2 RETURNING {SELECT_COLUMNS}"
        ))
        .bind(collection)
        .bind(id)
        .bind(patch)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_document).transpose().map_err(Into::into)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, collection: &str, query: ListQuery) -> Result<Page, StoreError> {
        // Resolve the cursor document up front so the page predicate can be
        // expressed as a tuple comparison against its sort key.
        let cursor_key: Option<(String, String)> = match &query.start_after {
            Some(cursor) => {
                let Some(cursor_doc) = self.get(collection, cursor).await? else {
                    return Err(StoreError::InvalidCursor(cursor.clone()));
                };
                let value = query
                    .order_by
                    .as_deref()
                    .and_then(|field| field_as_text(cursor_doc.data.get(field)))
                    .unwrap_or_default();
                Some((value, cursor_doc.id))
            }
            None => None,
        };

        let limit = query.effective_limit();
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE collection = "
        ));
        qb.push_bind(collection.to_string());

        for (field, value) in &query.filters {
            qb.push(" AND data->>");
            qb.push_bind(field.clone());
            qb.push(" = ");
            qb.push_bind(value.clone());
        }
        if let Some(after) = query.created_after {
            qb.push(" AND created_at >= ");
            qb.push_bind::<DateTime<Utc>>(after);
        }
        if let Some(before) = query.created_before {
            qb.push(" AND created_at <= ");
            qb.push_bind::<DateTime<Utc>>(before);
        }

        let cmp = if query.descending { " < " } else { " > " };
        if let Some((cursor_value, cursor_id)) = cursor_key {
            match &query.order_by {
                Some(field) => {
                    qb.push(" AND (COALESCE(data->>");
                    qb.push_bind(field.clone());
                    qb.push(", ''), id)");
                    qb.push(cmp);
                    qb.push("(");
                    qb.push_bind(cursor_value);
                    qb.push(", ");
                    qb.push_bind(cursor_id);
                    qb.push(")");
                }
                None => {
                    qb.push(" AND id");
                    qb.push(cmp);
                    qb.push_bind(cursor_id);
                }
            }
        }

        let direction = if query.descending { "DESC" } else { "ASC" };
        match &query.order_by {
            Some(field) => {
                qb.push(" ORDER BY COALESCE(data->>");
                qb.push_bind(field.clone());
                qb.push(", '') ");
                qb.push(direction);
                qb.push(", id ");
                qb.push(direction);
            }
            None => {
                qb.push(" ORDER BY id ");
                qb.push(direction);
            }
        }

        qb.push(" LIMIT ");
        qb.push_bind(limit + 1);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let mut documents = rows
            .into_iter()
            .map(row_to_document)
            .collect::<Result<Vec<_>, _>>()?;

        let has_more = documents.len() as i64 > limit;
        documents.truncate(limit as usize);
        let next_cursor = if has_more {
            documents.last().map(|doc| doc.id.clone())
        } else {
            None
        };

        Ok(Page {
            documents,
            has_more,
            next_cursor,
        })
    }
}
