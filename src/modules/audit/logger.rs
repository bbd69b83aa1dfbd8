//! Audit event persistence.
//!
//! Two delivery modes:
//!
//! - [`AuditLogger::record`] awaits the insert. Used for security-sensitive
//!   actions (role changes, deletions) where the caller must not respond
//!   before the entry exists.
//! - [`AuditLogger::record_background`] enqueues onto a bounded queue
//!   drained by a worker task. Delivery is best-effort: events are dropped
//!   with a warning when the queue is full or the worker is gone, and
//!   callers must not depend on completion.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use super::model::{AuditEvent, COLLECTION};
use crate::store::{DocumentStore, StoreError};
use crate::utils::errors::AppError;

const QUEUE_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AuditLogger {
    store: Arc<dyn DocumentStore>,
    tx: mpsc::Sender<AuditEvent>,
}

impl AuditLogger {
    /// Creates the logger and spawns its background worker. Must be called
    /// within a tokio runtime.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let (tx, mut rx) = mpsc::channel::<AuditEvent>(QUEUE_CAPACITY);

        let worker_store = store.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(err) = write_entry(worker_store.as_ref(), &event).await {
                    warn!(
                        action = %event.action,
                        resource_id = %event.resource_id,
                        error = %err,
                        "failed to persist audit event"
                    );
                }
            }
        });

        Self { store, tx }
    }

    /// Persists the event before returning.
    pub async fn record(&self, event: AuditEvent) -> Result<(), AppError> {
        write_entry(self.store.as_ref(), &event)
            .await
            .map_err(AppError::from)
    }

    /// Enqueues the event for best-effort background persistence.
    pub fn record_background(&self, event: AuditEvent) {
        if let Err(err) = self.tx.try_send(event) {
            warn!(error = %err, "audit queue full or closed, dropping event");
        }
    }
}

async fn write_entry(store: &dyn DocumentStore, event: &AuditEvent) -> Result<(), StoreError> {
    let data = serde_json::to_value(event)?;
    store.insert(COLLECTION, data).await?;
    Ok(())
}
