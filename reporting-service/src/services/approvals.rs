//! Approval and archive commands.
//!
//! Each command is an independent idempotent operation: issue it, await
//! the typed result, and apply UI state only on success. Bulk
//! operations iterate the selection and report per-item outcomes; a
//! failed item keeps its prior state and never rolls back its
//! neighbors.

use engine_core::error::AppError;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::metrics::{APPROVAL_COMMANDS_TOTAL, BULK_ITEMS_TOTAL};
use super::store::{DocumentRef, DocumentStore};

/// Per-item failure of a bulk operation.
#[derive(Debug, Clone, Serialize)]
pub struct BulkItemError {
    pub id: Uuid,
    pub message: String,
}

/// Outcome of a bulk operation. Always fully enumerated; never
/// collapsed into a single boolean.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<BulkItemError>,
}

/// Approve one pending document. A raced or repeated approval surfaces
/// the store's "no longer pending" conflict unchanged.
#[instrument(skip(store), fields(kind = doc.kind.as_str(), id = %doc.id))]
pub async fn approve(store: &dyn DocumentStore, doc: DocumentRef) -> Result<(), AppError> {
    let result = store.approve(doc).await;
    let outcome = if result.is_ok() { "ok" } else { "error" };
    APPROVAL_COMMANDS_TOTAL
        .with_label_values(&["approve", doc.kind.as_str(), outcome])
        .inc();
    if result.is_ok() {
        info!("document approved");
    }
    result
}

/// Reject one pending document with a reason.
#[instrument(skip(store, reason), fields(kind = doc.kind.as_str(), id = %doc.id))]
pub async fn reject(
    store: &dyn DocumentStore,
    doc: DocumentRef,
    reason: &str,
) -> Result<(), AppError> {
    let result = store.reject(doc, reason).await;
    let outcome = if result.is_ok() { "ok" } else { "error" };
    APPROVAL_COMMANDS_TOTAL
        .with_label_values(&["reject", doc.kind.as_str(), outcome])
        .inc();
    if result.is_ok() {
        info!("document rejected");
    }
    result
}

/// Archive one document.
#[instrument(skip(store, reason), fields(kind = doc.kind.as_str(), id = %doc.id))]
pub async fn archive(
    store: &dyn DocumentStore,
    doc: DocumentRef,
    reason: &str,
) -> Result<(), AppError> {
    let result = store.archive(doc, reason).await;
    let outcome = if result.is_ok() { "ok" } else { "error" };
    APPROVAL_COMMANDS_TOTAL
        .with_label_values(&["archive", doc.kind.as_str(), outcome])
        .inc();
    result
}

/// Archive a selection one document at a time.
///
/// Each item is an independent business document, so partial failure is
/// expected and reported per item rather than aborting the batch.
#[instrument(skip(store, ids, reason), fields(kind = kind.as_str(), count = ids.len()))]
pub async fn bulk_archive(
    store: &dyn DocumentStore,
    kind: super::store::DocumentKind,
    ids: &[Uuid],
    reason: &str,
) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();

    for &id in ids {
        match store.archive(DocumentRef { kind, id }, reason).await {
            Ok(()) => {
                outcome.succeeded += 1;
                BULK_ITEMS_TOTAL
                    .with_label_values(&["archive", "succeeded"])
                    .inc();
            }
            Err(e) => {
                outcome.failed += 1;
                BULK_ITEMS_TOTAL
                    .with_label_values(&["archive", "failed"])
                    .inc();
                warn!(id = %id, error = %e, "bulk archive item failed");
                outcome.errors.push(BulkItemError {
                    id,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        succeeded = outcome.succeeded,
        failed = outcome.failed,
        "bulk archive finished"
    );
    outcome
}
