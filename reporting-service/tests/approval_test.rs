//! Approve/reject command integration tests.

mod common;

use common::{credit_note, invoice, service_with_store};
use engine_core::error::AppError;
use reporting_service::models::{ApprovalStatus, InvoiceStatus};
use reporting_service::services::{approvals, DocumentKind, DocumentRef};
use uuid::Uuid;

#[tokio::test]
async fn approving_a_pending_invoice_moves_it_to_unpaid() {
    let (_service, store) = service_with_store();
    let mut inv = invoice(Uuid::new_v4(), "1000", None, "2026-03-05");
    inv.status = InvoiceStatus::PendingApproval;
    let id = inv.invoice_id;
    store.seed_invoice(inv);

    approvals::approve(
        &store,
        DocumentRef {
            kind: DocumentKind::Invoice,
            id,
        },
    )
    .await
    .unwrap();

    assert_eq!(store.invoice_status(id), Some(InvoiceStatus::Unpaid));
}

#[tokio::test]
async fn approve_and_reject_are_mutually_exclusive() {
    let (_service, store) = service_with_store();
    let mut inv = invoice(Uuid::new_v4(), "1000", None, "2026-03-05");
    inv.status = InvoiceStatus::PendingApproval;
    let id = inv.invoice_id;
    store.seed_invoice(inv);
    let doc = DocumentRef {
        kind: DocumentKind::Invoice,
        id,
    };

    approvals::approve(&store, doc).await.unwrap();

    let err = approvals::reject(&store, doc, "too late").await.unwrap_err();
    match err {
        AppError::StateConflict(e) => {
            assert!(e.to_string().contains("no longer pending"));
        }
        other => panic!("expected StateConflict, got {:?}", other),
    }
    // The first decision stands.
    assert_eq!(store.invoice_status(id), Some(InvoiceStatus::Unpaid));
}

#[tokio::test]
async fn rejecting_records_the_reason_and_blocks_a_later_approve() {
    let (_service, store) = service_with_store();
    let note = credit_note(Uuid::new_v4(), "200", "20", "2026-03-10");
    let id = note.credit_note_id;
    store.seed_credit_note(note);
    let doc = DocumentRef {
        kind: DocumentKind::CreditNote,
        id,
    };

    approvals::reject(&store, doc, "duplicate note").await.unwrap();
    assert_eq!(store.credit_note_status(id), Some(ApprovalStatus::Rejected));

    let err = approvals::approve(&store, doc).await.unwrap_err();
    assert!(matches!(err, AppError::StateConflict(_)));
}

#[tokio::test]
async fn unknown_document_is_not_found_not_a_conflict() {
    let (_service, store) = service_with_store();
    let err = approvals::approve(
        &store,
        DocumentRef {
            kind: DocumentKind::Invoice,
            id: Uuid::new_v4(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
