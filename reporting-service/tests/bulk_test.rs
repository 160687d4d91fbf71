//! Bulk archive integration tests.

mod common;

use common::{invoice, service_with_store};
use reporting_service::services::{approvals, DocumentKind, DocumentRef};
use uuid::Uuid;

#[tokio::test]
async fn bulk_archive_reports_per_item_outcomes() {
    let (_service, store) = service_with_store();
    let profile = Uuid::new_v4();

    let a = invoice(profile, "1000", None, "2026-03-01");
    let b = invoice(profile, "2000", None, "2026-03-02");
    let c = invoice(profile, "3000", None, "2026-03-03");
    let ids = [a.invoice_id, b.invoice_id, c.invoice_id];
    store.seed_invoice(a);
    store.seed_invoice(b);
    store.seed_invoice(c);

    // Someone archived the second invoice moments earlier.
    approvals::archive(
        &store,
        DocumentRef {
            kind: DocumentKind::Invoice,
            id: ids[1],
        },
        "stale",
    )
    .await
    .unwrap();

    let outcome =
        approvals::bulk_archive(&store, DocumentKind::Invoice, &ids, "quarter cleanup").await;

    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].id, ids[1]);
    assert!(outcome.errors[0].message.contains("already archived"));

    // The failure never rolled back its neighbors.
    assert_eq!(store.invoice_archived(ids[0]), Some(true));
    assert_eq!(store.invoice_archived(ids[2]), Some(true));
}

#[tokio::test]
async fn bulk_archive_of_unknown_ids_fails_those_items_only() {
    let (_service, store) = service_with_store();
    let inv = invoice(Uuid::new_v4(), "1000", None, "2026-03-01");
    let known = inv.invoice_id;
    store.seed_invoice(inv);
    let ids = [known, Uuid::new_v4()];

    let outcome = approvals::bulk_archive(&store, DocumentKind::Invoice, &ids, "cleanup").await;

    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.errors[0].id, ids[1]);
}

#[tokio::test]
async fn archived_documents_drop_out_of_the_working_set() {
    let (service, store) = service_with_store();
    let profile = Uuid::new_v4();
    let inv = invoice(profile, "1000", None, "2026-03-01");
    let id = inv.invoice_id;
    store.seed_invoice(inv);

    let before = service.profile_ledger(profile).await.unwrap();
    assert_eq!(before.lines.len(), 1);

    approvals::archive(
        &store,
        DocumentRef {
            kind: DocumentKind::Invoice,
            id,
        },
        "entered twice",
    )
    .await
    .unwrap();

    let after = service.profile_ledger(profile).await.unwrap();
    assert!(after.lines.is_empty());
}
