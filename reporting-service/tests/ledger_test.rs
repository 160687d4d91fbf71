//! Profile ledger integration tests.

mod common;

use common::{credit_note, dec, invoice, payment, service_with_store};
use reporting_service::services::{approvals, DocumentKind, DocumentRef};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::test]
async fn withholding_invoice_settles_at_the_net_amount() {
    let (service, store) = service_with_store();
    let profile = Uuid::new_v4();
    let inv = invoice(profile, "10000", Some("10"), "2026-03-05");
    let inv_id = inv.invoice_id;
    store.seed_invoice(inv);
    store.seed_payment(payment(inv_id, Uuid::new_v4(), "9000", "2026-03-20"));

    let ledger = service.profile_ledger(profile).await.unwrap();
    assert_eq!(ledger.lines.len(), 2);
    assert_eq!(ledger.lines[0].payable_amount, dec("9000"));
    assert_eq!(ledger.lines[0].running_balance, dec("9000"));
    assert_eq!(ledger.lines[1].running_balance, Decimal::ZERO);
    assert_eq!(ledger.summary.outstanding_balance, Decimal::ZERO);
    assert_eq!(ledger.summary.total_withheld, dec("1000"));
}

#[tokio::test]
async fn same_day_invoice_and_payment_never_dip_negative() {
    let (service, store) = service_with_store();
    let profile = Uuid::new_v4();
    let inv = invoice(profile, "1000", None, "2026-03-10");
    let inv_id = inv.invoice_id;
    store.seed_invoice(inv);
    store.seed_payment(payment(inv_id, Uuid::new_v4(), "1000", "2026-03-10"));

    let ledger = service.profile_ledger(profile).await.unwrap();
    assert!(ledger.lines.iter().all(|l| l.running_balance >= Decimal::ZERO));
    assert_eq!(ledger.summary.outstanding_balance, Decimal::ZERO);
}

#[tokio::test]
async fn credit_note_reduces_the_balance_only_once_approved() {
    let (service, store) = service_with_store();
    let profile = Uuid::new_v4();
    let inv = invoice(profile, "1000", Some("10"), "2026-03-05");
    let inv_id = inv.invoice_id;
    store.seed_invoice(inv);
    let note = credit_note(inv_id, "200", "20", "2026-03-10");
    let note_id = note.credit_note_id;
    store.seed_credit_note(note);

    // Pending: visible in the feed, inert in the ledger.
    let before = service.profile_ledger(profile).await.unwrap();
    assert_eq!(before.summary.outstanding_balance, dec("900"));

    approvals::approve(
        &store,
        DocumentRef {
            kind: DocumentKind::CreditNote,
            id: note_id,
        },
    )
    .await
    .unwrap();

    // Approved: -200 gross with -20 reversal nets -180 payable.
    let after = service.profile_ledger(profile).await.unwrap();
    assert_eq!(after.summary.outstanding_balance, dec("720"));
    assert_eq!(after.summary.credit_note_count, 1);
}

#[tokio::test]
async fn ledgers_are_scoped_to_one_profile() {
    let (service, store) = service_with_store();
    let mine = Uuid::new_v4();
    let theirs = Uuid::new_v4();
    store.seed_invoice(invoice(mine, "1000", None, "2026-03-05"));
    store.seed_invoice(invoice(theirs, "9999", None, "2026-03-06"));

    let ledger = service.profile_ledger(mine).await.unwrap();
    assert_eq!(ledger.lines.len(), 1);
    assert_eq!(ledger.summary.total_invoiced, dec("1000"));
}

#[tokio::test]
async fn malformed_documents_are_reported_not_fatal() {
    let (service, store) = service_with_store();
    let profile = Uuid::new_v4();
    store.seed_invoice(invoice(profile, "1000", None, "2026-03-05"));
    let mut bad = invoice(profile, "2000", Some("10"), "2026-03-06");
    bad.tds_percentage = None;
    let bad_id = bad.invoice_id;
    store.seed_invoice(bad);

    let ledger = service.profile_ledger(profile).await.unwrap();
    assert_eq!(ledger.lines.len(), 1);
    assert_eq!(ledger.skipped.len(), 1);
    assert_eq!(ledger.skipped[0].id, bad_id);
}
