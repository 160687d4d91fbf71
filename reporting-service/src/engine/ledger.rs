//! Ledger builder: chronological profile ledger with a running balance.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    EntryDetail, EntryStatus, Ledger, LedgerLine, LedgerSummary, NormalizedEntry,
};

/// Whether an entry participates in balance arithmetic. Documents that
/// are not (or no longer) payable stay visible in the feed but must not
/// move the running balance.
fn affects_balance(entry: &NormalizedEntry) -> bool {
    match entry.detail {
        EntryDetail::Invoice { .. } => !matches!(
            entry.status,
            EntryStatus::PendingApproval | EntryStatus::Rejected
        ),
        // Credit notes and advances count only once approved.
        EntryDetail::CreditNote { .. } | EntryDetail::Advance { .. } => {
            entry.status == EntryStatus::Approved
        }
        EntryDetail::Payment { .. } => true,
    }
}

/// Same-date tie-break: payable-bearing entries before settling ones,
/// so a same-day invoice+payment pair never dips the balance negative.
fn side_rank(entry: &NormalizedEntry) -> u8 {
    match entry.detail {
        EntryDetail::Invoice { .. } | EntryDetail::CreditNote { .. } => 0,
        EntryDetail::Payment { .. } | EntryDetail::Advance { .. } => 1,
    }
}

/// Build the chronological ledger for one billing profile.
///
/// Entries are filtered to the profile, ordered by date (ties: invoices
/// before payments, then stable insertion order), and folded left into
/// the running balance. The summary is a reduction over the same lines,
/// so it cannot drift from the per-row values.
pub fn build_ledger(profile_id: Uuid, entries: &[NormalizedEntry]) -> Ledger {
    let mut selected: Vec<&NormalizedEntry> = entries
        .iter()
        .filter(|e| e.profile_id == Some(profile_id) && affects_balance(e))
        .collect();
    selected.sort_by_key(|e| (e.date, side_rank(e)));

    let mut lines = Vec::with_capacity(selected.len());
    let mut summary = LedgerSummary::default();
    let mut balance = Decimal::ZERO;

    for entry in selected {
        let payable_amount = entry.payable_amount();
        let paid_amount = entry.paid_amount();
        balance += payable_amount - paid_amount;

        match entry.detail {
            EntryDetail::Invoice { .. } => {
                summary.invoice_count += 1;
                summary.total_invoiced += entry.gross_amount;
                summary.total_withheld += entry.withheld_amount();
            }
            EntryDetail::Payment { .. } => {
                summary.payment_count += 1;
                summary.total_paid += paid_amount;
            }
            EntryDetail::CreditNote { .. } => {
                summary.credit_note_count += 1;
                summary.total_invoiced += entry.gross_amount;
                summary.total_withheld += entry.withheld_amount();
            }
            EntryDetail::Advance { .. } => {
                summary.advance_count += 1;
                summary.total_paid += paid_amount;
            }
        }

        lines.push(LedgerLine {
            entry: entry.clone(),
            payable_amount,
            paid_amount,
            running_balance: balance,
        });
    }

    summary.outstanding_balance = balance;

    Ledger {
        profile_id,
        lines,
        summary,
        skipped: Vec::new(),
    }
}
