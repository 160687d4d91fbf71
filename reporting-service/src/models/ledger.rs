//! Ledger view models: chronological lines with a running balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::{EntryKind, NormalizedEntry};

/// One ledger line.
///
/// Invariant: `running_balance[i] = running_balance[i-1] +
/// payable_amount[i] - paid_amount[i]`, seeded at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub entry: NormalizedEntry,
    pub payable_amount: Decimal,
    pub paid_amount: Decimal,
    pub running_balance: Decimal,
}

/// Aggregate folded from the same lines as the running balance, so the
/// two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_invoiced: Decimal,
    pub total_withheld: Decimal,
    pub total_paid: Decimal,
    pub outstanding_balance: Decimal,
    pub invoice_count: usize,
    pub payment_count: usize,
    pub credit_note_count: usize,
    pub advance_count: usize,
}

/// Entry excluded from a computation because its record is malformed.
/// Flagged to the caller instead of aborting the whole render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub reason: String,
}

/// Profile ledger: chronological lines plus the folded summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub profile_id: Uuid,
    pub lines: Vec<LedgerLine>,
    pub summary: LedgerSummary,
    pub skipped: Vec<SkippedEntry>,
}
