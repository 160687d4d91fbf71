//! Normalized entry: the single tagged type every view consumes.
//!
//! Invoices, payments, credit notes, and advance payments are projected
//! into `NormalizedEntry` on demand. The projection is a view, never
//! persisted; consumers match exhaustively on `EntryDetail` so a new
//! source kind cannot be silently ignored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::withholding::withhold;

/// Approval lifecycle shared by credit notes and advance payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    PendingApproval,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::PendingApproval => "pending_approval",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

/// Source kind of a normalized entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Invoice,
    Payment,
    CreditNote,
    Advance,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Invoice => "invoice",
            EntryKind::Payment => "payment",
            EntryKind::CreditNote => "credit_note",
            EntryKind::Advance => "advance",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoice" => Ok(EntryKind::Invoice),
            "payment" => Ok(EntryKind::Payment),
            "credit_note" => Ok(EntryKind::CreditNote),
            "advance" => Ok(EntryKind::Advance),
            other => Err(format!("unknown entry kind '{}'", other)),
        }
    }
}

/// Union of the per-kind statuses, used for filtering across the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    PendingApproval,
    Unpaid,
    Partial,
    Paid,
    Overdue,
    OnHold,
    Rejected,
    Approved,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::PendingApproval => "pending_approval",
            EntryStatus::Unpaid => "unpaid",
            EntryStatus::Partial => "partial",
            EntryStatus::Paid => "paid",
            EntryStatus::Overdue => "overdue",
            EntryStatus::OnHold => "on_hold",
            EntryStatus::Rejected => "rejected",
            EntryStatus::Approved => "approved",
        }
    }

    /// Composite "pending actions" grouping used as a single filter value.
    pub fn is_pending_action(&self) -> bool {
        matches!(
            self,
            EntryStatus::Unpaid
                | EntryStatus::Partial
                | EntryStatus::Overdue
                | EntryStatus::OnHold
                | EntryStatus::PendingApproval
        )
    }

    /// Rank used when sorting the feed by status.
    pub fn sort_rank(&self) -> u8 {
        match self {
            EntryStatus::PendingApproval => 0,
            EntryStatus::Overdue => 1,
            EntryStatus::OnHold => 2,
            EntryStatus::Unpaid => 3,
            EntryStatus::Partial => 4,
            EntryStatus::Approved => 5,
            EntryStatus::Paid => 6,
            EntryStatus::Rejected => 7,
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-kind payload of a normalized entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryDetail {
    Invoice {
        tds_applicable: bool,
        tds_percentage: Option<Decimal>,
        round_up_tds: bool,
        amount_paid: Decimal,
        due_date: Option<NaiveDate>,
    },
    Payment {
        invoice_id: Uuid,
        tds_applied: Option<Decimal>,
        round_up_tds: bool,
    },
    /// Amounts arrive already negated.
    CreditNote {
        invoice_id: Uuid,
        tds_reversal: Decimal,
    },
    Advance {
        invoice_id: Option<Uuid>,
    },
}

/// One entry of the unified document stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Negative for credit notes.
    pub gross_amount: Decimal,
    pub status: EntryStatus,
    pub payment_method_id: Option<Uuid>,
    pub profile_id: Option<Uuid>,
    /// Resolved through the parent invoice for non-invoice kinds.
    pub vendor_id: Option<Uuid>,
    pub vendor_name: String,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub detail: EntryDetail,
}

impl NormalizedEntry {
    pub fn kind(&self) -> EntryKind {
        match self.detail {
            EntryDetail::Invoice { .. } => EntryKind::Invoice,
            EntryDetail::Payment { .. } => EntryKind::Payment,
            EntryDetail::CreditNote { .. } => EntryKind::CreditNote,
            EntryDetail::Advance { .. } => EntryKind::Advance,
        }
    }

    /// Net payable amount (gross minus withholding) for payable-bearing
    /// kinds, zero for payment-side kinds.
    pub fn payable_amount(&self) -> Decimal {
        match &self.detail {
            EntryDetail::Invoice {
                tds_applicable,
                tds_percentage,
                round_up_tds,
                ..
            } => {
                let pct = if *tds_applicable { *tds_percentage } else { None };
                withhold(self.gross_amount, pct, *round_up_tds).payable
            }
            // Stored reversal, not a recomputation: the percentage in
            // force when the note was issued may no longer match.
            EntryDetail::CreditNote { tds_reversal, .. } => self.gross_amount - *tds_reversal,
            EntryDetail::Payment { .. } | EntryDetail::Advance { .. } => Decimal::ZERO,
        }
    }

    /// Amount that settles a balance, zero for payable-bearing kinds.
    pub fn paid_amount(&self) -> Decimal {
        match &self.detail {
            EntryDetail::Payment { .. } | EntryDetail::Advance { .. } => self.gross_amount,
            EntryDetail::Invoice { .. } | EntryDetail::CreditNote { .. } => Decimal::ZERO,
        }
    }

    /// Withholding carried by this entry, for TDS report columns.
    pub fn withheld_amount(&self) -> Decimal {
        match &self.detail {
            EntryDetail::Invoice { .. } => self.gross_amount - self.payable_amount(),
            EntryDetail::Payment { tds_applied, .. } => tds_applied.unwrap_or(Decimal::ZERO),
            EntryDetail::CreditNote { tds_reversal, .. } => *tds_reversal,
            EntryDetail::Advance { .. } => Decimal::ZERO,
        }
    }

    /// Outstanding amount, used by the remaining-balance sort key.
    pub fn remaining_balance(&self) -> Decimal {
        match &self.detail {
            EntryDetail::Invoice { amount_paid, .. } => self.payable_amount() - *amount_paid,
            EntryDetail::Payment { .. }
            | EntryDetail::CreditNote { .. }
            | EntryDetail::Advance { .. } => Decimal::ZERO,
        }
    }

    /// Display label folding the paid percentage into the status.
    /// Read-model only; `status` stays unmodified for filtering.
    pub fn display_status(&self) -> String {
        match &self.detail {
            EntryDetail::Invoice { amount_paid, .. } if self.status == EntryStatus::Partial => {
                let payable = self.payable_amount();
                if payable.is_zero() {
                    return self.status.as_str().to_string();
                }
                let pct = (*amount_paid * Decimal::from(100) / payable)
                    .round()
                    .to_i64()
                    .unwrap_or(0);
                format!("partial ({}%)", pct)
            }
            _ => self.status.as_str().to_string(),
        }
    }
}
