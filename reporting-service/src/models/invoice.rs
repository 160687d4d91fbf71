//! Invoice model for reporting-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    PendingApproval,
    Unpaid,
    Partial,
    Paid,
    Overdue,
    OnHold,
    Rejected,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::PendingApproval => "pending_approval",
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Partial => "partial",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::OnHold => "on_hold",
            InvoiceStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vendor invoice document.
///
/// `profile_id` is nullable: one-time invoices are not attached to a
/// billing profile and never appear in a profile ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub profile_id: Option<Uuid>,
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub invoice_number: Option<String>,
    pub description: Option<String>,
    pub gross_amount: Decimal,
    pub currency: String,
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub tds_applicable: bool,
    pub tds_percentage: Option<Decimal>,
    pub round_up_tds: bool,
    pub status: InvoiceStatus,
    pub recurring: bool,
    pub archived: bool,
    pub archived_reason: Option<String>,
    pub rejected_reason: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// Filter parameters for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceQuery {
    pub profile_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
    pub issued_from: Option<NaiveDate>,
    pub issued_to: Option<NaiveDate>,
    pub include_archived: bool,
}
