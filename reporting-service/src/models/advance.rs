//! Advance payment model for reporting-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::entry::ApprovalStatus;

/// Advance paid before an invoice exists.
///
/// `invoice_id` stays null until the advance is reconciled against an
/// invoice; unreconciled advances never enter a profile ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdvancePayment {
    pub advance_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_method_id: Uuid,
    pub advance_date: NaiveDate,
    pub status: ApprovalStatus,
    pub archived: bool,
    pub archived_reason: Option<String>,
    pub rejected_reason: Option<String>,
    pub created_utc: DateTime<Utc>,
}
