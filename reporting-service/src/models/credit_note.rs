//! Credit note model for reporting-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::entry::ApprovalStatus;

/// Credit note reducing the payable amount of a parent invoice.
///
/// Amounts are stored positive; the normalizer negates them so the
/// ledger fold never special-cases entry kind.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreditNote {
    pub credit_note_id: Uuid,
    pub invoice_id: Uuid,
    pub amount: Decimal,
    pub tds_reversal: Decimal,
    pub note_date: NaiveDate,
    pub status: ApprovalStatus,
    pub reason: Option<String>,
    pub archived: bool,
    pub archived_reason: Option<String>,
    pub rejected_reason: Option<String>,
    pub created_utc: DateTime<Utc>,
}
