//! Payment model for reporting-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Payment recorded against an invoice.
///
/// `amount` is the cash that settled part of the invoice's net payable
/// amount. `tds_applied` is the withholding actually taken when the
/// payment was made; it can differ from the amount the invoice's current
/// configuration would compute, which is why the rounding flag in force
/// at payment time is stored on the payment itself.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub payment_id: Uuid,
    pub invoice_id: Uuid,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method_id: Uuid,
    pub transaction_ref: Option<String>,
    pub tds_applied: Option<Decimal>,
    pub round_up_tds: bool,
    pub created_utc: DateTime<Utc>,
}

/// Filter parameters for listing payments.
#[derive(Debug, Clone, Default)]
pub struct PaymentQuery {
    pub invoice_ids: Option<Vec<Uuid>>,
    pub paid_from: Option<NaiveDate>,
    pub paid_to: Option<NaiveDate>,
}
