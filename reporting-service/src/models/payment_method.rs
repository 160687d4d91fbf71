//! Payment method catalog entry.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Configured payment method; `sort_order` fixes the section order in
/// monthly reports.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentMethod {
    pub payment_method_id: Uuid,
    pub name: String,
    pub sort_order: i32,
}
