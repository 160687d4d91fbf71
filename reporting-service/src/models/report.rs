//! Monthly report models: period lifecycle, sections, frozen snapshots.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::entry::{EntryKind, EntryStatus};

/// How a period's entries are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Everything whose effective event happened in the period,
    /// including payments against prior-month invoices.
    Live,
    /// Strictly invoices issued in the period, whenever they settled.
    InvoiceDate,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::Live => "live",
            ReportMode::InvoiceDate => "invoice_date",
        }
    }
}

impl std::str::FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live" => Ok(ReportMode::Live),
            "invoice_date" => Ok(ReportMode::InvoiceDate),
            other => Err(format!("unknown report mode '{}'", other)),
        }
    }
}

/// Reporting period lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriodStatus {
    Draft,
    Finalized,
    Submitted,
}

impl ReportPeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriodStatus::Draft => "draft",
            ReportPeriodStatus::Finalized => "finalized",
            ReportPeriodStatus::Submitted => "submitted",
        }
    }
}

impl std::fmt::Display for ReportPeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One (month, year) reporting period.
///
/// Created lazily in `draft` on first access. The snapshot column holds
/// the frozen report as JSON once finalized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportPeriod {
    pub period_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub status: ReportPeriodStatus,
    pub snapshot: Option<serde_json::Value>,
    pub finalized_utc: Option<DateTime<Utc>>,
    pub submitted_utc: Option<DateTime<Utc>>,
    pub submitted_to: Option<String>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl ReportPeriod {
    /// Decode the frozen snapshot, if one is stored.
    pub fn parsed_snapshot(&self) -> Result<Option<ReportSnapshot>, serde_json::Error> {
        self.snapshot
            .as_ref()
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
    }
}

/// One row of a report section. `serial` is display-only and scoped to
/// the section; renumbering on re-grouping is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub serial: u32,
    pub entry_id: Uuid,
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub vendor_name: String,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub amount: Decimal,
    pub withheld: Decimal,
    pub status: EntryStatus,
    pub status_label: String,
}

/// Section of a monthly report, one per payment method.
/// `payment_method_id` is `None` for the synthetic "Unpaid" section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub payment_method_id: Option<Uuid>,
    pub name: String,
    pub rows: Vec<ReportRow>,
    pub subtotal: Decimal,
}

/// Grouped monthly report; frozen verbatim on finalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub month: i32,
    pub year: i32,
    pub mode: ReportMode,
    pub sections: Vec<ReportSection>,
    pub grand_total: Decimal,
    pub generated_utc: DateTime<Utc>,
}
