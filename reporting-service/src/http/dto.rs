//! Request and response shapes for the HTTP API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{ReportPeriod, ReportSnapshot};

/// Query parameters for report views. Mode defaults to `live`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParams {
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FinalizeRequest {
    #[validate(length(max = 2000, message = "notes too long"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(length(min = 1, max = 200, message = "submitted_to is required"))]
    pub submitted_to: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(min = 1, max = 500, message = "a rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ArchiveRequest {
    #[validate(length(min = 1, max = 500, message = "an archive reason is required"))]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkArchiveRequest {
    #[validate(length(min = 1, message = "ids must not be empty"))]
    pub ids: Vec<Uuid>,
    #[validate(length(min = 1, max = 500, message = "an archive reason is required"))]
    pub reason: String,
}

/// Feed query parameters; comma-separated lists for kinds and statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedParams {
    pub kind: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<chrono::NaiveDate>,
    pub date_to: Option<chrono::NaiveDate>,
    pub profile_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub payment_method_id: Option<Uuid>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Report view response: the period state plus the report it serves.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReportResponse {
    pub period: ReportPeriod,
    pub snapshot: ReportSnapshot,
    pub from_snapshot: bool,
}
