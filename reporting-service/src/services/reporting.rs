//! Report assembly: fetches the working set through the store
//! contracts, runs the pure engine over it, and drives the report
//! period lifecycle against the persistence layer.

use chrono::Utc;
use engine_core::error::AppError;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::engine::feed::{self, FeedFilter, FeedSort};
use crate::engine::ledger::build_ledger;
use crate::engine::lifecycle::{self, Role};
use crate::engine::normalize::{normalize_all, NormalizedStream, SourceDocuments};
use crate::engine::report::build_report;
use crate::models::{
    InvoiceQuery, Ledger, NormalizedEntry, PaymentQuery, ReportMode, ReportPeriod,
    ReportPeriodStatus, ReportSnapshot,
};
use crate::services::metrics::{
    LEDGER_BUILDS_TOTAL, LIFECYCLE_TRANSITIONS_TOTAL, REPORT_RENDERS_TOTAL,
};
use crate::services::store::{DocumentStore, ReportStore};

/// A report view plus where it came from. Finalized and submitted
/// periods always serve the frozen snapshot; drafts compute live.
#[derive(Debug, Clone)]
pub struct PeriodReport {
    pub period: ReportPeriod,
    pub snapshot: ReportSnapshot,
    pub from_snapshot: bool,
}

/// Orchestrates fetch, normalization, and persistence around the pure
/// engine.
#[derive(Clone)]
pub struct ReportingService {
    docs: Arc<dyn DocumentStore>,
    reports: Arc<dyn ReportStore>,
}

impl ReportingService {
    pub fn new(docs: Arc<dyn DocumentStore>, reports: Arc<dyn ReportStore>) -> Self {
        Self { docs, reports }
    }

    /// Fetch the full working set and normalize it. Archived documents
    /// are excluded at the fetch boundary.
    async fn normalized_stream(&self) -> Result<NormalizedStream, AppError> {
        let invoices = self.docs.list_invoices(&InvoiceQuery::default()).await?;
        let payments = self.docs.list_payments(&PaymentQuery::default()).await?;
        let credit_notes = self.docs.list_credit_notes(false).await?;
        let advances = self.docs.list_advance_payments(false).await?;

        let docs = SourceDocuments {
            invoices,
            payments,
            credit_notes,
            advances,
        };
        let today = Utc::now().date_naive();
        Ok(normalize_all(&docs, today))
    }

    /// Chronological ledger with running balance for one profile.
    #[instrument(skip(self))]
    pub async fn profile_ledger(&self, profile_id: Uuid) -> Result<Ledger, AppError> {
        let stream = match self.normalized_stream().await {
            Ok(s) => s,
            Err(e) => {
                LEDGER_BUILDS_TOTAL.with_label_values(&["error"]).inc();
                return Err(e);
            }
        };
        let mut ledger = build_ledger(profile_id, &stream.entries);
        ledger.skipped = stream.skipped;
        LEDGER_BUILDS_TOTAL.with_label_values(&["ok"]).inc();
        Ok(ledger)
    }

    /// Normalized entries for the feed endpoint.
    #[instrument(skip(self, filter, sort))]
    pub async fn feed(
        &self,
        filter: &FeedFilter,
        sort: &FeedSort,
    ) -> Result<Vec<NormalizedEntry>, AppError> {
        let stream = self.normalized_stream().await?;
        Ok(feed::query(&stream.entries, filter, sort))
    }

    /// Compute the live monthly report, ignoring any stored snapshot.
    #[instrument(skip(self))]
    pub async fn monthly_report(
        &self,
        month: i32,
        year: i32,
        mode: ReportMode,
    ) -> Result<ReportSnapshot, AppError> {
        validate_period(month, year)?;
        let stream = self.normalized_stream().await?;
        let methods = self.docs.list_payment_methods().await?;
        let snapshot = build_report(&stream.entries, month, year, mode, &methods, Utc::now());
        REPORT_RENDERS_TOTAL
            .with_label_values(&[mode.as_str(), "computed"])
            .inc();
        Ok(snapshot)
    }

    /// View a period's report: the frozen snapshot once finalized or
    /// submitted, a live computation while still draft.
    #[instrument(skip(self))]
    pub async fn period_view(
        &self,
        month: i32,
        year: i32,
        mode: ReportMode,
    ) -> Result<PeriodReport, AppError> {
        validate_period(month, year)?;
        let period = self.reports.get_or_create_period(month, year).await?;

        if period.status != ReportPeriodStatus::Draft {
            let parsed = period.parsed_snapshot().map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("stored snapshot is unreadable: {}", e))
            })?;
            if let Some(snapshot) = parsed {
                REPORT_RENDERS_TOTAL
                    .with_label_values(&[snapshot.mode.as_str(), "snapshot"])
                    .inc();
                return Ok(PeriodReport {
                    period,
                    snapshot,
                    from_snapshot: true,
                });
            }
        }

        let snapshot = self.monthly_report(month, year, mode).await?;
        Ok(PeriodReport {
            period,
            snapshot,
            from_snapshot: false,
        })
    }

    /// Freeze the current live report into the period. The frozen view
    /// is always `live`; date-basis views stay a read-time choice.
    #[instrument(skip(self, notes))]
    pub async fn finalize(
        &self,
        month: i32,
        year: i32,
        notes: Option<String>,
    ) -> Result<ReportPeriod, AppError> {
        validate_period(month, year)?;
        let period = self.reports.get_or_create_period(month, year).await?;
        let snapshot = self.monthly_report(month, year, ReportMode::Live).await?;

        // Pure guard first so an already-finalized period fails before
        // any write is attempted.
        if let Err(e) = lifecycle::finalize(&period, &snapshot, notes.clone(), Utc::now()) {
            LIFECYCLE_TRANSITIONS_TOTAL
                .with_label_values(&["finalize", "conflict"])
                .inc();
            return Err(e.into());
        }

        match self
            .reports
            .save_snapshot(month, year, &snapshot, notes.as_deref())
            .await
        {
            Ok(updated) => {
                LIFECYCLE_TRANSITIONS_TOTAL
                    .with_label_values(&["finalize", "ok"])
                    .inc();
                info!(month, year, "report period finalized");
                Ok(updated)
            }
            Err(e) => {
                let outcome = match &e {
                    AppError::StateConflict(_) => "conflict",
                    _ => "error",
                };
                LIFECYCLE_TRANSITIONS_TOTAL
                    .with_label_values(&["finalize", outcome])
                    .inc();
                Err(e)
            }
        }
    }

    /// Record submission of a finalized report.
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        month: i32,
        year: i32,
        submitted_to: String,
    ) -> Result<ReportPeriod, AppError> {
        validate_period(month, year)?;
        let period = self.reports.get_or_create_period(month, year).await?;

        if let Err(e) = lifecycle::submit(&period, submitted_to.clone(), Utc::now()) {
            LIFECYCLE_TRANSITIONS_TOTAL
                .with_label_values(&["submit", "conflict"])
                .inc();
            return Err(e.into());
        }

        match self.reports.mark_submitted(month, year, &submitted_to).await {
            Ok(updated) => {
                LIFECYCLE_TRANSITIONS_TOTAL
                    .with_label_values(&["submit", "ok"])
                    .inc();
                info!(month, year, submitted_to = %submitted_to, "report period submitted");
                Ok(updated)
            }
            Err(e) => {
                let outcome = match &e {
                    AppError::StateConflict(_) => "conflict",
                    _ => "error",
                };
                LIFECYCLE_TRANSITIONS_TOTAL
                    .with_label_values(&["submit", outcome])
                    .inc();
                Err(e)
            }
        }
    }

    /// Reopen a finalized period, discarding its snapshot. Admin only.
    #[instrument(skip(self))]
    pub async fn unfinalize(
        &self,
        month: i32,
        year: i32,
        role: Role,
    ) -> Result<ReportPeriod, AppError> {
        validate_period(month, year)?;
        if role != Role::Admin {
            LIFECYCLE_TRANSITIONS_TOTAL
                .with_label_values(&["unfinalize", "conflict"])
                .inc();
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "only an admin may reopen a finalized period"
            )));
        }
        let period = self.reports.get_or_create_period(month, year).await?;

        if let Err(e) = lifecycle::unfinalize(&period, role) {
            LIFECYCLE_TRANSITIONS_TOTAL
                .with_label_values(&["unfinalize", "conflict"])
                .inc();
            return Err(e.into());
        }

        match self.reports.clear_snapshot(month, year).await {
            Ok(updated) => {
                LIFECYCLE_TRANSITIONS_TOTAL
                    .with_label_values(&["unfinalize", "ok"])
                    .inc();
                info!(month, year, "report period reopened");
                Ok(updated)
            }
            Err(e) => {
                let outcome = match &e {
                    AppError::StateConflict(_) => "conflict",
                    _ => "error",
                };
                LIFECYCLE_TRANSITIONS_TOTAL
                    .with_label_values(&["unfinalize", outcome])
                    .inc();
                Err(e)
            }
        }
    }

    pub fn document_store(&self) -> &Arc<dyn DocumentStore> {
        &self.docs
    }

    pub fn report_store(&self) -> &Arc<dyn ReportStore> {
        &self.reports
    }
}

fn validate_period(month: i32, year: i32) -> Result<(), AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::InvalidInput(anyhow::anyhow!(
            "month must be 1..=12, got {}",
            month
        )));
    }
    if !(2000..=2100).contains(&year) {
        return Err(AppError::InvalidInput(anyhow::anyhow!(
            "year {} is out of range",
            year
        )));
    }
    Ok(())
}
