//! HTTP handlers for the ledger, feed, report, and approval endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use engine_core::error::AppError;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::engine::feed::{FeedFilter, FeedSort, SortKey, StatusSelector};
use crate::engine::lifecycle::Role;
use crate::models::{EntryKind, Ledger, NormalizedEntry, ReportMode, ReportPeriod};
use crate::services::export;
use crate::services::{approvals, DocumentKind, DocumentRef};

use super::dto::{
    ArchiveRequest, BulkArchiveRequest, FeedParams, FinalizeRequest, PeriodReportResponse,
    RejectRequest, ReportParams, SubmitRequest,
};
use super::AppState;

fn parse_mode(raw: &Option<String>) -> Result<ReportMode, AppError> {
    match raw.as_deref() {
        None => Ok(ReportMode::Live),
        Some(s) => ReportMode::from_str(s).map_err(|e| AppError::InvalidInput(anyhow::anyhow!(e))),
    }
}

fn parse_kind(raw: &str) -> Result<DocumentKind, AppError> {
    DocumentKind::from_str(raw).map_err(|e| AppError::InvalidInput(anyhow::anyhow!(e)))
}

fn role_from_headers(headers: &HeaderMap) -> Role {
    match headers.get("x-user-role").and_then(|v| v.to_str().ok()) {
        Some("admin") => Role::Admin,
        _ => Role::Member,
    }
}

fn csv_response(body: String) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/csv; charset=utf-8")],
        body,
    )
}

pub async fn get_ledger(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<Ledger>, AppError> {
    let ledger = state.service.profile_ledger(profile_id).await?;
    Ok(Json(ledger))
}

pub async fn export_ledger(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ledger = state.service.profile_ledger(profile_id).await?;
    let rows = export::ledger_rows(&ledger);
    Ok(csv_response(export::to_csv(&rows)))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, i32)>,
    Query(params): Query<ReportParams>,
) -> Result<Json<PeriodReportResponse>, AppError> {
    let mode = parse_mode(&params.mode)?;
    let report = state.service.period_view(month, year, mode).await?;
    Ok(Json(PeriodReportResponse {
        period: report.period,
        snapshot: report.snapshot,
        from_snapshot: report.from_snapshot,
    }))
}

pub async fn export_report(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, i32)>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let mode = parse_mode(&params.mode)?;
    let report = state.service.period_view(month, year, mode).await?;
    let rows = export::report_rows(&report.snapshot);
    Ok(csv_response(export::to_csv(&rows)))
}

pub async fn finalize_report(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, i32)>,
    Json(payload): Json<FinalizeRequest>,
) -> Result<Json<ReportPeriod>, AppError> {
    payload.validate()?;
    let period = state.service.finalize(month, year, payload.notes).await?;
    Ok(Json(period))
}

pub async fn submit_report(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, i32)>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<ReportPeriod>, AppError> {
    payload.validate()?;
    let period = state
        .service
        .submit(month, year, payload.submitted_to)
        .await?;
    Ok(Json(period))
}

pub async fn unfinalize_report(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> Result<Json<ReportPeriod>, AppError> {
    let role = role_from_headers(&headers);
    let period = state.service.unfinalize(month, year, role).await?;
    Ok(Json(period))
}

pub async fn get_feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<NormalizedEntry>>, AppError> {
    let kinds = params
        .kind
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(|s| EntryKind::from_str(s.trim()))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
        .map_err(|e| AppError::InvalidInput(anyhow::anyhow!(e)))?;
    let statuses = params
        .status
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(|s| StatusSelector::from_str(s.trim()))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
        .map_err(|e| AppError::InvalidInput(anyhow::anyhow!(e)))?;

    let filter = FeedFilter {
        kinds,
        statuses,
        date_from: params.date_from,
        date_to: params.date_to,
        profile_id: params.profile_id,
        vendor_id: params.vendor_id,
        payment_method_id: params.payment_method_id,
        text: params.q,
    };

    let key = match params.sort.as_deref() {
        None => SortKey::Date,
        Some(s) => SortKey::from_str(s).map_err(|e| AppError::InvalidInput(anyhow::anyhow!(e)))?,
    };
    let descending = match params.order.as_deref() {
        None | Some("asc") => false,
        Some("desc") => true,
        Some(other) => {
            return Err(AppError::InvalidInput(anyhow::anyhow!(
                "unknown sort order '{}'",
                other
            )));
        }
    };
    let sort = FeedSort { key, descending };

    let entries = state.service.feed(&filter, &sort).await?;
    Ok(Json(entries))
}

pub async fn approve_document(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    let kind = parse_kind(&kind)?;
    approvals::approve(
        state.service.document_store().as_ref(),
        DocumentRef { kind, id },
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reject_document(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(payload): Json<RejectRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    let kind = parse_kind(&kind)?;
    approvals::reject(
        state.service.document_store().as_ref(),
        DocumentRef { kind, id },
        &payload.reason,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn archive_document(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(payload): Json<ArchiveRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    let kind = parse_kind(&kind)?;
    approvals::archive(
        state.service.document_store().as_ref(),
        DocumentRef { kind, id },
        &payload.reason,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bulk_archive_documents(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(payload): Json<BulkArchiveRequest>,
) -> Result<Json<approvals::BulkOutcome>, AppError> {
    payload.validate()?;
    let kind = parse_kind(&kind)?;
    let outcome = approvals::bulk_archive(
        state.service.document_store().as_ref(),
        kind,
        &payload.ids,
        &payload.reason,
    )
    .await;
    Ok(Json(outcome))
}
