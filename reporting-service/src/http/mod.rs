//! HTTP API: routing and request/response shapes.

pub mod dto;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;

use crate::services::ReportingService;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: ReportingService,
}

/// API router. Health, readiness, and metrics live beside it in the
/// startup module.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/profiles/:profile_id/ledger", get(handlers::get_ledger))
        .route(
            "/api/profiles/:profile_id/ledger/export",
            get(handlers::export_ledger),
        )
        .route("/api/feed", get(handlers::get_feed))
        .route("/api/reports/:year/:month", get(handlers::get_report))
        .route(
            "/api/reports/:year/:month/export",
            get(handlers::export_report),
        )
        .route(
            "/api/reports/:year/:month/finalize",
            post(handlers::finalize_report),
        )
        .route(
            "/api/reports/:year/:month/submit",
            post(handlers::submit_report),
        )
        .route(
            "/api/reports/:year/:month/unfinalize",
            post(handlers::unfinalize_report),
        )
        .route(
            "/api/documents/:kind/:id/approve",
            post(handlers::approve_document),
        )
        .route(
            "/api/documents/:kind/:id/reject",
            post(handlers::reject_document),
        )
        .route(
            "/api/documents/:kind/:id/archive",
            post(handlers::archive_document),
        )
        .route(
            "/api/documents/:kind/bulk-archive",
            post(handlers::bulk_archive_documents),
        )
        .with_state(state)
}
