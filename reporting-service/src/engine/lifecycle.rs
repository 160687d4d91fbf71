//! Report period lifecycle: draft -> finalized -> submitted, with an
//! admin-only unfinalize back to draft.
//!
//! These transitions are pure; the store layer mirrors each guard with
//! a conditional update so concurrent writers serialize and the loser
//! sees the same `StateConflict`.

use chrono::{DateTime, Utc};

use super::EngineError;
use crate::models::{ReportPeriod, ReportPeriodStatus, ReportSnapshot};

/// Caller's privilege level. Mapping a session to a role is the
/// gateway's job; the engine only enforces the transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Member,
    Admin,
}

/// Freeze the current live report into the period.
///
/// Allowed only from `draft`; re-finalizing a finalized period is a
/// conflict, never a silent replace.
pub fn finalize(
    period: &ReportPeriod,
    snapshot: &ReportSnapshot,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<ReportPeriod, EngineError> {
    match period.status {
        ReportPeriodStatus::Draft => {}
        status => {
            return Err(EngineError::StateConflict(format!(
                "cannot finalize {}/{}: period is {}",
                period.month, period.year, status
            )));
        }
    }

    let snapshot_json = serde_json::to_value(snapshot)
        .map_err(|e| EngineError::InvalidInput(format!("snapshot not serializable: {}", e)))?;

    Ok(ReportPeriod {
        status: ReportPeriodStatus::Finalized,
        snapshot: Some(snapshot_json),
        finalized_utc: Some(now),
        notes,
        ..period.clone()
    })
}

/// Record submission of a finalized report. The snapshot is untouched;
/// `submitted` is terminal.
pub fn submit(
    period: &ReportPeriod,
    submitted_to: String,
    now: DateTime<Utc>,
) -> Result<ReportPeriod, EngineError> {
    match period.status {
        ReportPeriodStatus::Finalized => {}
        status => {
            return Err(EngineError::StateConflict(format!(
                "cannot submit {}/{}: period is {}",
                period.month, period.year, status
            )));
        }
    }

    Ok(ReportPeriod {
        status: ReportPeriodStatus::Submitted,
        submitted_utc: Some(now),
        submitted_to: Some(submitted_to),
        ..period.clone()
    })
}

/// Discard a finalized snapshot and reopen the period. Admin only, and
/// never allowed once submitted.
pub fn unfinalize(period: &ReportPeriod, role: Role) -> Result<ReportPeriod, EngineError> {
    if role != Role::Admin {
        return Err(EngineError::StateConflict(format!(
            "only an admin may reopen {}/{}",
            period.month, period.year
        )));
    }
    match period.status {
        ReportPeriodStatus::Finalized => {}
        status => {
            return Err(EngineError::StateConflict(format!(
                "cannot reopen {}/{}: period is {}",
                period.month, period.year, status
            )));
        }
    }

    Ok(ReportPeriod {
        status: ReportPeriodStatus::Draft,
        snapshot: None,
        finalized_utc: None,
        notes: None,
        ..period.clone()
    })
}
