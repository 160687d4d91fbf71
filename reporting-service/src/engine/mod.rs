//! Pure computation layer: withholding, normalization, ledger, report
//! grouping, period lifecycle, feed query.
//!
//! Nothing here performs I/O. Failures are typed values so one bad
//! record never aborts a whole ledger or report render.

pub mod feed;
pub mod ledger;
pub mod lifecycle;
pub mod normalize;
pub mod report;
pub mod withholding;

use engine_core::error::AppError;
use thiserror::Error;

/// Typed failure of a pure computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("state conflict: {0}")]
    StateConflict(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidInput(msg) => AppError::InvalidInput(anyhow::anyhow!(msg)),
            EngineError::StateConflict(msg) => AppError::StateConflict(anyhow::anyhow!(msg)),
            EngineError::NotFound(msg) => AppError::NotFound(anyhow::anyhow!(msg)),
        }
    }
}
