//! Service layer: store contracts, Postgres implementation, approval
//! commands, report assembly, export flattening, metrics.

pub mod approvals;
pub mod database;
pub mod export;
pub mod metrics;
pub mod reporting;
pub mod store;

pub use approvals::{BulkItemError, BulkOutcome};
pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
pub use reporting::ReportingService;
pub use store::{DocumentKind, DocumentRef, DocumentStore, ReportStore};
