//! Store contracts: the fetch, mutation, and report-persistence
//! boundaries the engine computes against.
//!
//! The engine itself never performs I/O; implementations must provide a
//! single-writer guarantee for status transitions (conditional update or
//! equivalent) so concurrent approve/finalize races serialize.

use async_trait::async_trait;
use engine_core::error::AppError;
use uuid::Uuid;

use crate::models::{
    AdvancePayment, CreditNote, Invoice, InvoiceQuery, Payment, PaymentMethod, PaymentQuery,
    ReportPeriod, ReportSnapshot,
};

/// Document kinds addressable by the mutation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Invoice,
    CreditNote,
    AdvancePayment,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::CreditNote => "credit_note",
            DocumentKind::AdvancePayment => "advance_payment",
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoice" => Ok(DocumentKind::Invoice),
            "credit_note" => Ok(DocumentKind::CreditNote),
            "advance_payment" => Ok(DocumentKind::AdvancePayment),
            other => Err(format!("unknown document kind '{}'", other)),
        }
    }
}

/// Reference to one mutable document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRef {
    pub kind: DocumentKind,
    pub id: Uuid,
}

/// Fetch and mutation contract over the source documents.
///
/// Mutations are idempotent commands: approving a document that is no
/// longer pending, or archiving one already archived, fails with
/// `StateConflict` and leaves the stored state untouched.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>, AppError>;
    async fn list_payments(&self, query: &PaymentQuery) -> Result<Vec<Payment>, AppError>;
    async fn list_credit_notes(&self, include_archived: bool)
        -> Result<Vec<CreditNote>, AppError>;
    async fn list_advance_payments(
        &self,
        include_archived: bool,
    ) -> Result<Vec<AdvancePayment>, AppError>;
    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, AppError>;

    async fn approve(&self, doc: DocumentRef) -> Result<(), AppError>;
    async fn reject(&self, doc: DocumentRef, reason: &str) -> Result<(), AppError>;
    async fn archive(&self, doc: DocumentRef, reason: &str) -> Result<(), AppError>;
}

/// Report-period persistence contract.
///
/// Each transition is guarded by the stored status; a raced second
/// writer must observe `StateConflict`, never overwrite a snapshot.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Fetch the period, creating it lazily in `draft` on first access.
    async fn get_or_create_period(&self, month: i32, year: i32)
        -> Result<ReportPeriod, AppError>;

    /// CAS draft -> finalized, storing the frozen snapshot.
    async fn save_snapshot(
        &self,
        month: i32,
        year: i32,
        snapshot: &ReportSnapshot,
        notes: Option<&str>,
    ) -> Result<ReportPeriod, AppError>;

    /// CAS finalized -> submitted; the snapshot is untouched.
    async fn mark_submitted(
        &self,
        month: i32,
        year: i32,
        submitted_to: &str,
    ) -> Result<ReportPeriod, AppError>;

    /// CAS finalized -> draft, discarding the snapshot.
    async fn clear_snapshot(&self, month: i32, year: i32) -> Result<ReportPeriod, AppError>;
}
