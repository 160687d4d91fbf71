//! Shared test fixtures: an in-memory store implementing the document
//! and report-period contracts with the same conditional-transition
//! semantics as the Postgres implementation.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use engine_core::error::AppError;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use reporting_service::models::{
    AdvancePayment, ApprovalStatus, CreditNote, Invoice, InvoiceQuery, InvoiceStatus, Payment,
    PaymentMethod, PaymentQuery, ReportPeriod, ReportPeriodStatus, ReportSnapshot,
};
use reporting_service::services::{
    DocumentKind, DocumentRef, DocumentStore, ReportStore, ReportingService,
};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

pub fn invoice(profile_id: Uuid, gross: &str, pct: Option<&str>, issued: &str) -> Invoice {
    Invoice {
        invoice_id: Uuid::new_v4(),
        profile_id: Some(profile_id),
        vendor_id: Uuid::new_v4(),
        vendor_name: "Acme Supplies".into(),
        invoice_number: Some("INV-001".into()),
        description: None,
        gross_amount: dec(gross),
        currency: "INR".into(),
        issue_date: date(issued),
        due_date: None,
        tds_applicable: pct.is_some(),
        tds_percentage: pct.map(dec),
        round_up_tds: false,
        status: InvoiceStatus::Unpaid,
        recurring: false,
        archived: false,
        archived_reason: None,
        rejected_reason: None,
        created_utc: Utc::now(),
    }
}

pub fn payment(invoice_id: Uuid, method: Uuid, amount: &str, day: &str) -> Payment {
    Payment {
        payment_id: Uuid::new_v4(),
        invoice_id,
        amount: dec(amount),
        payment_date: date(day),
        payment_method_id: method,
        transaction_ref: Some("TXN-42".into()),
        tds_applied: None,
        round_up_tds: false,
        created_utc: Utc::now(),
    }
}

pub fn credit_note(invoice_id: Uuid, amount: &str, reversal: &str, day: &str) -> CreditNote {
    CreditNote {
        credit_note_id: Uuid::new_v4(),
        invoice_id,
        amount: dec(amount),
        tds_reversal: dec(reversal),
        note_date: date(day),
        status: ApprovalStatus::PendingApproval,
        reason: Some("short delivery".into()),
        archived: false,
        archived_reason: None,
        rejected_reason: None,
        created_utc: Utc::now(),
    }
}

pub fn advance(method: Uuid, amount: &str, day: &str) -> AdvancePayment {
    AdvancePayment {
        advance_id: Uuid::new_v4(),
        invoice_id: None,
        amount: dec(amount),
        payment_method_id: method,
        advance_date: date(day),
        status: ApprovalStatus::PendingApproval,
        archived: false,
        archived_reason: None,
        rejected_reason: None,
        created_utc: Utc::now(),
    }
}

pub fn method(name: &str, sort_order: i32) -> PaymentMethod {
    PaymentMethod {
        payment_method_id: Uuid::new_v4(),
        name: name.into(),
        sort_order,
    }
}

#[derive(Default)]
struct Inner {
    invoices: Vec<Invoice>,
    payments: Vec<Payment>,
    credit_notes: Vec<CreditNote>,
    advances: Vec<AdvancePayment>,
    methods: Vec<PaymentMethod>,
    periods: Vec<ReportPeriod>,
}

/// In-memory store with the same transition guards as the database.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_invoice(&self, invoice: Invoice) {
        self.inner.lock().unwrap().invoices.push(invoice);
    }

    pub fn seed_payment(&self, payment: Payment) {
        self.inner.lock().unwrap().payments.push(payment);
    }

    pub fn seed_credit_note(&self, note: CreditNote) {
        self.inner.lock().unwrap().credit_notes.push(note);
    }

    pub fn seed_advance(&self, advance: AdvancePayment) {
        self.inner.lock().unwrap().advances.push(advance);
    }

    pub fn seed_method(&self, method: PaymentMethod) {
        self.inner.lock().unwrap().methods.push(method);
    }

    pub fn invoice_status(&self, id: Uuid) -> Option<InvoiceStatus> {
        self.inner
            .lock()
            .unwrap()
            .invoices
            .iter()
            .find(|i| i.invoice_id == id)
            .map(|i| i.status)
    }

    pub fn invoice_archived(&self, id: Uuid) -> Option<bool> {
        self.inner
            .lock()
            .unwrap()
            .invoices
            .iter()
            .find(|i| i.invoice_id == id)
            .map(|i| i.archived)
    }

    pub fn credit_note_status(&self, id: Uuid) -> Option<ApprovalStatus> {
        self.inner
            .lock()
            .unwrap()
            .credit_notes
            .iter()
            .find(|n| n.credit_note_id == id)
            .map(|n| n.status)
    }
}

fn not_found(kind: DocumentKind, id: Uuid) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{} {} does not exist", kind.as_str(), id))
}

fn conflict(kind: DocumentKind, id: Uuid, detail: &str) -> AppError {
    AppError::StateConflict(anyhow::anyhow!("{} {} is {}", kind.as_str(), id, detail))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .invoices
            .iter()
            .filter(|i| query.profile_id.is_none_or(|p| i.profile_id == Some(p)))
            .filter(|i| query.vendor_id.is_none_or(|v| i.vendor_id == v))
            .filter(|i| query.status.is_none_or(|s| i.status == s))
            .filter(|i| query.issued_from.is_none_or(|d| i.issue_date >= d))
            .filter(|i| query.issued_to.is_none_or(|d| i.issue_date <= d))
            .filter(|i| !i.archived || query.include_archived)
            .cloned()
            .collect())
    }

    async fn list_payments(&self, query: &PaymentQuery) -> Result<Vec<Payment>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .payments
            .iter()
            .filter(|p| {
                query
                    .invoice_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&p.invoice_id))
            })
            .filter(|p| query.paid_from.is_none_or(|d| p.payment_date >= d))
            .filter(|p| query.paid_to.is_none_or(|d| p.payment_date <= d))
            .cloned()
            .collect())
    }

    async fn list_credit_notes(
        &self,
        include_archived: bool,
    ) -> Result<Vec<CreditNote>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .credit_notes
            .iter()
            .filter(|n| !n.archived || include_archived)
            .cloned()
            .collect())
    }

    async fn list_advance_payments(
        &self,
        include_archived: bool,
    ) -> Result<Vec<AdvancePayment>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .advances
            .iter()
            .filter(|a| !a.archived || include_archived)
            .cloned()
            .collect())
    }

    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, AppError> {
        Ok(self.inner.lock().unwrap().methods.clone())
    }

    async fn approve(&self, doc: DocumentRef) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        match doc.kind {
            DocumentKind::Invoice => {
                let invoice = inner
                    .invoices
                    .iter_mut()
                    .find(|i| i.invoice_id == doc.id)
                    .ok_or_else(|| not_found(doc.kind, doc.id))?;
                if invoice.status != InvoiceStatus::PendingApproval {
                    return Err(conflict(doc.kind, doc.id, "no longer pending"));
                }
                invoice.status = InvoiceStatus::Unpaid;
            }
            DocumentKind::CreditNote => {
                let note = inner
                    .credit_notes
                    .iter_mut()
                    .find(|n| n.credit_note_id == doc.id)
                    .ok_or_else(|| not_found(doc.kind, doc.id))?;
                if note.status != ApprovalStatus::PendingApproval {
                    return Err(conflict(doc.kind, doc.id, "no longer pending"));
                }
                note.status = ApprovalStatus::Approved;
            }
            DocumentKind::AdvancePayment => {
                let adv = inner
                    .advances
                    .iter_mut()
                    .find(|a| a.advance_id == doc.id)
                    .ok_or_else(|| not_found(doc.kind, doc.id))?;
                if adv.status != ApprovalStatus::PendingApproval {
                    return Err(conflict(doc.kind, doc.id, "no longer pending"));
                }
                adv.status = ApprovalStatus::Approved;
            }
        }
        Ok(())
    }

    async fn reject(&self, doc: DocumentRef, reason: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        match doc.kind {
            DocumentKind::Invoice => {
                let invoice = inner
                    .invoices
                    .iter_mut()
                    .find(|i| i.invoice_id == doc.id)
                    .ok_or_else(|| not_found(doc.kind, doc.id))?;
                if invoice.status != InvoiceStatus::PendingApproval {
                    return Err(conflict(doc.kind, doc.id, "no longer pending"));
                }
                invoice.status = InvoiceStatus::Rejected;
                invoice.rejected_reason = Some(reason.to_string());
            }
            DocumentKind::CreditNote => {
                let note = inner
                    .credit_notes
                    .iter_mut()
                    .find(|n| n.credit_note_id == doc.id)
                    .ok_or_else(|| not_found(doc.kind, doc.id))?;
                if note.status != ApprovalStatus::PendingApproval {
                    return Err(conflict(doc.kind, doc.id, "no longer pending"));
                }
                note.status = ApprovalStatus::Rejected;
                note.rejected_reason = Some(reason.to_string());
            }
            DocumentKind::AdvancePayment => {
                let adv = inner
                    .advances
                    .iter_mut()
                    .find(|a| a.advance_id == doc.id)
                    .ok_or_else(|| not_found(doc.kind, doc.id))?;
                if adv.status != ApprovalStatus::PendingApproval {
                    return Err(conflict(doc.kind, doc.id, "no longer pending"));
                }
                adv.status = ApprovalStatus::Rejected;
                adv.rejected_reason = Some(reason.to_string());
            }
        }
        Ok(())
    }

    async fn archive(&self, doc: DocumentRef, reason: &str) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        let (archived, archived_reason) = match doc.kind {
            DocumentKind::Invoice => {
                let invoice = inner
                    .invoices
                    .iter_mut()
                    .find(|i| i.invoice_id == doc.id)
                    .ok_or_else(|| not_found(doc.kind, doc.id))?;
                (&mut invoice.archived, &mut invoice.archived_reason)
            }
            DocumentKind::CreditNote => {
                let note = inner
                    .credit_notes
                    .iter_mut()
                    .find(|n| n.credit_note_id == doc.id)
                    .ok_or_else(|| not_found(doc.kind, doc.id))?;
                (&mut note.archived, &mut note.archived_reason)
            }
            DocumentKind::AdvancePayment => {
                let adv = inner
                    .advances
                    .iter_mut()
                    .find(|a| a.advance_id == doc.id)
                    .ok_or_else(|| not_found(doc.kind, doc.id))?;
                (&mut adv.archived, &mut adv.archived_reason)
            }
        };
        if *archived {
            return Err(conflict(doc.kind, doc.id, "already archived"));
        }
        *archived = true;
        *archived_reason = Some(reason.to_string());
        Ok(())
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn get_or_create_period(
        &self,
        month: i32,
        year: i32,
    ) -> Result<ReportPeriod, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(period) = inner
            .periods
            .iter()
            .find(|p| p.month == month && p.year == year)
        {
            return Ok(period.clone());
        }
        let period = ReportPeriod {
            period_id: Uuid::new_v4(),
            month,
            year,
            status: ReportPeriodStatus::Draft,
            snapshot: None,
            finalized_utc: None,
            submitted_utc: None,
            submitted_to: None,
            notes: None,
            created_utc: Utc::now(),
        };
        inner.periods.push(period.clone());
        Ok(period)
    }

    async fn save_snapshot(
        &self,
        month: i32,
        year: i32,
        snapshot: &ReportSnapshot,
        notes: Option<&str>,
    ) -> Result<ReportPeriod, AppError> {
        let snapshot_json = serde_json::to_value(snapshot)
            .map_err(|e| AppError::InvalidInput(anyhow::anyhow!("bad snapshot: {}", e)))?;
        let mut inner = self.inner.lock().unwrap();
        let period = inner
            .periods
            .iter_mut()
            .find(|p| p.month == month && p.year == year)
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("period {}/{} does not exist", month, year))
            })?;
        if period.status != ReportPeriodStatus::Draft {
            return Err(AppError::StateConflict(anyhow::anyhow!(
                "report period {}/{} is no longer draft",
                month,
                year
            )));
        }
        period.status = ReportPeriodStatus::Finalized;
        period.snapshot = Some(snapshot_json);
        period.notes = notes.map(|s| s.to_string());
        period.finalized_utc = Some(Utc::now());
        Ok(period.clone())
    }

    async fn mark_submitted(
        &self,
        month: i32,
        year: i32,
        submitted_to: &str,
    ) -> Result<ReportPeriod, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let period = inner
            .periods
            .iter_mut()
            .find(|p| p.month == month && p.year == year)
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("period {}/{} does not exist", month, year))
            })?;
        if period.status != ReportPeriodStatus::Finalized {
            return Err(AppError::StateConflict(anyhow::anyhow!(
                "report period {}/{} is not finalized",
                month,
                year
            )));
        }
        period.status = ReportPeriodStatus::Submitted;
        period.submitted_to = Some(submitted_to.to_string());
        period.submitted_utc = Some(Utc::now());
        Ok(period.clone())
    }

    async fn clear_snapshot(&self, month: i32, year: i32) -> Result<ReportPeriod, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let period = inner
            .periods
            .iter_mut()
            .find(|p| p.month == month && p.year == year)
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("period {}/{} does not exist", month, year))
            })?;
        if period.status != ReportPeriodStatus::Finalized {
            return Err(AppError::StateConflict(anyhow::anyhow!(
                "report period {}/{} is not finalized",
                month,
                year
            )));
        }
        period.status = ReportPeriodStatus::Draft;
        period.snapshot = None;
        period.notes = None;
        period.finalized_utc = None;
        Ok(period.clone())
    }
}

/// Reporting service wired to a fresh in-memory store.
pub fn service_with_store() -> (ReportingService, MemoryStore) {
    let store = MemoryStore::new();
    let service = ReportingService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );
    (service, store)
}
