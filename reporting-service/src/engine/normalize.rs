//! Entry normalizer: projects the four source document kinds into
//! `NormalizedEntry`, total over every kind.
//!
//! Credit-note amounts (and their withholding reversals) are negated
//! here so the ledger fold and report subtotals never branch on kind.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use super::withholding::{validate_percentage, withhold};
use super::EngineError;
use crate::models::{
    AdvancePayment, ApprovalStatus, CreditNote, EntryDetail, EntryStatus, Invoice, InvoiceStatus,
    NormalizedEntry, Payment, SkippedEntry,
};

/// Already-fetched working set handed in by the collaborating store.
#[derive(Debug, Clone, Default)]
pub struct SourceDocuments {
    pub invoices: Vec<Invoice>,
    pub payments: Vec<Payment>,
    pub credit_notes: Vec<CreditNote>,
    pub advances: Vec<AdvancePayment>,
}

/// Normalization output: good entries plus flagged rejects. A malformed
/// record is excluded and reported, never silently coerced and never
/// fatal to the rest of the stream.
#[derive(Debug, Clone, Default)]
pub struct NormalizedStream {
    pub entries: Vec<NormalizedEntry>,
    pub skipped: Vec<SkippedEntry>,
}

fn approval_to_entry_status(status: ApprovalStatus) -> EntryStatus {
    match status {
        ApprovalStatus::PendingApproval => EntryStatus::PendingApproval,
        ApprovalStatus::Approved => EntryStatus::Approved,
        ApprovalStatus::Rejected => EntryStatus::Rejected,
    }
}

/// Normalize one invoice, deriving its settlement status from the
/// payments recorded against it.
pub fn normalize_invoice(
    invoice: &Invoice,
    payments: &[Payment],
    today: NaiveDate,
) -> Result<NormalizedEntry, EngineError> {
    if invoice.gross_amount < Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "invoice {} has negative gross amount {}",
            invoice.invoice_id, invoice.gross_amount
        )));
    }
    let pct = if invoice.tds_applicable {
        match invoice.tds_percentage {
            Some(p) => {
                validate_percentage(p)?;
                Some(p)
            }
            None => {
                return Err(EngineError::InvalidInput(format!(
                    "invoice {} flagged for withholding but has no percentage",
                    invoice.invoice_id
                )));
            }
        }
    } else {
        None
    };

    let own_payments: Vec<&Payment> = payments
        .iter()
        .filter(|p| p.invoice_id == invoice.invoice_id)
        .collect();
    let amount_paid: Decimal = own_payments.iter().map(|p| p.amount).sum();
    let payable = withhold(invoice.gross_amount, pct, invoice.round_up_tds).payable;

    // Hold and approval statuses are authoritative; everything else is
    // derived from settlement so the stored status can't go stale.
    let status = match invoice.status {
        InvoiceStatus::PendingApproval => EntryStatus::PendingApproval,
        InvoiceStatus::OnHold => EntryStatus::OnHold,
        InvoiceStatus::Rejected => EntryStatus::Rejected,
        _ => {
            if amount_paid >= payable {
                EntryStatus::Paid
            } else if invoice.due_date.is_some_and(|due| due < today) {
                EntryStatus::Overdue
            } else if amount_paid > Decimal::ZERO {
                EntryStatus::Partial
            } else {
                EntryStatus::Unpaid
            }
        }
    };

    let payment_method_id = own_payments
        .iter()
        .max_by_key(|p| (p.payment_date, p.created_utc))
        .map(|p| p.payment_method_id);

    Ok(NormalizedEntry {
        id: invoice.invoice_id,
        date: invoice.issue_date,
        gross_amount: invoice.gross_amount,
        status,
        payment_method_id,
        profile_id: invoice.profile_id,
        vendor_id: Some(invoice.vendor_id),
        vendor_name: invoice.vendor_name.clone(),
        reference: invoice.invoice_number.clone(),
        description: invoice.description.clone(),
        detail: EntryDetail::Invoice {
            tds_applicable: invoice.tds_applicable,
            tds_percentage: pct,
            round_up_tds: invoice.round_up_tds,
            amount_paid,
            due_date: invoice.due_date,
        },
    })
}

/// Normalize one payment. The parent invoice supplies vendor and
/// profile; a payment against an unknown invoice still normalizes with
/// an empty vendor so the feed can show it.
pub fn normalize_payment(
    payment: &Payment,
    invoice: Option<&Invoice>,
) -> Result<NormalizedEntry, EngineError> {
    if payment.amount < Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "payment {} has negative amount {}",
            payment.payment_id, payment.amount
        )));
    }

    Ok(NormalizedEntry {
        id: payment.payment_id,
        date: payment.payment_date,
        gross_amount: payment.amount,
        status: EntryStatus::Paid,
        payment_method_id: Some(payment.payment_method_id),
        profile_id: invoice.and_then(|i| i.profile_id),
        vendor_id: invoice.map(|i| i.vendor_id),
        vendor_name: invoice.map(|i| i.vendor_name.clone()).unwrap_or_default(),
        reference: payment.transaction_ref.clone(),
        description: None,
        detail: EntryDetail::Payment {
            invoice_id: payment.invoice_id,
            tds_applied: payment.tds_applied,
            round_up_tds: payment.round_up_tds,
        },
    })
}

/// Normalize one credit note, negating amount and reversal on the way in.
pub fn normalize_credit_note(
    note: &CreditNote,
    invoice: Option<&Invoice>,
) -> Result<NormalizedEntry, EngineError> {
    if note.amount < Decimal::ZERO || note.tds_reversal < Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "credit note {} has negative stored amounts",
            note.credit_note_id
        )));
    }
    if note.tds_reversal > note.amount {
        return Err(EngineError::InvalidInput(format!(
            "credit note {} reverses more withholding than its amount",
            note.credit_note_id
        )));
    }

    Ok(NormalizedEntry {
        id: note.credit_note_id,
        date: note.note_date,
        gross_amount: -note.amount,
        status: approval_to_entry_status(note.status),
        payment_method_id: None,
        profile_id: invoice.and_then(|i| i.profile_id),
        vendor_id: invoice.map(|i| i.vendor_id),
        vendor_name: invoice.map(|i| i.vendor_name.clone()).unwrap_or_default(),
        reference: invoice.and_then(|i| i.invoice_number.clone()),
        description: note.reason.clone(),
        detail: EntryDetail::CreditNote {
            invoice_id: note.invoice_id,
            tds_reversal: -note.tds_reversal,
        },
    })
}

/// Normalize one advance payment.
pub fn normalize_advance(
    advance: &AdvancePayment,
    invoice: Option<&Invoice>,
) -> Result<NormalizedEntry, EngineError> {
    if advance.amount < Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "advance {} has negative amount {}",
            advance.advance_id, advance.amount
        )));
    }

    Ok(NormalizedEntry {
        id: advance.advance_id,
        date: advance.advance_date,
        gross_amount: advance.amount,
        status: approval_to_entry_status(advance.status),
        payment_method_id: Some(advance.payment_method_id),
        profile_id: invoice.and_then(|i| i.profile_id),
        vendor_id: invoice.map(|i| i.vendor_id),
        vendor_name: invoice.map(|i| i.vendor_name.clone()).unwrap_or_default(),
        reference: invoice.and_then(|i| i.invoice_number.clone()),
        description: None,
        detail: EntryDetail::Advance {
            invoice_id: advance.invoice_id,
        },
    })
}

/// Normalize a whole working set, collecting per-record failures.
pub fn normalize_all(docs: &SourceDocuments, today: NaiveDate) -> NormalizedStream {
    let by_id: HashMap<Uuid, &Invoice> =
        docs.invoices.iter().map(|i| (i.invoice_id, i)).collect();

    let mut stream = NormalizedStream::default();

    for invoice in &docs.invoices {
        match normalize_invoice(invoice, &docs.payments, today) {
            Ok(entry) => stream.entries.push(entry),
            Err(e) => stream.skipped.push(SkippedEntry {
                id: invoice.invoice_id,
                kind: crate::models::EntryKind::Invoice,
                reason: e.to_string(),
            }),
        }
    }
    for payment in &docs.payments {
        match normalize_payment(payment, by_id.get(&payment.invoice_id).copied()) {
            Ok(entry) => stream.entries.push(entry),
            Err(e) => stream.skipped.push(SkippedEntry {
                id: payment.payment_id,
                kind: crate::models::EntryKind::Payment,
                reason: e.to_string(),
            }),
        }
    }
    for note in &docs.credit_notes {
        match normalize_credit_note(note, by_id.get(&note.invoice_id).copied()) {
            Ok(entry) => stream.entries.push(entry),
            Err(e) => stream.skipped.push(SkippedEntry {
                id: note.credit_note_id,
                kind: crate::models::EntryKind::CreditNote,
                reason: e.to_string(),
            }),
        }
    }
    for advance in &docs.advances {
        let invoice = advance.invoice_id.and_then(|id| by_id.get(&id).copied());
        match normalize_advance(advance, invoice) {
            Ok(entry) => stream.entries.push(entry),
            Err(e) => stream.skipped.push(SkippedEntry {
                id: advance.advance_id,
                kind: crate::models::EntryKind::Advance,
                reason: e.to_string(),
            }),
        }
    }

    stream
}
