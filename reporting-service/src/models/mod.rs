//! Domain models for reporting-service.

pub mod advance;
pub mod credit_note;
pub mod entry;
pub mod invoice;
pub mod ledger;
pub mod payment;
pub mod payment_method;
pub mod report;

pub use advance::AdvancePayment;
pub use credit_note::CreditNote;
pub use entry::{ApprovalStatus, EntryDetail, EntryKind, EntryStatus, NormalizedEntry};
pub use invoice::{Invoice, InvoiceQuery, InvoiceStatus};
pub use ledger::{Ledger, LedgerLine, LedgerSummary, SkippedEntry};
pub use payment::{Payment, PaymentQuery};
pub use payment_method::PaymentMethod;
pub use report::{
    ReportMode, ReportPeriod, ReportPeriodStatus, ReportRow, ReportSection, ReportSnapshot,
};
