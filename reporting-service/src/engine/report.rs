//! Report grouper: partitions a period's entries into payment-method
//! sections with subtotals and a grand total.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{
    EntryDetail, NormalizedEntry, PaymentMethod, ReportMode, ReportRow, ReportSection,
    ReportSnapshot,
};

fn in_period(date: NaiveDate, month: i32, year: i32) -> bool {
    date.month() as i32 == month && date.year() == year
}

/// Amount a row contributes to its section subtotal.
fn row_amount(entry: &NormalizedEntry) -> Decimal {
    match entry.detail {
        EntryDetail::Invoice { .. } | EntryDetail::CreditNote { .. } => entry.payable_amount(),
        EntryDetail::Payment { .. } | EntryDetail::Advance { .. } => entry.paid_amount(),
    }
}

fn to_row(serial: u32, entry: &NormalizedEntry) -> ReportRow {
    ReportRow {
        serial,
        entry_id: entry.id,
        kind: entry.kind(),
        date: entry.date,
        vendor_name: entry.vendor_name.clone(),
        reference: entry.reference.clone(),
        description: entry.description.clone(),
        amount: row_amount(entry),
        withheld: entry.withheld_amount(),
        status: entry.status,
        status_label: entry.display_status(),
    }
}

/// Build the grouped monthly report.
///
/// `Live` mode selects entries by their own event date; `InvoiceDate`
/// mode selects invoices by issue date regardless of settlement timing.
/// Sections follow the configured payment-method order, with entries
/// lacking a resolved method collected into a final "Unpaid" section.
pub fn build_report(
    entries: &[NormalizedEntry],
    month: i32,
    year: i32,
    mode: ReportMode,
    methods: &[PaymentMethod],
    now: DateTime<Utc>,
) -> ReportSnapshot {
    let selected: Vec<&NormalizedEntry> = entries
        .iter()
        .filter(|e| match mode {
            ReportMode::Live => in_period(e.date, month, year),
            ReportMode::InvoiceDate => {
                matches!(e.detail, EntryDetail::Invoice { .. }) && in_period(e.date, month, year)
            }
        })
        .collect();

    let mut by_method: HashMap<Option<Uuid>, Vec<&NormalizedEntry>> = HashMap::new();
    for entry in selected {
        by_method.entry(entry.payment_method_id).or_default().push(entry);
    }

    let mut ordered_methods: Vec<&PaymentMethod> = methods.iter().collect();
    ordered_methods.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut sections = Vec::new();
    for method in ordered_methods {
        if let Some(group) = by_method.remove(&Some(method.payment_method_id)) {
            sections.push(make_section(
                Some(method.payment_method_id),
                method.name.clone(),
                group,
            ));
        }
    }
    // Entries whose method is not in the configured list still get a
    // section, keyed and named by the raw id, ahead of "Unpaid".
    let mut stray: Vec<(Uuid, Vec<&NormalizedEntry>)> = by_method
        .iter()
        .filter_map(|(k, v)| k.map(|id| (id, v.clone())))
        .collect();
    stray.sort_by_key(|(id, _)| *id);
    for (id, group) in stray {
        by_method.remove(&Some(id));
        sections.push(make_section(Some(id), id.to_string(), group));
    }
    if let Some(group) = by_method.remove(&None) {
        sections.push(make_section(None, "Unpaid".to_string(), group));
    }

    let grand_total = sections.iter().map(|s| s.subtotal).sum();

    ReportSnapshot {
        month,
        year,
        mode,
        sections,
        grand_total,
        generated_utc: now,
    }
}

fn make_section(
    payment_method_id: Option<Uuid>,
    name: String,
    mut group: Vec<&NormalizedEntry>,
) -> ReportSection {
    group.sort_by_key(|e| e.date);
    let rows: Vec<ReportRow> = group
        .iter()
        .enumerate()
        .map(|(i, e)| to_row(i as u32 + 1, e))
        .collect();
    let subtotal = rows.iter().map(|r| r.amount).sum();
    ReportSection {
        payment_method_id,
        name,
        rows,
        subtotal,
    }
}
