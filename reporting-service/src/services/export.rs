//! Export flattening: projects report snapshots and ledgers into flat
//! labeled rows for download. Pure data shaping; no I/O.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Ledger, ReportSnapshot};

/// One flat export row. Column meanings are fixed so a spreadsheet
/// import never has to guess.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub section: String,
    pub serial: u32,
    pub date: String,
    pub kind: String,
    pub vendor_name: String,
    pub reference: String,
    pub description: String,
    pub amount: Decimal,
    pub withheld: Decimal,
    pub status: String,
}

pub const EXPORT_HEADER: [&str; 10] = [
    "section",
    "serial",
    "date",
    "kind",
    "vendor",
    "reference",
    "description",
    "amount",
    "withheld",
    "status",
];

/// Flatten a report snapshot, preserving section order and per-section
/// serials. Subtotal and grand-total rows are appended with empty
/// document columns so they survive sorting-free imports.
pub fn report_rows(snapshot: &ReportSnapshot) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for section in &snapshot.sections {
        for row in &section.rows {
            rows.push(ExportRow {
                section: section.name.clone(),
                serial: row.serial,
                date: row.date.to_string(),
                kind: row.kind.as_str().to_string(),
                vendor_name: row.vendor_name.clone(),
                reference: row.reference.clone().unwrap_or_default(),
                description: row.description.clone().unwrap_or_default(),
                amount: row.amount,
                withheld: row.withheld,
                status: row.status_label.clone(),
            });
        }
        rows.push(total_row(&section.name, "subtotal", section.subtotal));
    }
    rows.push(total_row("", "grand_total", snapshot.grand_total));
    rows
}

/// Flatten a profile ledger in its chronological order. The amount
/// column carries the running balance movement, the withheld column the
/// entry's withholding.
pub fn ledger_rows(ledger: &Ledger) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = ledger
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| ExportRow {
            section: "ledger".to_string(),
            serial: (i + 1) as u32,
            date: line.entry.date.to_string(),
            kind: line.entry.kind().as_str().to_string(),
            vendor_name: line.entry.vendor_name.clone(),
            reference: line.entry.reference.clone().unwrap_or_default(),
            description: line.entry.description.clone().unwrap_or_default(),
            amount: line.payable_amount - line.paid_amount,
            withheld: line.entry.withheld_amount(),
            status: line.entry.display_status(),
        })
        .collect();
    rows.push(total_row(
        "ledger",
        "outstanding_balance",
        ledger.summary.outstanding_balance,
    ));
    rows
}

fn total_row(section: &str, label: &str, amount: Decimal) -> ExportRow {
    ExportRow {
        section: section.to_string(),
        serial: 0,
        date: String::new(),
        kind: label.to_string(),
        vendor_name: String::new(),
        reference: String::new(),
        description: String::new(),
        amount,
        withheld: Decimal::ZERO,
        status: String::new(),
    }
}

/// Render rows as CSV with a header line. Fields containing commas,
/// quotes, or newlines are quoted per RFC 4180.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    out.push_str(&EXPORT_HEADER.join(","));
    out.push('\n');
    for row in rows {
        let fields = [
            row.section.clone(),
            row.serial.to_string(),
            row.date.clone(),
            row.kind.clone(),
            row.vendor_name.clone(),
            row.reference.clone(),
            row.description.clone(),
            row.amount.to_string(),
            row.withheld.to_string(),
            row.status.clone(),
        ];
        let line: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
