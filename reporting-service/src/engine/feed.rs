//! Unified feed query: conjunctive filtering plus stable single-key
//! sorting across the normalized entry stream.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::{EntryKind, EntryStatus, NormalizedEntry};

/// One status filter value; `PendingActions` is the composite grouping
/// {unpaid, partial, overdue, on_hold, pending_approval}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSelector {
    Is(EntryStatus),
    PendingActions,
}

impl StatusSelector {
    pub fn matches(&self, status: EntryStatus) -> bool {
        match self {
            StatusSelector::Is(s) => *s == status,
            StatusSelector::PendingActions => status.is_pending_action(),
        }
    }
}

impl FromStr for StatusSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_actions" => Ok(StatusSelector::PendingActions),
            "pending_approval" => Ok(StatusSelector::Is(EntryStatus::PendingApproval)),
            "unpaid" => Ok(StatusSelector::Is(EntryStatus::Unpaid)),
            "partial" => Ok(StatusSelector::Is(EntryStatus::Partial)),
            "paid" => Ok(StatusSelector::Is(EntryStatus::Paid)),
            "overdue" => Ok(StatusSelector::Is(EntryStatus::Overdue)),
            "on_hold" => Ok(StatusSelector::Is(EntryStatus::OnHold)),
            "rejected" => Ok(StatusSelector::Is(EntryStatus::Rejected)),
            "approved" => Ok(StatusSelector::Is(EntryStatus::Approved)),
            other => Err(format!("unknown status filter '{}'", other)),
        }
    }
}

/// Conjunction of filter predicates; `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
    pub kinds: Option<Vec<EntryKind>>,
    pub statuses: Option<Vec<StatusSelector>>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub profile_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub payment_method_id: Option<Uuid>,
    /// Case-insensitive match against reference number and description.
    pub text: Option<String>,
}

impl FeedFilter {
    fn accepts(&self, entry: &NormalizedEntry) -> bool {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&entry.kind()) {
                return false;
            }
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.iter().any(|s| s.matches(entry.status)) {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if entry.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if entry.date > to {
                return false;
            }
        }
        if let Some(profile) = self.profile_id {
            if entry.profile_id != Some(profile) {
                return false;
            }
        }
        if let Some(vendor) = self.vendor_id {
            if entry.vendor_id != Some(vendor) {
                return false;
            }
        }
        if let Some(method) = self.payment_method_id {
            if entry.payment_method_id != Some(method) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let in_reference = entry
                .reference
                .as_ref()
                .is_some_and(|r| r.to_lowercase().contains(&needle));
            let in_description = entry
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            let in_vendor = entry.vendor_name.to_lowercase().contains(&needle);
            if !(in_reference || in_description || in_vendor) {
                return false;
            }
        }
        true
    }
}

/// Sort key for the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Amount,
    Status,
    Balance,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "status" => Ok(SortKey::Status),
            "balance" => Ok(SortKey::Balance),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeedSort {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for FeedSort {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            descending: false,
        }
    }
}

fn compare(a: &NormalizedEntry, b: &NormalizedEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Amount => a.gross_amount.cmp(&b.gross_amount),
        SortKey::Status => a.status.sort_rank().cmp(&b.status.sort_rank()),
        SortKey::Balance => a.remaining_balance().cmp(&b.remaining_balance()),
    }
}

/// Apply the filter conjunction, then a stable single-key sort. Equal
/// keys keep their original relative order in both directions, so
/// repeated calls with identical inputs paginate identically.
pub fn query(
    entries: &[NormalizedEntry],
    filter: &FeedFilter,
    sort: &FeedSort,
) -> Vec<NormalizedEntry> {
    let mut selected: Vec<NormalizedEntry> = entries
        .iter()
        .filter(|e| filter.accepts(e))
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        let ord = compare(a, b, sort.key);
        if sort.descending { ord.reverse() } else { ord }
    });

    selected
}
