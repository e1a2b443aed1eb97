use std::collections::BTreeMap;

use serde::Serialize;

use crate::ledger::{Entry, EntryKind};
use crate::month::MonthKey;

/// Bucket every expense without a category falls into.
pub const DEFAULT_CATEGORY: &str = "other";

/// Aggregated totals for one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlySnapshot {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    pub categories: BTreeMap<String, f64>,
}

pub type SnapshotMap = BTreeMap<MonthKey, MonthlySnapshot>;

/// Groups entries by calendar month in a single pass. Only expense entries
/// feed the per-category totals; the balance is kept consistent after every
/// accumulation step so the result is order-independent.
pub fn build_snapshots(entries: &[Entry]) -> SnapshotMap {
    let mut map = SnapshotMap::new();
    for entry in entries {
        let month = MonthKey::from_date(entry.date);
        let bucket = map.entry(month).or_default();
        match entry.kind {
            EntryKind::Income => bucket.income += entry.amount,
            EntryKind::Expense => {
                bucket.expense += entry.amount;
                let category = if entry.category.trim().is_empty() {
                    DEFAULT_CATEGORY.to_string()
                } else {
                    entry.category.clone()
                };
                *bucket.categories.entry(category).or_default() += entry.amount;
            }
        }
        bucket.balance = bucket.income - bucket.expense;
    }
    map
}
