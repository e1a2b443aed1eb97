use std::collections::HashSet;

use serde::Serialize;

use crate::month::MonthKey;

use super::engine::fmt_amount;
use super::snapshot::MonthlySnapshot;

/// Share of the month's expenses a single category must reach to alert.
pub const CATEGORY_SHARE_THRESHOLD: f64 = 0.6;

/// One-shot notification handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub tag: String,
    pub title: String,
    pub detail: String,
}

/// Remembers which alert conditions already fired this session so the same
/// condition never notifies twice. Session-lifetime only, never persisted.
#[derive(Debug, Default)]
pub struct AlertMemory {
    fired: HashSet<String>,
}

impl AlertMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as fired; returns false if it already was.
    fn mark(&mut self, key: String) -> bool {
        self.fired.insert(key)
    }

    /// Forgets the budget alert for `month` so it can fire again. Called
    /// when the configured budget changes, since the old notification no
    /// longer reflects the new threshold.
    pub fn rearm_budget(&mut self, month: MonthKey) {
        self.fired.remove(&format!("budget:{}", month));
    }

    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

/// Threshold alerts for one month: a category dominating the month's
/// expenses, and total expense over the configured budget. Each condition
/// fires at most once per session, keyed by kind, month, and category.
pub fn emit_alerts(
    month: MonthKey,
    snapshot: &MonthlySnapshot,
    budget: f64,
    memory: &mut AlertMemory,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if snapshot.expense > 0.0 {
        for (category, amount) in &snapshot.categories {
            if *amount <= 0.0 {
                continue;
            }
            let share = amount / snapshot.expense;
            if share < CATEGORY_SHARE_THRESHOLD {
                continue;
            }
            if !memory.mark(format!("cat:{}:{}", month, category)) {
                continue;
            }
            let pct = (share * 100.0).round();
            alerts.push(Alert {
                tag: "category".into(),
                title: format!("Category {} dominates spending", category),
                detail: format!(
                    "Category {} accounts for {}% of this month's expenses.",
                    category, pct
                ),
            });
        }
    }

    if budget > 0.0 && snapshot.expense > budget && memory.mark(format!("budget:{}", month)) {
        let diff = snapshot.expense - budget;
        alerts.push(Alert {
            tag: "budget".into(),
            title: "Spending budget exceeded".into(),
            detail: format!("Spending budget exceeded by {}.", fmt_amount(diff)),
        });
    }

    alerts
}
