use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::ledger::{Entry, EntryKind};
use crate::month::MonthKey;

use super::snapshot::{MonthlySnapshot, SnapshotMap};

/// Weight of the current month's spending pace in the blended forecast.
pub const PACE_WEIGHT: f64 = 0.6;
/// Weight of the prior-months average in the blended forecast.
pub const HISTORY_WEIGHT: f64 = 0.4;
/// Floor applied to month progress before projecting pace, so a month that
/// just started does not explode the projection.
pub const MIN_PROGRESS: f64 = 0.1;
/// Progress past which the current month is treated as fully elapsed.
const PROGRESS_COMPLETE: f64 = 0.99;
/// How many preceding months feed the history average.
const HISTORY_MONTHS: usize = 3;
/// How many months the trend series covers.
const TREND_MONTHS: usize = 6;
/// Absolute category growth (currency units) that triggers the growth insight.
pub const GROWTH_DIFF_THRESHOLD: f64 = 100.0;
/// Fractional category growth that triggers the growth insight.
pub const GROWTH_PCT_THRESHOLD: f64 = 0.15;
/// Fraction of the budget the forecast must overshoot by to warn.
pub const FORECAST_RISK_MARGIN: f64 = 0.10;

/// Expense pace for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAverage {
    pub value: f64,
    pub days_elapsed: u32,
    pub days_in_month: u32,
    pub is_current: bool,
    pub progress: f64,
}

/// Projected end-of-month expense total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub value: f64,
    pub prior_months: Vec<MonthKey>,
    pub prior_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: MonthKey,
    pub income: f64,
    pub expense: f64,
}

/// Display-ready observation handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub tag: String,
    pub title: String,
    pub detail: String,
}

/// Spending recorded on the month's reference day, plus remaining headroom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySpend {
    pub reference_day: Option<NaiveDate>,
    pub spent: f64,
    pub remaining: f64,
    pub is_current: bool,
}

/// Average daily expense pace. For the current month only the elapsed days
/// count; past months spread the total over the full month. The divisor is
/// floored at one day.
pub fn daily_average(month: MonthKey, expense_total: f64, today: NaiveDate) -> DailyAverage {
    let days_in_month = month.days_in_month();
    let is_current = month.contains(today);
    let days_elapsed = if is_current {
        today.day().clamp(1, days_in_month)
    } else {
        days_in_month
    };
    let value = expense_total / days_elapsed.max(1) as f64;
    let progress = if days_in_month > 0 {
        days_elapsed as f64 / days_in_month as f64
    } else {
        1.0
    };
    DailyAverage {
        value,
        days_elapsed,
        days_in_month,
        is_current,
        progress,
    }
}

/// Projects the month's final expense total.
///
/// While the current month is still in progress the spent-so-far total is
/// projected by elapsed progress and blended with the average of up to three
/// preceding months; otherwise the history average stands alone. The result
/// never predicts less than what was already spent.
pub fn forecast(
    month: MonthKey,
    expense_total: f64,
    snapshots: &SnapshotMap,
    average: &DailyAverage,
) -> Forecast {
    let prior_months = preceding_months(month, snapshots, HISTORY_MONTHS);
    let prior_average = if prior_months.is_empty() {
        0.0
    } else {
        let sum: f64 = prior_months
            .iter()
            .map(|key| snapshots.get(key).map_or(0.0, |s| s.expense.max(0.0)))
            .sum();
        sum / prior_months.len() as f64
    };

    let mut value = expense_total;
    if average.is_current && average.progress < PROGRESS_COMPLETE {
        let pace_projection = if average.progress > 0.0 {
            expense_total / average.progress.max(MIN_PROGRESS)
        } else {
            expense_total
        };
        value = if prior_average > 0.0 {
            pace_projection * PACE_WEIGHT + prior_average * HISTORY_WEIGHT
        } else {
            pace_projection
        };
    } else if prior_average > 0.0 {
        value = prior_average;
    }

    Forecast {
        value: value.max(expense_total),
        prior_months,
        prior_average,
    }
}

/// Category totals sorted descending by amount. Ties keep the snapshot's
/// alphabetical insertion order.
pub fn rank_categories(snapshot: &MonthlySnapshot) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = snapshot
        .categories
        .iter()
        .map(|(category, amount)| (category.clone(), *amount))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// Income and expense for the last up to six recorded months, ascending.
pub fn trend_series(snapshots: &SnapshotMap) -> Vec<TrendPoint> {
    let skip = snapshots.len().saturating_sub(TREND_MONTHS);
    snapshots
        .iter()
        .skip(skip)
        .map(|(month, snapshot)| TrendPoint {
            month: *month,
            income: snapshot.income,
            expense: snapshot.expense,
        })
        .collect()
}

/// Ordered textual observations for one month. Each insight is optional;
/// the list may be empty.
pub fn generate_insights(
    month: MonthKey,
    snapshots: &SnapshotMap,
    forecast: &Forecast,
    budget: f64,
) -> Vec<Insight> {
    let mut output = Vec::new();
    let empty = MonthlySnapshot::default();
    let bucket = snapshots.get(&month).unwrap_or(&empty);

    if let Some(insight) = category_growth_insight(month, snapshots, bucket) {
        output.push(insight);
    }

    if budget > 0.0 {
        let diff = budget - bucket.expense;
        if diff >= 0.0 {
            output.push(Insight {
                tag: "budget".into(),
                title: "Budget on track".into(),
                detail: format!(
                    "You can still spend {} before reaching the {} budget.",
                    fmt_amount(diff),
                    fmt_amount(budget)
                ),
            });
        } else {
            output.push(Insight {
                tag: "budget".into(),
                title: "Budget exceeded".into(),
                detail: format!(
                    "The month exceeded the budget by {}. Review the heaviest expenses.",
                    fmt_amount(diff.abs())
                ),
            });
        }

        if forecast.value - budget > budget * FORECAST_RISK_MARGIN {
            output.push(Insight {
                tag: "forecast".into(),
                title: "Risk of exceeding budget".into(),
                detail: format!(
                    "The forecast points to {}, above the {} budget.",
                    fmt_amount(forecast.value),
                    fmt_amount(budget)
                ),
            });
        }
    }

    if bucket.balance < 0.0 {
        output.push(Insight {
            tag: "balance".into(),
            title: "Negative balance".into(),
            detail: format!(
                "The month's balance is negative by {}.",
                fmt_amount(bucket.balance.abs())
            ),
        });
    } else if bucket.balance > 0.0 {
        output.push(Insight {
            tag: "balance".into(),
            title: "Positive balance".into(),
            detail: format!(
                "You accumulated a balance of {} this month.",
                fmt_amount(bucket.balance)
            ),
        });
    }

    output
}

/// Expense total on the month's reference day: today when the month is
/// current, else the latest day with a recorded expense. Remaining headroom
/// is measured against the budget when one is set, else the month balance.
pub fn daily_spend(
    month: MonthKey,
    entries: &[Entry],
    snapshot: &MonthlySnapshot,
    budget: f64,
    today: NaiveDate,
) -> DailySpend {
    let is_current = month.contains(today);
    let reference_day = if is_current {
        Some(today)
    } else {
        entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Expense && month.contains(entry.date))
            .map(|entry| entry.date)
            .max()
    };

    let spent = reference_day.map_or(0.0, |day| {
        entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Expense && entry.date == day)
            .map(|entry| entry.amount)
            .sum()
    });

    let remaining = if budget > 0.0 {
        budget - snapshot.expense
    } else {
        snapshot.balance
    };

    DailySpend {
        reference_day,
        spent,
        remaining,
        is_current,
    }
}

struct CategoryGrowth {
    category: String,
    current: f64,
    previous: f64,
    diff: f64,
    pct: Option<f64>,
    score: f64,
}

fn category_growth_insight(
    month: MonthKey,
    snapshots: &SnapshotMap,
    bucket: &MonthlySnapshot,
) -> Option<Insight> {
    let previous_month = preceding_months(month, snapshots, 1).pop()?;
    let previous = snapshots.get(&previous_month)?;

    let mut top: Option<CategoryGrowth> = None;
    for (category, amount) in &bucket.categories {
        let prior = previous.categories.get(category).copied().unwrap_or(0.0);
        let diff = amount - prior;
        if diff <= 0.0 {
            continue;
        }
        let pct = (prior > 0.0).then(|| diff / prior);
        let score = pct.unwrap_or(diff / amount.max(1.0));
        if top.as_ref().map_or(true, |best| score > best.score) {
            top = Some(CategoryGrowth {
                category: category.clone(),
                current: *amount,
                previous: prior,
                diff,
                pct,
                score,
            });
        }
    }

    let top = top?;
    let emit = top.diff >= GROWTH_DIFF_THRESHOLD
        || top.pct.is_some_and(|pct| pct >= GROWTH_PCT_THRESHOLD);
    if !emit {
        return None;
    }
    let pct_text = match top.pct {
        Some(pct) => format!("{}%", (pct * 100.0).round()),
        None => "new spending".to_string(),
    };
    Some(Insight {
        tag: "growth".into(),
        title: format!("Rising category: {}", top.category),
        detail: format!(
            "Expenses in {} total {} against {} in {} ({}).",
            top.category,
            fmt_amount(top.current),
            fmt_amount(top.previous),
            previous_month.label(),
            pct_text
        ),
    })
}

/// Up to `limit` recorded months strictly before `month`, nearest last.
/// A month absent from the map has no history by definition.
fn preceding_months(month: MonthKey, snapshots: &SnapshotMap, limit: usize) -> Vec<MonthKey> {
    if !snapshots.contains_key(&month) {
        return Vec::new();
    }
    let before: Vec<MonthKey> = snapshots.keys().copied().filter(|key| *key < month).collect();
    let skip = before.len().saturating_sub(limit);
    before.into_iter().skip(skip).collect()
}

pub(crate) fn fmt_amount(value: f64) -> String {
    format!("{:.2}", value)
}
