//! Analytics properties exercised through a full session.

use std::sync::Arc;

use chrono::NaiveDate;

use ledger_core::analytics::{build_snapshots, daily_average, forecast};
use ledger_core::ledger::{EntryDraft, EntryKind};
use ledger_core::month::MonthKey;
use ledger_core::session::Session;
use ledger_core::store::MemoryStore;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn open_session() -> Session {
    Session::open(Arc::new(MemoryStore::new()), today()).expect("open session")
}

fn spread_entries(session: &mut Session) {
    let data = [
        (date(2026, 5, 3), "Salary", "income", EntryKind::Income, 4000.0),
        (date(2026, 5, 10), "Rent", "housing", EntryKind::Expense, 1200.0),
        (date(2026, 5, 12), "Groceries", "food", EntryKind::Expense, 350.0),
        (date(2026, 6, 3), "Salary", "income", EntryKind::Income, 4000.0),
        (date(2026, 6, 10), "Rent", "housing", EntryKind::Expense, 1200.0),
        (date(2026, 6, 18), "Dining", "food", EntryKind::Expense, 420.0),
        (date(2026, 7, 3), "Salary", "income", EntryKind::Income, 4000.0),
        (date(2026, 7, 10), "Rent", "housing", EntryKind::Expense, 1250.0),
        (date(2026, 8, 2), "Groceries", "food", EntryKind::Expense, 280.0),
    ];
    for (day, description, category, kind, amount) in data {
        session
            .add_entry(EntryDraft::new(day, description, category, kind, amount))
            .expect("add entry");
    }
}

#[test]
fn every_month_satisfies_the_balance_invariant() {
    let mut session = open_session();
    spread_entries(&mut session);
    let snapshots = build_snapshots(session.entries());
    assert!(!snapshots.is_empty());
    for snapshot in snapshots.values() {
        assert_eq!(snapshot.balance, snapshot.income - snapshot.expense);
    }
}

#[test]
fn past_month_daily_average_is_total_over_days() {
    // June 2026 has 30 days and is fully elapsed from an August reference.
    let avg = daily_average("2026-06".parse().unwrap(), 300.0, today());
    assert_eq!(avg.value, 10.0);
}

#[test]
fn forecast_floor_holds_across_months() {
    let mut session = open_session();
    spread_entries(&mut session);
    let snapshots = build_snapshots(session.entries());
    for (month, snapshot) in &snapshots {
        let avg = daily_average(*month, snapshot.expense, today());
        let fc = forecast(*month, snapshot.expense, &snapshots, &avg);
        assert!(
            fc.value >= snapshot.expense,
            "forecast {} under spent {} for {}",
            fc.value,
            snapshot.expense,
            month
        );
    }
}

#[test]
fn overview_exposes_ranked_categories_and_trend() {
    let mut session = open_session();
    spread_entries(&mut session);
    let overview = session.refresh("2026-06".parse().unwrap()).unwrap();
    assert_eq!(overview.categories[0].0, "housing");
    assert!(overview.categories[0].1 >= overview.categories[1].1);
    assert!(overview.trend.len() <= 6);
    assert!(overview
        .trend
        .windows(2)
        .all(|pair| pair[0].month < pair[1].month));
}

#[test]
fn dominant_category_alert_fires_once_per_month_and_category() {
    let mut session = open_session();
    let month: MonthKey = "2026-03".parse().unwrap();
    session
        .add_entry(EntryDraft::new(
            date(2026, 3, 5),
            "Rent",
            "housing",
            EntryKind::Expense,
            1000.0,
        ))
        .unwrap();

    let first = session.refresh(month).unwrap();
    let category_alerts: Vec<_> = first.alerts.iter().filter(|a| a.tag == "category").collect();
    assert_eq!(category_alerts.len(), 1);
    assert!(category_alerts[0].detail.contains("100%"));

    let second = session.refresh(month).unwrap();
    assert!(second.alerts.iter().all(|a| a.tag != "category"));
}

#[test]
fn budget_driven_insights_appear_in_overview() {
    let mut session = open_session();
    session.set_budget(500.0).unwrap();
    session
        .add_entry(EntryDraft::new(
            date(2026, 4, 10),
            "Furniture",
            "home",
            EntryKind::Expense,
            800.0,
        ))
        .unwrap();
    let overview = session.refresh("2026-04".parse().unwrap()).unwrap();
    assert!(overview
        .insights
        .iter()
        .any(|insight| insight.title == "Budget exceeded"));
    assert!(overview
        .insights
        .iter()
        .any(|insight| insight.tag == "balance"));
}

#[test]
fn insight_order_is_stable() {
    let mut session = open_session();
    session.set_budget(100.0).unwrap();
    // Prior month gives the growth comparison a baseline.
    session
        .add_entry(EntryDraft::new(
            date(2026, 7, 5),
            "Dining",
            "food",
            EntryKind::Expense,
            100.0,
        ))
        .unwrap();
    session
        .add_entry(EntryDraft::new(
            date(2026, 8, 5),
            "Dining",
            "food",
            EntryKind::Expense,
            400.0,
        ))
        .unwrap();
    let overview = session.refresh("2026-08".parse().unwrap()).unwrap();
    let tags: Vec<&str> = overview
        .insights
        .iter()
        .map(|insight| insight.tag.as_str())
        .collect();
    let growth_pos = tags.iter().position(|t| *t == "growth").expect("growth");
    let budget_pos = tags.iter().position(|t| *t == "budget").expect("budget");
    let balance_pos = tags.iter().position(|t| *t == "balance").expect("balance");
    assert!(growth_pos < budget_pos);
    assert!(budget_pos < balance_pos);
}
