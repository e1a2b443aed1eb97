//! Recurrence detection and replication through the session surface.

use std::sync::Arc;

use chrono::NaiveDate;

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

fn rent(day: NaiveDate) -> EntryDraft {
    EntryDraft::new(day, "Rent", "housing", EntryKind::Expense, 1200.0)
}

#[test]
fn third_rent_in_a_third_month_triggers_the_prompt() {
    let mut session = open_session();
    let (_, suggested) = session.add_entry(rent(date(2026, 5, 5))).unwrap();
    assert!(!suggested, "first occurrence has no history");
    let (_, suggested) = session.add_entry(rent(date(2026, 6, 5))).unwrap();
    assert!(suggested, "second month establishes the pattern");
    let (_, suggested) = session.add_entry(rent(date(2026, 7, 5))).unwrap();
    assert!(suggested);
}

#[test]
fn one_off_description_is_not_suggested() {
    let mut session = open_session();
    let (_, suggested) = session
        .add_entry(EntryDraft::new(
            date(2026, 7, 5),
            "Concert tickets",
            "leisure",
            EntryKind::Expense,
            150.0,
        ))
        .unwrap();
    assert!(!suggested);
}

#[test]
fn normalized_matching_ignores_case_accents_and_punctuation() {
    let mut session = open_session();
    session
        .add_entry(EntryDraft::new(
            date(2026, 6, 5),
            "Alimentação - mercado",
            "food",
            EntryKind::Expense,
            230.0,
        ))
        .unwrap();
    let (_, suggested) = session
        .add_entry(EntryDraft::new(
            date(2026, 7, 5),
            "ALIMENTACAO mercado!!",
            "food",
            EntryKind::Expense,
            210.0,
        ))
        .unwrap();
    assert!(suggested);
}

#[test]
fn candidates_skip_months_that_already_have_the_entry() {
    let mut session = open_session();
    let (entry, _) = session.add_entry(rent(date(2026, 5, 5))).unwrap();
    session.add_entry(rent(date(2026, 7, 5))).unwrap();

    let candidates = session.recurrence_candidates(&entry);
    assert_eq!(candidates.len(), 6);
    let july: MonthKey = "2026-07".parse().unwrap();
    for candidate in &candidates {
        if candidate.month == july {
            assert!(candidate.already_exists);
        } else {
            assert!(!candidate.already_exists);
        }
    }
}

#[test]
fn apply_recurrence_creates_only_missing_months() {
    let mut session = open_session();
    let (entry, _) = session.add_entry(rent(date(2026, 5, 5))).unwrap();
    session.add_entry(rent(date(2026, 7, 5))).unwrap();

    let candidates = session.recurrence_candidates(&entry);
    let selectable: Vec<_> = candidates
        .iter()
        .filter(|c| !c.already_exists)
        .cloned()
        .collect();
    let created = session.apply_recurrence(&entry, &candidates).unwrap();
    assert_eq!(created, selectable.len());

    // Every selected month now holds exactly one matching entry.
    for candidate in &selectable {
        let count = session
            .entries()
            .iter()
            .filter(|e| e.description == "Rent" && MonthKey::from_date(e.date) == candidate.month)
            .count();
        assert_eq!(count, 1);
    }
}

#[test]
fn reapplying_a_selection_is_a_noop() {
    let mut session = open_session();
    let (entry, _) = session.add_entry(rent(date(2026, 5, 5))).unwrap();
    let candidates = session.recurrence_candidates(&entry);
    let first = session.apply_recurrence(&entry, &candidates).unwrap();
    assert!(first > 0);
    let second = session.apply_recurrence(&entry, &candidates).unwrap();
    assert_eq!(second, 0);
}

#[test]
fn clamped_day_lands_on_month_end() {
    let mut session = open_session();
    let (entry, _) = session
        .add_entry(EntryDraft::new(
            date(2026, 1, 31),
            "Subscription",
            "services",
            EntryKind::Expense,
            30.0,
        ))
        .unwrap();
    let candidates = session.recurrence_candidates(&entry);
    // February 2026 has 28 days.
    assert_eq!(candidates[0].date, date(2026, 2, 28));
    assert_eq!(candidates[1].date, date(2026, 3, 31));
}
