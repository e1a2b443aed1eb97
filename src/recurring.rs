//! Recurring-entry detection and replication.
//!
//! Entries are matched by normalized description and kind; a description
//! that reappears in a different month is treated as a recurring pattern
//! worth offering to replicate into future months.

use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

use crate::errors::Result;
use crate::ledger::{Entry, LedgerStore};
use crate::month::MonthKey;

/// How many future months a recurrence prompt offers by default.
pub const DEFAULT_HORIZON: u32 = 6;

/// A future month a detected recurring entry could be replicated into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateMonth {
    pub month: MonthKey,
    pub date: chrono::NaiveDate,
    pub label: String,
    /// A matching entry already sits in this month; not selectable.
    pub already_exists: bool,
}

/// Lowercases, strips Latin diacritics, and collapses every run of
/// non-alphanumeric characters into a single space.
pub fn normalize_description(value: &str) -> String {
    let mut normalized = String::with_capacity(value.len());
    let mut pending_space = false;
    for ch in value.chars() {
        let folded = fold_diacritic(ch);
        for ch in folded.to_lowercase() {
            if ch.is_ascii_alphanumeric() {
                if pending_space && !normalized.is_empty() {
                    normalized.push(' ');
                }
                pending_space = false;
                normalized.push(ch);
            } else {
                pending_space = true;
            }
        }
    }
    normalized
}

/// Maps accented Latin letters onto their base letter; other characters
/// pass through unchanged.
fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

/// Whether a recurrence prompt should be surfaced for `entry`: at least one
/// other same-kind entry shares its normalized description in a different
/// month, and at least one future candidate month is still free.
pub fn suggest_recurrence(entry: &Entry, all_entries: &[Entry]) -> bool {
    let desc_key = normalize_description(&entry.description);
    if desc_key.is_empty() {
        return false;
    }
    let entry_month = MonthKey::from_date(entry.date);

    let mut matches = 0usize;
    let mut matches_other_months = 0usize;
    for other in all_entries {
        if other.id == entry.id || other.kind != entry.kind || other.description.is_empty() {
            continue;
        }
        if normalize_description(&other.description) != desc_key {
            continue;
        }
        matches += 1;
        if MonthKey::from_date(other.date) != entry_month {
            matches_other_months += 1;
        }
    }

    if matches == 0 || matches_other_months == 0 {
        return false;
    }

    let candidates = collect_candidate_months(entry, all_entries, DEFAULT_HORIZON);
    candidates.iter().any(|candidate| !candidate.already_exists)
}

/// The next `horizon` months after `entry`'s month, each holding the source
/// day-of-month clamped to the month's length. Months that already contain a
/// matching entry are flagged so they are excluded from selectable defaults.
pub fn collect_candidate_months(
    entry: &Entry,
    all_entries: &[Entry],
    horizon: u32,
) -> Vec<CandidateMonth> {
    let desc_key = normalize_description(&entry.description);
    if desc_key.is_empty() {
        return Vec::new();
    }
    let base_month = MonthKey::from_date(entry.date);
    let base_day = entry.date.day();

    (1..=horizon)
        .map(|offset| {
            let month = base_month.advance(offset);
            let date = month.day_clamped(base_day);
            let already_exists = all_entries.iter().any(|other| {
                other.kind == entry.kind
                    && !other.description.is_empty()
                    && normalize_description(&other.description) == desc_key
                    && MonthKey::from_date(other.date) == month
            });
            CandidateMonth {
                month,
                date,
                label: month.label(),
                already_exists,
            }
        })
        .collect()
}

/// Clones `entry` into each selected month that still has no matching entry.
/// Returns how many entries were created; zero is a no-op, not an error.
pub fn apply_recurrence(
    ledger: &mut LedgerStore,
    entry: &Entry,
    selected: &[CandidateMonth],
) -> Result<usize> {
    let desc_key = normalize_description(&entry.description);
    let mut created = 0usize;

    for candidate in selected {
        // Re-check against the live list so stale selections never duplicate.
        let already_exists = ledger.entries().iter().any(|other| {
            other.kind == entry.kind
                && !other.description.is_empty()
                && normalize_description(&other.description) == desc_key
                && MonthKey::from_date(other.date) == candidate.month
        });
        if already_exists {
            continue;
        }
        let mut clone = entry.clone();
        clone.id = uuid::Uuid::new_v4();
        clone.date = candidate.date;
        ledger.insert_front(clone);
        created += 1;
    }

    if created > 0 {
        ledger.save()?;
        debug!(created, "replicated recurring entry");
    }
    Ok(created)
}
