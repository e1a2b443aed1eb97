use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// A single income or expense transaction record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub kind: EntryKind,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

/// What a caller submits to create an entry; the store assigns the id.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub kind: EntryKind,
    pub amount: f64,
}

impl EntryDraft {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        kind: EntryKind,
        amount: f64,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            category: category.into(),
            kind,
            amount,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.category, self.amount)
    }

    pub fn into_entry(self) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            date: self.date,
            description: self.description,
            category: self.category,
            kind: self.kind,
            amount: self.amount,
        }
    }
}

/// Field replacements for an in-place edit; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub kind: Option<EntryKind>,
    pub amount: Option<f64>,
}

impl EntryPatch {
    /// Applies the patch to a copy of `entry`, preserving its id.
    pub fn apply_to(&self, entry: &Entry) -> Entry {
        Entry {
            id: entry.id,
            date: self.date.unwrap_or(entry.date),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| entry.description.clone()),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| entry.category.clone()),
            kind: self.kind.unwrap_or(entry.kind),
            amount: self.amount.unwrap_or(entry.amount),
        }
    }
}

impl Entry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.category, self.amount)
    }
}

fn validate_fields(category: &str, amount: f64) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::InvalidAmount(amount));
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` day string as submitted by callers.
pub fn parse_entry_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}
