//! Calendar month keys in `YYYY-MM` form, the unit every snapshot and
//! analytics query is addressed by.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ValidationError;

/// A single calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Month is validated on construction, so the first day always exists.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn days_in_month(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .map(|last| last.day())
            .unwrap_or(30)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The month `offset` steps after this one.
    pub fn advance(&self, offset: u32) -> Self {
        let total = self.year * 12 + (self.month as i32 - 1) + offset as i32;
        Self {
            year: total.div_euclid(12),
            month: total.rem_euclid(12) as u32 + 1,
        }
    }

    /// Clamps a day-of-month to this month's length and returns the date.
    pub fn day_clamped(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or_default()
    }

    /// Human label such as `January 2026`.
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidDate(value.to_string());
        let (year, month) = value.split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_month_keys() {
        let key: MonthKey = "2026-03".parse().expect("valid key");
        assert_eq!(key.year(), 2026);
        assert_eq!(key.month(), 3);
        assert_eq!(key.to_string(), "2026-03");
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!("2026".parse::<MonthKey>().is_err());
        assert!("2026-13".parse::<MonthKey>().is_err());
        assert!("abcd-01".parse::<MonthKey>().is_err());
    }

    #[test]
    fn knows_month_lengths() {
        let feb: MonthKey = "2024-02".parse().unwrap();
        assert_eq!(feb.days_in_month(), 29);
        let feb: MonthKey = "2025-02".parse().unwrap();
        assert_eq!(feb.days_in_month(), 28);
        let jan: MonthKey = "2025-01".parse().unwrap();
        assert_eq!(jan.days_in_month(), 31);
    }

    #[test]
    fn advances_across_year_boundaries() {
        let nov: MonthKey = "2025-11".parse().unwrap();
        assert_eq!(nov.advance(1).to_string(), "2025-12");
        assert_eq!(nov.advance(2).to_string(), "2026-01");
        assert_eq!(nov.advance(14).to_string(), "2027-01");
    }

    #[test]
    fn clamps_days_to_month_length() {
        let feb: MonthKey = "2025-02".parse().unwrap();
        assert_eq!(
            feb.day_clamped(31),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            feb.day_clamped(10),
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
        );
    }
}
