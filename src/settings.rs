//! User-tunable settings persisted alongside the ledger.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{Result, ValidationError};
use crate::store::{keys, KeyValueStore};

/// Persisted user preferences. Unknown keys in the stored JSON are ignored;
/// missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Monthly expense ceiling used by alerts and insights; 0 disables it.
    #[serde(rename = "budget")]
    pub monthly_budget: f64,
    #[serde(rename = "widgetCollapsed")]
    pub widget_collapsed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monthly_budget: 0.0,
            widget_collapsed: false,
        }
    }
}

impl Settings {
    /// Reads settings from their slot, merging persisted values over the
    /// defaults. A missing or unreadable slot degrades to the defaults.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let Some(raw) = store.get(keys::SETTINGS)? else {
            return Ok(Self::default());
        };
        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                warn!(%err, "failed to parse settings, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(keys::SETTINGS, &json)
    }

    /// Validates and applies a new monthly budget.
    pub fn set_budget(&mut self, budget: f64) -> Result<()> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(ValidationError::InvalidBudget(budget).into());
        }
        self.monthly_budget = budget;
        Ok(())
    }
}
