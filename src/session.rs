//! Session context: one object owning the ledger, settings, and alert
//! memory for the lifetime of a user's visit, replacing ambient globals.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::analytics::{
    build_snapshots, daily_average, daily_spend, emit_alerts, forecast, generate_insights,
    rank_categories, trend_series, Alert, AlertMemory, DailyAverage, DailySpend, Forecast,
    Insight, MonthlySnapshot, TrendPoint,
};
use crate::errors::{LedgerError, Result};
use crate::ledger::{Entry, EntryDraft, EntryPatch, LedgerStore};
use crate::month::MonthKey;
use crate::recurring::{
    apply_recurrence, collect_candidate_months, suggest_recurrence, CandidateMonth,
    DEFAULT_HORIZON,
};
use crate::settings::Settings;
use crate::store::{keys, KeyValueStore};

/// UI color scheme preference, persisted for the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

/// Everything the rendering collaborator needs to display one month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthOverview {
    pub month: MonthKey,
    pub snapshot: MonthlySnapshot,
    pub average: DailyAverage,
    pub forecast: Forecast,
    pub categories: Vec<(String, f64)>,
    pub trend: Vec<TrendPoint>,
    pub insights: Vec<Insight>,
    pub daily: DailySpend,
    /// Alerts newly fired by this refresh; previously fired conditions are
    /// suppressed for the rest of the session.
    pub alerts: Vec<Alert>,
}

/// Owns all mutable state for one user visit. A session is created when the
/// user arrives, used for every operation, and discarded at the end; nothing
/// outlives it except the persisted slots.
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    ledger: LedgerStore,
    settings: Settings,
    alerts: AlertMemory,
    today: NaiveDate,
}

impl Session {
    /// Opens a session against `store`, loading (or seeding) the ledger and
    /// settings. `today` anchors every current-month computation.
    pub fn open(store: Arc<dyn KeyValueStore>, today: NaiveDate) -> Result<Self> {
        let ledger = LedgerStore::open(store.clone(), today)?;
        let settings = Settings::load(store.as_ref())?;
        debug!(entries = ledger.len(), "session opened");
        Ok(Self {
            store,
            ledger,
            settings,
            alerts: AlertMemory::new(),
            today,
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn entries(&self) -> &[Entry] {
        self.ledger.entries()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Adds an entry and reports whether a recurrence prompt should be
    /// surfaced for it.
    pub fn add_entry(&mut self, draft: EntryDraft) -> Result<(Entry, bool)> {
        let entry = self.ledger.add(draft)?;
        let suggested = suggest_recurrence(&entry, self.ledger.entries());
        Ok((entry, suggested))
    }

    pub fn update_entry(&mut self, id: uuid::Uuid, patch: EntryPatch) -> Result<Option<Entry>> {
        self.ledger.update(id, patch)
    }

    pub fn remove_entry(&mut self, id: uuid::Uuid) -> Result<bool> {
        self.ledger.remove(id)
    }

    /// Future months the given entry could be replicated into.
    pub fn recurrence_candidates(&self, entry: &Entry) -> Vec<CandidateMonth> {
        collect_candidate_months(entry, self.ledger.entries(), DEFAULT_HORIZON)
    }

    /// Replicates `entry` into the selected months; returns how many new
    /// entries were created (zero when every month was already taken).
    pub fn apply_recurrence(&mut self, entry: &Entry, selected: &[CandidateMonth]) -> Result<usize> {
        apply_recurrence(&mut self.ledger, entry, selected)
    }

    pub fn set_budget(&mut self, budget: f64) -> Result<()> {
        self.settings.set_budget(budget)?;
        // An edited budget invalidates the old overrun notification, so the
        // alert for the current month may fire again under the new value.
        self.alerts.rearm_budget(MonthKey::from_date(self.today));
        self.settings.save(self.store.as_ref())
    }

    pub fn set_widget_collapsed(&mut self, collapsed: bool) -> Result<()> {
        self.settings.widget_collapsed = collapsed;
        self.settings.save(self.store.as_ref())
    }

    /// Recomputes every derived figure for `month` from the live entry list.
    pub fn refresh(&mut self, month: MonthKey) -> Result<MonthOverview> {
        let snapshots = build_snapshots(self.ledger.entries());
        let snapshot = snapshots.get(&month).cloned().unwrap_or_default();
        let budget = self.settings.monthly_budget;

        let average = daily_average(month, snapshot.expense, self.today);
        let forecast = forecast(month, snapshot.expense, &snapshots, &average);
        let categories = rank_categories(&snapshot);
        let trend = trend_series(&snapshots);
        let insights = generate_insights(month, &snapshots, &forecast, budget);
        let daily = daily_spend(month, self.ledger.entries(), &snapshot, budget, self.today);
        let alerts = emit_alerts(month, &snapshot, budget, &mut self.alerts);

        Ok(MonthOverview {
            month,
            snapshot,
            average,
            forecast,
            categories,
            trend,
            insights,
            daily,
            alerts,
        })
    }

    /// Whether a user is currently active. The core gates on nothing beyond
    /// this; identity is cosmetic.
    pub fn is_active(&self) -> Result<bool> {
        Ok(self.current_user()?.is_some())
    }

    pub fn current_user(&self) -> Result<Option<String>> {
        self.store.get(keys::CURRENT_USER)
    }

    /// Login stub: any non-empty username is accepted and remembered. There
    /// is deliberately no credential check.
    pub fn login(&mut self, username: &str) -> Result<String> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LedgerError::Storage("username must not be empty".into()));
        }
        self.store.set(keys::CURRENT_USER, username)?;
        Ok(username.to_string())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.store.remove(keys::CURRENT_USER)
    }

    pub fn theme(&self) -> Result<Theme> {
        let raw = self.store.get(keys::THEME)?;
        Ok(raw
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default())
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(keys::THEME, theme.as_str())
    }
}
