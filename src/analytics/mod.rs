//! Monthly aggregation and derived analytics.
//!
//! Everything here is a pure function of the entry list (plus an explicit
//! reference date), recomputed on every query; nothing is cached across
//! mutations.

pub mod alerts;
pub mod engine;
pub mod snapshot;

pub use alerts::{emit_alerts, Alert, AlertMemory};
pub use engine::{
    daily_average, daily_spend, forecast, generate_insights, rank_categories, trend_series,
    DailyAverage, DailySpend, Forecast, Insight, TrendPoint,
};
pub use snapshot::{build_snapshots, MonthlySnapshot, SnapshotMap};
