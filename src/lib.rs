#![doc(test(attr(deny(warnings))))]

//! Ledger Core provides the storage, aggregation, and analytics primitives
//! behind a single-user personal finance ledger: entry persistence with
//! corruption recovery, monthly snapshots, spending forecasts, insight and
//! alert generation, and recurring-entry detection.

pub mod analytics;
pub mod errors;
pub mod ledger;
pub mod month;
pub mod recurring;
pub mod session;
pub mod settings;
pub mod store;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        init_tracing();
        tracing::info!("Ledger Core tracing initialized.");
    });
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::from_default_env().add_directive("ledger_core=info".parse().unwrap());

    fmt().with_env_filter(filter).init();
}
