use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Rejections raised before an entry or setting is persisted. The caller
/// surfaces these synchronously; nothing is written when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("`{0}` is not a valid calendar day")]
    InvalidDate(String),
    #[error("a category must be selected")]
    MissingCategory,
    #[error("amount must be a positive finite number, got {0}")]
    InvalidAmount(f64),
    #[error("budget must be a non-negative finite number, got {0}")]
    InvalidBudget(f64),
}
