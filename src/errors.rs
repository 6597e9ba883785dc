use thiserror::Error;

/// Error type that captures persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Reasons a mutation was rejected. A rejected call never touches the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("item name must not be empty")]
    EmptyItem,
    #[error("quantity is not a number")]
    NotANumber,
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
