use chrono::NaiveDate;
use thiserror::Error;

use crate::series::YearMonth;

/// Error type that captures ledger, series and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid validity window: {from} is not before {to}")]
    InvalidWindow { from: NaiveDate, to: NaiveDate },
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),
    #[error("Can't use {requested} points, only {available} available")]
    InsufficientPoints { requested: i64, available: i64 },
    #[error("Redemption would leave the balance at {balance} on {date}")]
    WouldOverdraw { date: NaiveDate, balance: i64 },
    #[error("Inconsistent movements: {0}")]
    InconsistentMovements(String),
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: String, found: String },
    #[error("Invalid series: {0}")]
    InvalidSeries(String),
    #[error("No series data for {0}")]
    NoSeriesData(YearMonth),
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("Invalid date `{0}`")]
    InvalidDate(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
