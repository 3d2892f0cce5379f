//! FIFO point ledger: expiring credits and the debits redeemed against them.

pub mod account;
pub mod movement;

pub use account::{CreditAvailability, PointsAccount};
pub use movement::Movement;

use chrono::NaiveDate;

use crate::errors::{LedgerError, Result};

/// Day-first format used by the shell and the ledger fixtures.
pub const DATE_FORMAT: &str = "%d/%m/%Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses `dd/mm/yyyy`, falling back to ISO `yyyy-mm-dd`.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .map_err(|_| LedgerError::InvalidDate(trimmed.to_string()))
}
