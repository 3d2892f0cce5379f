use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};

/// A dated point movement: positive amounts are credits, negative amounts debits.
///
/// The validity window is half-open: a movement counts towards the balance
/// from `from` (inclusive) until `to` (exclusive).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "MovementRecord")]
pub struct Movement {
    pub id: Uuid,
    amount: i64,
    from: NaiveDate,
    to: NaiveDate,
}

/// Stored form of a movement, checked before it becomes a `Movement`.
#[derive(Deserialize)]
struct MovementRecord {
    id: Uuid,
    amount: i64,
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<MovementRecord> for Movement {
    type Error = LedgerError;

    fn try_from(record: MovementRecord) -> Result<Self> {
        if record.amount == 0 {
            return Err(LedgerError::InvalidAmount(0));
        }
        let mut movement = Self::new(record.from, record.to, record.amount)?;
        movement.id = record.id;
        Ok(movement)
    }
}

impl Movement {
    pub fn new(from: NaiveDate, to: NaiveDate, amount: i64) -> Result<Self> {
        if from >= to {
            return Err(LedgerError::InvalidWindow { from, to });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            from,
            to,
        })
    }

    pub fn credit(from: NaiveDate, to: NaiveDate, points: i64) -> Result<Self> {
        if points <= 0 {
            return Err(LedgerError::InvalidAmount(points));
        }
        Self::new(from, to, points)
    }

    pub fn debit(from: NaiveDate, to: NaiveDate, points: i64) -> Result<Self> {
        if points <= 0 {
            return Err(LedgerError::InvalidAmount(points));
        }
        Self::new(from, to, -points)
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn is_credit(&self) -> bool {
        self.amount > 0
    }

    pub fn is_debit(&self) -> bool {
        !self.is_credit()
    }

    pub fn is_current(&self, moment: NaiveDate) -> bool {
        self.from <= moment && moment < self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_empty_window() {
        let err = Movement::new(date(2001, 1, 1), date(2001, 1, 1), 5).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidWindow { .. }));
    }

    #[test]
    fn window_excludes_end_date() {
        let movement = Movement::credit(date(2001, 1, 1), date(2001, 6, 30), 25).unwrap();
        assert!(movement.is_current(date(2001, 1, 1)));
        assert!(movement.is_current(date(2001, 6, 29)));
        assert!(!movement.is_current(date(2001, 6, 30)));
        assert!(!movement.is_current(date(2000, 12, 31)));
    }

    #[test]
    fn debit_is_stored_negative() {
        let movement = Movement::debit(date(2001, 4, 3), date(2001, 6, 30), 25).unwrap();
        assert_eq!(movement.amount(), -25);
        assert!(movement.is_debit());
    }

    #[test]
    fn stored_movements_are_validated() {
        let id = Uuid::new_v4();
        let valid = format!(r#"{{"id":"{id}","amount":-5,"from":"2001-04-03","to":"2001-06-30"}}"#);
        let movement: Movement = serde_json::from_str(&valid).unwrap();
        assert_eq!(movement.id, id);
        assert!(movement.is_debit());

        let reversed = format!(r#"{{"id":"{id}","amount":5,"from":"2001-06-30","to":"2001-04-03"}}"#);
        let err = serde_json::from_str::<Movement>(&reversed).unwrap_err();
        assert!(err.to_string().contains("Invalid validity window"));

        let empty = format!(r#"{{"id":"{id}","amount":0,"from":"2001-04-03","to":"2001-06-30"}}"#);
        assert!(serde_json::from_str::<Movement>(&empty).is_err());
    }

    #[test]
    fn credit_requires_positive_points() {
        assert!(matches!(
            Movement::credit(date(2001, 1, 1), date(2001, 2, 1), 0),
            Err(LedgerError::InvalidAmount(0))
        ));
    }
}
