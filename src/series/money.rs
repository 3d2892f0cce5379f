use serde::{Deserialize, Serialize};

use crate::{
    currency::CurrencyCode,
    errors::{LedgerError, Result},
};

/// An amount of money in a given currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyAmount {
    pub amount: f64,
    pub currency: CurrencyCode,
}

impl MoneyAmount {
    pub fn new(amount: f64, currency: impl Into<CurrencyCode>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    pub fn zero(currency: impl Into<CurrencyCode>) -> Self {
        Self::new(0.0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0.0
    }

    /// Rescales by `factor / divisor`, as when moving between two index values.
    pub fn adjust(&self, divisor: f64, factor: f64) -> Self {
        if self.is_zero() || divisor == factor {
            return self.clone();
        }
        Self::new(self.amount * factor / divisor, self.currency.clone())
    }

    pub fn exchange(&self, currency: &CurrencyCode, rate: f64) -> Self {
        if self.is_zero() {
            return Self::zero(currency.clone());
        }
        Self::new(self.amount * rate, currency.clone())
    }

    pub fn assert_currency(&self, currency: &CurrencyCode) -> Result<()> {
        if &self.currency != currency {
            return Err(LedgerError::CurrencyMismatch {
                expected: currency.to_string(),
                found: self.currency.to_string(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &MoneyAmount) -> Result<Self> {
        other.assert_currency(&self.currency)?;
        Ok(Self::new(self.amount + other.amount, self.currency.clone()))
    }

    pub fn subtract(&self, other: &MoneyAmount) -> Result<Self> {
        other.assert_currency(&self.currency)?;
        Ok(Self::new(self.amount - other.amount, self.currency.clone()))
    }

    pub fn max(&self, other: &MoneyAmount) -> Self {
        if self.amount >= other.amount {
            self.clone()
        } else {
            other.clone()
        }
    }

    pub fn min(&self, other: &MoneyAmount) -> Self {
        if self.amount >= other.amount {
            other.clone()
        } else {
            self.clone()
        }
    }
}
