use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ForeignExchange, MoneyAmount, YearMonth};
use crate::{
    currency::CurrencyCode,
    errors::{LedgerError, Result},
};

/// What a series answers for months after its last data point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterpolationStrategy {
    #[default]
    NoInterpolation,
    LastValueInterpolation,
    ZeroValueInterpolation,
}

impl InterpolationStrategy {
    /// Value for `missing`, a month without data that follows `previous`.
    pub fn interpolate(&self, previous: &MoneyAmount, missing: YearMonth) -> Result<MoneyAmount> {
        match self {
            Self::NoInterpolation => Err(LedgerError::NoSeriesData(missing)),
            Self::LastValueInterpolation => Ok(previous.clone()),
            Self::ZeroValueInterpolation => Ok(MoneyAmount::zero(previous.currency.clone())),
        }
    }
}

/// A named monthly series of money amounts in a single currency.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyAmountSeries {
    pub name: String,
    currency: CurrencyCode,
    interpolation: InterpolationStrategy,
    values: BTreeMap<YearMonth, MoneyAmount>,
}

impl MoneyAmountSeries {
    pub fn new(currency: impl Into<CurrencyCode>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            currency: currency.into(),
            interpolation: InterpolationStrategy::default(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_interpolation(mut self, interpolation: InterpolationStrategy) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn from(&self) -> Option<YearMonth> {
        self.values.keys().next().copied()
    }

    pub fn to(&self) -> Option<YearMonth> {
        self.values.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn put_amount(&mut self, ym: YearMonth, amount: MoneyAmount) -> Result<()> {
        amount.assert_currency(&self.currency)?;
        self.values.insert(ym, amount);
        Ok(())
    }

    /// Inserts a value for every month missing between the first and last one.
    pub fn fill_gaps(&mut self) -> Result<()> {
        let (Some(start), Some(end)) = (self.from(), self.to()) else {
            return Ok(());
        };
        let mut previous = start;
        for ym in start.next().iter_to(end) {
            if !self.values.contains_key(&ym) {
                let last = self
                    .values
                    .get(&previous)
                    .ok_or(LedgerError::NoSeriesData(previous))?;
                let filled = self.interpolation.interpolate(last, ym)?;
                self.values.insert(ym, filled);
            }
            previous = ym;
        }
        Ok(())
    }

    pub fn has_value(&self, ym: YearMonth) -> bool {
        self.values.contains_key(&ym)
    }

    pub fn amount(&self, ym: YearMonth) -> Result<MoneyAmount> {
        if let Some(amount) = self.values.get(&ym) {
            return Ok(amount.clone());
        }
        match (self.interpolation, self.values.iter().next_back()) {
            (InterpolationStrategy::LastValueInterpolation, Some((last, amount))) if ym > *last => {
                Ok(amount.clone())
            }
            (InterpolationStrategy::ZeroValueInterpolation, Some((last, _))) if ym > *last => {
                Ok(MoneyAmount::zero(self.currency.clone()))
            }
            _ => Err(LedgerError::NoSeriesData(ym)),
        }
    }

    pub fn amount_or_zero(&self, ym: YearMonth) -> MoneyAmount {
        self.values
            .get(&ym)
            .cloned()
            .unwrap_or_else(|| MoneyAmount::zero(self.currency.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (YearMonth, &MoneyAmount)> {
        self.values.iter().map(|(ym, amount)| (*ym, amount))
    }

    pub fn iter_non_zero(&self) -> impl Iterator<Item = (YearMonth, &MoneyAmount)> {
        self.iter().filter(|(_, amount)| !amount.is_zero())
    }

    /// Applies `f` to every month, keeping name and currency.
    pub fn map<F>(&self, mut f: F) -> Result<Self>
    where
        F: FnMut(YearMonth, &MoneyAmount) -> Result<MoneyAmount>,
    {
        let mut answer = Self::new(self.currency.clone(), self.name.clone());
        for (ym, amount) in self.iter() {
            answer.put_amount(ym, f(ym, amount)?)?;
        }
        Ok(answer)
    }

    /// Month-by-month sum; months present in only one series are copied as is.
    pub fn add(&self, other: &MoneyAmountSeries) -> Result<Self> {
        if other.currency != self.currency {
            return Err(LedgerError::CurrencyMismatch {
                expected: self.currency.to_string(),
                found: other.currency.to_string(),
            });
        }
        let mut answer = self.clone();
        for (ym, amount) in other.iter() {
            let total = match self.values.get(&ym) {
                Some(existing) => existing.add(amount)?,
                None => amount.clone(),
            };
            answer.values.insert(ym, total);
        }
        Ok(answer)
    }

    pub fn exchange_into(
        &self,
        fx: &dyn ForeignExchange,
        currency: &CurrencyCode,
    ) -> Result<MoneyAmountSeries> {
        fx.exchange_series(self, currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn usd(amount: f64) -> MoneyAmount {
        MoneyAmount::new(amount, "USD")
    }

    #[test]
    fn rejects_foreign_currency() {
        let mut series = MoneyAmountSeries::new("USD", "savings");
        let err = series
            .put_amount(ym(2020, 1), MoneyAmount::new(1.0, "ARS"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::CurrencyMismatch { .. }));
    }

    #[test]
    fn interpolation_applies_only_after_last_month() {
        let mut series = MoneyAmountSeries::new("USD", "rent")
            .with_interpolation(InterpolationStrategy::LastValueInterpolation);
        series.put_amount(ym(2020, 1), usd(10.0)).unwrap();
        series.put_amount(ym(2020, 3), usd(30.0)).unwrap();

        assert_eq!(series.amount(ym(2020, 6)).unwrap(), usd(30.0));
        assert!(series.amount(ym(2020, 2)).is_err());
        assert!(series.amount(ym(2019, 12)).is_err());
        assert_eq!(series.amount_or_zero(ym(2020, 2)), usd(0.0));
    }

    #[test]
    fn add_merges_overlapping_months() {
        let mut a = MoneyAmountSeries::new("USD", "a");
        a.put_amount(ym(2020, 1), usd(1.0)).unwrap();
        a.put_amount(ym(2020, 2), usd(2.0)).unwrap();
        let mut b = MoneyAmountSeries::new("USD", "b");
        b.put_amount(ym(2020, 2), usd(10.0)).unwrap();
        b.put_amount(ym(2020, 3), usd(20.0)).unwrap();

        let total = a.add(&b).unwrap();
        let values: Vec<f64> = total.iter().map(|(_, m)| m.amount).collect();
        assert_eq!(values, vec![1.0, 12.0, 20.0]);
        assert_eq!(total.from(), Some(ym(2020, 1)));
        assert_eq!(total.to(), Some(ym(2020, 3)));
    }

    #[test]
    fn map_and_non_zero() {
        let mut series = MoneyAmountSeries::new("USD", "s");
        series.put_amount(ym(2020, 1), usd(0.0)).unwrap();
        series.put_amount(ym(2020, 2), usd(4.0)).unwrap();
        assert_eq!(series.iter_non_zero().count(), 1);

        let doubled = series.map(|_, m| Ok(usd(m.amount * 2.0))).unwrap();
        assert_eq!(doubled.amount(ym(2020, 2)).unwrap(), usd(8.0));
    }
}
