use std::collections::BTreeMap;

use super::YearMonth;
use crate::errors::{LedgerError, Result};

/// Monthly index values such as a CPI or an exchange rate.
#[derive(Debug, Clone)]
pub struct IndexSeries {
    values: BTreeMap<YearMonth, f64>,
    constant: bool,
}

impl IndexSeries {
    pub fn new(values: BTreeMap<YearMonth, f64>) -> Self {
        Self {
            values,
            constant: false,
        }
    }

    /// A series that answers 1 for every month.
    pub fn constant() -> Self {
        Self {
            values: BTreeMap::new(),
            constant: true,
        }
    }

    pub fn put(&mut self, ym: YearMonth, value: f64) {
        self.values.insert(ym, value);
    }

    pub fn from(&self) -> Option<YearMonth> {
        if self.constant {
            return YearMonth::new(1, 1).ok();
        }
        self.values.keys().next().copied()
    }

    pub fn to(&self) -> Option<YearMonth> {
        if self.constant {
            return YearMonth::new(5000, 12).ok();
        }
        self.values.keys().next_back().copied()
    }

    /// Index at `ym`; months after the last known one reuse the last value.
    pub fn index(&self, ym: YearMonth) -> Result<f64> {
        if self.constant {
            return Ok(1.0);
        }
        let last = self.to().ok_or(LedgerError::NoSeriesData(ym))?;
        self.values
            .get(&ym.min(last))
            .copied()
            .ok_or(LedgerError::NoSeriesData(ym))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && !self.constant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn clamps_to_last_value() {
        let mut series = IndexSeries::new(BTreeMap::new());
        series.put(ym(2020, 1), 100.0);
        series.put(ym(2020, 2), 110.0);
        assert_eq!(series.index(ym(2020, 2)).unwrap(), 110.0);
        assert_eq!(series.index(ym(2021, 6)).unwrap(), 110.0);
        assert!(matches!(series.index(ym(2019, 12)), Err(LedgerError::NoSeriesData(_))));
    }

    #[test]
    fn constant_series_is_one() {
        let series = IndexSeries::constant();
        assert_eq!(series.index(ym(1990, 3)).unwrap(), 1.0);
        assert!(!series.is_empty());
    }

    #[test]
    fn empty_series_has_no_data() {
        let series = IndexSeries::new(BTreeMap::new());
        assert!(series.is_empty());
        assert!(series.index(ym(2020, 1)).is_err());
    }
}
