use chrono::NaiveDate;

use super::{IndexSeries, MoneyAmount, MoneyAmountSeries, YearMonth};
use crate::{
    currency::CurrencyCode,
    errors::{LedgerError, Result},
};

/// Converts amounts between a source and a target currency month by month.
pub trait ForeignExchange {
    fn source(&self) -> &CurrencyCode;

    fn target(&self) -> &CurrencyCode;

    fn from(&self) -> Option<YearMonth>;

    fn to(&self) -> Option<YearMonth>;

    fn exchange(
        &self,
        amount: &MoneyAmount,
        currency: &CurrencyCode,
        ym: YearMonth,
    ) -> Result<MoneyAmount>;

    fn exchange_on(
        &self,
        amount: &MoneyAmount,
        currency: &CurrencyCode,
        date: NaiveDate,
    ) -> Result<MoneyAmount> {
        self.exchange(amount, currency, YearMonth::from_date(date))
    }

    /// Converts every month of `series` from the first month with a known rate.
    fn exchange_series(
        &self,
        series: &MoneyAmountSeries,
        currency: &CurrencyCode,
    ) -> Result<MoneyAmountSeries> {
        let mut answer = MoneyAmountSeries::new(currency.clone(), series.name.clone());
        let (Some(series_from), Some(end)) = (series.from(), series.to()) else {
            return Ok(answer);
        };
        let start = self.from().map_or(series_from, |from| from.max(series_from));
        if start > end {
            return Err(LedgerError::NoSeriesData(end));
        }
        for ym in start.iter_to(end) {
            answer.put_amount(ym, self.exchange(&series.amount(ym)?, currency, ym)?)?;
        }
        Ok(answer)
    }

    /// `amount` converted with the rate of every month this exchange covers.
    fn exchange_over_range(
        &self,
        amount: &MoneyAmount,
        currency: &CurrencyCode,
    ) -> Result<MoneyAmountSeries> {
        let mut answer = MoneyAmountSeries::new(currency.clone(), format!("{currency} series"));
        let (Some(start), Some(end)) = (self.from(), self.to()) else {
            return Ok(answer);
        };
        for ym in start.iter_to(end) {
            answer.put_amount(ym, self.exchange(amount, currency, ym)?)?;
        }
        Ok(answer)
    }
}

/// A single currency pair quoted as units of `target` per unit of `source`.
#[derive(Debug, Clone)]
pub struct SimpleForeignExchange {
    rates: IndexSeries,
    source: CurrencyCode,
    target: CurrencyCode,
}

impl SimpleForeignExchange {
    pub fn new(
        rates: IndexSeries,
        source: impl Into<CurrencyCode>,
        target: impl Into<CurrencyCode>,
    ) -> Self {
        Self {
            rates,
            source: source.into(),
            target: target.into(),
        }
    }
}

impl ForeignExchange for SimpleForeignExchange {
    fn source(&self) -> &CurrencyCode {
        &self.source
    }

    fn target(&self) -> &CurrencyCode {
        &self.target
    }

    fn from(&self) -> Option<YearMonth> {
        self.rates.from()
    }

    fn to(&self) -> Option<YearMonth> {
        self.rates.to()
    }

    fn exchange(
        &self,
        amount: &MoneyAmount,
        currency: &CurrencyCode,
        ym: YearMonth,
    ) -> Result<MoneyAmount> {
        if &amount.currency == currency {
            return Ok(amount.clone());
        }
        if currency == &self.target && amount.currency == self.source {
            return Ok(amount.exchange(currency, self.rates.index(ym)?));
        }
        if currency == &self.source && amount.currency == self.target {
            let rate = self.rates.index(ym)?;
            if rate == 0.0 {
                return Err(LedgerError::NoSeriesData(ym));
            }
            return Ok(amount.exchange(currency, 1.0 / rate));
        }
        Err(LedgerError::UnknownCurrency(currency.to_string()))
    }
}

/// Two exchanges chained through a shared currency, e.g. ARS to EUR via USD.
///
/// `first` converts into the intermediate currency and `second` out of it.
#[derive(Debug, Clone)]
pub struct CompoundForeignExchange<F, S> {
    first: F,
    second: S,
}

impl<F: ForeignExchange, S: ForeignExchange> CompoundForeignExchange<F, S> {
    pub fn new(first: F, second: S) -> Self {
        Self { first, second }
    }

    fn intermediate(&self, currency: &CurrencyCode) -> &CurrencyCode {
        if currency == self.first.target() {
            self.first.source()
        } else {
            self.first.target()
        }
    }
}

impl<F: ForeignExchange, S: ForeignExchange> ForeignExchange for CompoundForeignExchange<F, S> {
    fn source(&self) -> &CurrencyCode {
        self.first.source()
    }

    fn target(&self) -> &CurrencyCode {
        self.second.target()
    }

    /// Latest start of the two exchanges.
    fn from(&self) -> Option<YearMonth> {
        match (self.first.from(), self.second.from()) {
            (Some(first), Some(second)) => Some(first.max(second)),
            _ => None,
        }
    }

    /// Earliest end of the two exchanges.
    fn to(&self) -> Option<YearMonth> {
        match (self.first.to(), self.second.to()) {
            (Some(first), Some(second)) => Some(first.min(second)),
            _ => None,
        }
    }

    fn exchange(
        &self,
        amount: &MoneyAmount,
        currency: &CurrencyCode,
        ym: YearMonth,
    ) -> Result<MoneyAmount> {
        if &amount.currency == currency {
            return Ok(amount.clone());
        }
        let intermediate = self.intermediate(&amount.currency).clone();
        let halfway = self.first.exchange(amount, &intermediate, ym)?;
        self.second.exchange(&halfway, currency, ym)
    }
}
