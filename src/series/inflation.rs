use chrono::NaiveDate;
use tracing::debug;

use super::{IndexSeries, MoneyAmount, MoneyAmountSeries, YearMonth};
use crate::{currency::CurrencyCode, errors::Result};

/// Expresses money of one month in the purchasing power of another.
pub trait Inflation {
    fn currency(&self) -> &CurrencyCode;

    fn from(&self) -> Option<YearMonth>;

    fn to(&self) -> Option<YearMonth>;

    /// Nominal `amount` at `from` expressed in `to` values.
    fn adjust(&self, amount: &MoneyAmount, from: YearMonth, to: YearMonth) -> Result<MoneyAmount>;

    fn adjust_dates(
        &self,
        amount: &MoneyAmount,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<MoneyAmount> {
        self.adjust(amount, YearMonth::from_date(from), YearMonth::from_date(to))
    }

    /// Every month of `series` covered by this inflation, in `reference` values.
    fn adjust_series(
        &self,
        series: &MoneyAmountSeries,
        reference: YearMonth,
    ) -> Result<MoneyAmountSeries> {
        let mut answer = MoneyAmountSeries::new(self.currency().clone(), series.name.clone());
        let (Some(series_from), Some(end)) = (series.from(), series.to()) else {
            return Ok(answer);
        };
        let start = self.from().map_or(series_from, |from| from.max(series_from));
        for ym in start.iter_to(end) {
            let adjusted = self.adjust(&series.amount(ym)?, ym, reference)?;
            answer.put_amount(ym, adjusted)?;
        }
        Ok(answer)
    }

    /// The value of `amount` at `reference` expressed in every month this inflation covers.
    fn adjust_over_range(
        &self,
        amount: &MoneyAmount,
        reference: YearMonth,
    ) -> Result<MoneyAmountSeries> {
        let name = format!("{} series", amount.currency);
        let mut answer = MoneyAmountSeries::new(self.currency().clone(), name);
        let (Some(start), Some(end)) = (self.from(), self.to()) else {
            return Ok(answer);
        };
        for ym in start.iter_to(end) {
            answer.put_amount(ym, self.adjust(amount, reference, ym)?)?;
        }
        Ok(answer)
    }
}

/// Inflation backed by a consumer price index.
#[derive(Debug, Clone)]
pub struct CpiInflation {
    series: IndexSeries,
    currency: CurrencyCode,
}

impl CpiInflation {
    pub fn new(series: IndexSeries, currency: impl Into<CurrencyCode>) -> Self {
        Self {
            series,
            currency: currency.into(),
        }
    }
}

impl Inflation for CpiInflation {
    fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    fn from(&self) -> Option<YearMonth> {
        self.series.from()
    }

    fn to(&self) -> Option<YearMonth> {
        self.series.to()
    }

    fn adjust(&self, amount: &MoneyAmount, from: YearMonth, to: YearMonth) -> Result<MoneyAmount> {
        amount.assert_currency(&self.currency)?;
        let divisor = self.series.index(from)?;
        let factor = self.series.index(to)?;
        debug!(%from, %to, divisor, factor, "adjusting for inflation");
        Ok(amount.adjust(divisor, factor))
    }
}
