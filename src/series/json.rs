use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{IndexSeries, InterpolationStrategy, MoneyAmount, MoneyAmountSeries, YearMonth};
use crate::errors::{LedgerError, Result};

/// One monthly observation as stored in a series file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonDataPoint {
    pub year: i32,
    pub month: u32,
    pub value: f64,
}

/// On-disk layout shared by index and money series files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSeries {
    pub currency: String,
    #[serde(default)]
    pub interpolation: InterpolationStrategy,
    #[serde(default)]
    pub data: Vec<JsonDataPoint>,
}

impl JsonSeries {
    pub fn into_index_series(self) -> Result<IndexSeries> {
        Ok(IndexSeries::new(self.monthly_values("index series")?))
    }

    /// Builds a money series, filling months missing between the first and
    /// last data point according to the file's interpolation strategy.
    pub fn into_money_series(self, name: impl Into<String>) -> Result<MoneyAmountSeries> {
        let name = name.into();
        let values = self.monthly_values(&format!("series `{name}`"))?;
        let mut series = MoneyAmountSeries::new(self.currency.as_str(), name)
            .with_interpolation(self.interpolation);
        for (ym, value) in values {
            series.put_amount(ym, MoneyAmount::new(value, self.currency.as_str()))?;
        }
        series.fill_gaps()?;
        Ok(series)
    }

    fn monthly_values(&self, label: &str) -> Result<BTreeMap<YearMonth, f64>> {
        let mut values = BTreeMap::new();
        for point in &self.data {
            let ym = YearMonth::new(point.year, point.month)?;
            if values.insert(ym, point.value).is_some() {
                return Err(LedgerError::InvalidSeries(format!(
                    "{label} has two values for {ym}"
                )));
            }
        }
        Ok(values)
    }

    pub fn from_money_series(series: &MoneyAmountSeries) -> Self {
        Self {
            currency: series.currency().to_string(),
            interpolation: InterpolationStrategy::NoInterpolation,
            data: series
                .iter()
                .map(|(ym, amount)| JsonDataPoint {
                    year: ym.year(),
                    month: ym.month(),
                    value: amount.amount,
                })
                .collect(),
        }
    }
}
