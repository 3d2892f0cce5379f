//! Monthly money series: amounts, index series, inflation and foreign exchange.

pub mod exchange;
pub mod index;
pub mod inflation;
pub mod json;
pub mod money;
pub mod money_series;
pub mod year_month;

pub use exchange::{CompoundForeignExchange, ForeignExchange, SimpleForeignExchange};
pub use index::IndexSeries;
pub use inflation::{CpiInflation, Inflation};
pub use json::{JsonDataPoint, JsonSeries};
pub use money::MoneyAmount;
pub use money_series::{InterpolationStrategy, MoneyAmountSeries};
pub use year_month::YearMonth;
