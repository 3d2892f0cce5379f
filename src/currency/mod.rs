use std::fmt;

use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "US$".into(),
        "ARS" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "XAU" => "oz".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "XAU" => 4,
        _ => 2,
    }
}

/// Renders `value` with `precision` decimals and thousands grouping.
pub fn format_number(value: f64, precision: u8, decimal_separator: char, grouping: char) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };
    let mut rendered = group_digits(int_part, grouping);
    if let Some(fraction) = fraction {
        rendered.push(decimal_separator);
        rendered.push_str(fraction);
    }
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        rendered.insert(0, '-');
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Formats an amount for display using the currency's symbol and minor units.
pub fn format_money(amount: f64, code: &CurrencyCode, locale: &str) -> String {
    let (decimal, grouping) = separators_for(locale);
    let precision = minor_units_for(code.as_str());
    format!(
        "{} {}",
        symbol_for(code.as_str()),
        format_number(amount, precision, decimal, grouping)
    )
}

fn separators_for(locale: &str) -> (char, char) {
    if locale.starts_with("es") || locale.starts_with("de") || locale.starts_with("pt") {
        (',', '.')
    } else {
        ('.', ',')
    }
}
