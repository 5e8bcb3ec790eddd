//! Currency rate abstractions and the static currency name table

use crate::core::error::Result;
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;

/// Currency code to rate, relative to some base currency.
pub type RateMap = HashMap<String, f64>;

/// A tracked currency joined with its current rate.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyRate {
    pub code: String,
    pub name: String,
    /// Units of `code` per one unit of the base currency.
    pub rate: f64,
}

impl CurrencyRate {
    /// Units of the base currency per one unit of `code`.
    pub fn inverse(&self) -> f64 {
        1.0 / self.rate
    }
}

/// Rates as reported by a provider for one base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestRates {
    pub base_code: String,
    pub rates: RateMap,
}

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn latest_rates(&self, base: &str) -> Result<LatestRates>;
}

pub const CURRENCY_NAMES: &[(&str, &str)] = &[
    ("AED", "UAE Dirham"),
    ("ARS", "Argentine Peso"),
    ("AUD", "Australian Dollar"),
    ("BGN", "Bulgarian Lev"),
    ("BRL", "Brazilian Real"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CLP", "Chilean Peso"),
    ("CNY", "Chinese Yuan"),
    ("COP", "Colombian Peso"),
    ("CZK", "Czech Koruna"),
    ("DKK", "Danish Krone"),
    ("EGP", "Egyptian Pound"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("HKD", "Hong Kong Dollar"),
    ("HUF", "Hungarian Forint"),
    ("IDR", "Indonesian Rupiah"),
    ("ILS", "Israeli New Shekel"),
    ("INR", "Indian Rupee"),
    ("ISK", "Icelandic Krona"),
    ("JPY", "Japanese Yen"),
    ("KRW", "South Korean Won"),
    ("KWD", "Kuwaiti Dinar"),
    ("MXN", "Mexican Peso"),
    ("MYR", "Malaysian Ringgit"),
    ("NGN", "Nigerian Naira"),
    ("NOK", "Norwegian Krone"),
    ("NZD", "New Zealand Dollar"),
    ("PHP", "Philippine Peso"),
    ("PKR", "Pakistani Rupee"),
    ("PLN", "Polish Zloty"),
    ("RON", "Romanian Leu"),
    ("SAR", "Saudi Riyal"),
    ("SEK", "Swedish Krona"),
    ("SGD", "Singapore Dollar"),
    ("THB", "Thai Baht"),
    ("TRY", "Turkish Lira"),
    ("TWD", "New Taiwan Dollar"),
    ("UAH", "Ukrainian Hryvnia"),
    ("USD", "US Dollar"),
    ("VND", "Vietnamese Dong"),
    ("ZAR", "South African Rand"),
];

/// Display name for a currency code, falling back to the code itself.
pub fn currency_name(code: &str) -> &str {
    CURRENCY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |(_, name)| *name)
}

/// Known currencies whose code or name contains `query`, ignoring case.
/// An empty query matches everything.
pub fn search_currencies(query: &str) -> Vec<(&'static str, &'static str)> {
    let query = query.trim().to_lowercase();
    let mut matches: Vec<(&'static str, &'static str)> = CURRENCY_NAMES
        .iter()
        .filter(|(code, name)| {
            code.to_lowercase().contains(&query) || name.to_lowercase().contains(&query)
        })
        .copied()
        .collect();
    matches.sort_by_key(|(code, _)| *code);
    matches
}

/// Normalizes user input into an uppercase three-letter code.
pub fn parse_currency_code(input: &str) -> anyhow::Result<String> {
    let code = input.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(anyhow!("Invalid currency code: {}", input));
    }
    Ok(code)
}
