//! Currency conversion used to bring every transaction into the display currency.
//!
//! Rate lookup itself lives outside this crate. Callers inject a
//! [CurrencyConverter]; the server uses a [RateTable] built from command line
//! arguments.

use std::collections::HashMap;

use crate::Error;

/// The reasons a single conversion can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// There is no exchange rate for the currency code.
    #[error("no exchange rate for currency \"{0}\"")]
    UnknownCurrency(String),

    /// The rate source could not be reached or returned garbage.
    #[error("currency conversion failed: {0}")]
    Unavailable(String),
}

/// Converts an amount of money from one currency to another.
pub trait CurrencyConverter {
    /// Convert `amount` in the currency `from` into the currency `to`.
    ///
    /// # Errors
    /// Returns a [ConversionError] if either currency is unknown or the rate
    /// source fails.
    fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, ConversionError>;
}

impl<F> CurrencyConverter for F
where
    F: Fn(f64, &str, &str) -> Result<f64, ConversionError>,
{
    fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        self(amount, from, to)
    }
}

/// Exchange rates relative to a single base currency.
///
/// Each rate is the number of units of a currency that one unit of the base
/// currency buys, so the base currency always has a rate of 1.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Create a rate table that only knows about `base`.
    pub fn new(base: &str) -> Self {
        let base = normalise_code(base);
        let rates = HashMap::from([(base.clone(), 1.0)]);

        Self { base, rates }
    }

    /// Add or replace the rate for `code`.
    ///
    /// # Errors
    /// Returns [Error::InvalidRate] if `units_per_base` is not a positive, finite number.
    pub fn with_rate(mut self, code: &str, units_per_base: f64) -> Result<Self, Error> {
        if !units_per_base.is_finite() || units_per_base <= 0.0 {
            return Err(Error::InvalidRate(format!(
                "rate for {code} must be a positive number, got {units_per_base}"
            )));
        }

        self.rates.insert(normalise_code(code), units_per_base);
        Ok(self)
    }

    /// The base currency of the table.
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl CurrencyConverter for RateTable {
    fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        let from = normalise_code(from);
        let to = normalise_code(to);

        if from == to {
            return Ok(amount);
        }

        let from_rate = self
            .rates
            .get(&from)
            .ok_or_else(|| ConversionError::UnknownCurrency(from.clone()))?;
        let to_rate = self
            .rates
            .get(&to)
            .ok_or_else(|| ConversionError::UnknownCurrency(to.clone()))?;

        Ok(amount / from_rate * to_rate)
    }
}

/// Parse a rate given as `CODE=UNITS`, e.g. `EUR=0.92`.
///
/// # Errors
/// Returns [Error::InvalidRate] if the text is not in the expected format.
pub fn parse_rate(text: &str) -> Result<(String, f64), Error> {
    let (code, units) = text
        .split_once('=')
        .ok_or_else(|| Error::InvalidRate(format!("expected CODE=UNITS, got \"{text}\"")))?;

    let code = normalise_code(code);
    if code.is_empty() {
        return Err(Error::InvalidRate(format!(
            "missing currency code in \"{text}\""
        )));
    }

    let units = units
        .trim()
        .parse::<f64>()
        .map_err(|error| Error::InvalidRate(format!("invalid rate in \"{text}\": {error}")))?;

    Ok((code, units))
}

fn normalise_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
