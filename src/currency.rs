//! Static, approximate conversion into the reference currency.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PriceEngineError, Result};

/// Used when neither the quote's currency nor the fallback currency has a usable rate
pub const LAST_RESORT_RATE: f64 = 90.0;

fn default_reference() -> String {
    "RUB".to_string()
}

fn default_fallback() -> String {
    "USD".to_string()
}

/// Currency code -> multiplier into the reference currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRateTable {
    /// Currency every quote is normalized to
    #[serde(default = "default_reference")]
    pub reference: String,

    /// Currency whose rate stands in for codes missing from `rates`
    #[serde(default = "default_fallback")]
    pub fallback: String,

    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

impl Default for CurrencyRateTable {
    fn default() -> Self {
        let rates = [
            ("RUB", 1.0),
            ("USD", 90.0),
            ("EUR", 99.0),
            ("KZT", 0.2),
            ("TRY", 2.2),
            ("PLN", 23.0),
            ("GBP", 110.0),
            ("CNY", 13.0),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), rate))
        .collect();

        Self {
            reference: default_reference(),
            fallback: default_fallback(),
            rates,
        }
    }
}

impl CurrencyRateTable {
    pub fn new(reference: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            fallback: fallback.into(),
            rates: BTreeMap::new(),
        }
    }

    pub fn with_rate(mut self, currency: impl Into<String>, rate: f64) -> Self {
        self.rates.insert(currency.into().to_ascii_uppercase(), rate);
        self
    }

    fn rate(&self, currency: &str) -> Option<f64> {
        self.rates
            .get(currency)
            .or_else(|| self.rates.get(&currency.to_ascii_uppercase()))
            .copied()
    }

    /// Convert a major-unit amount into the reference currency.
    ///
    /// Never fails: unknown codes go through the fallback currency's rate,
    /// and through [`LAST_RESORT_RATE`] when that one is unset or zero.
    pub fn to_reference(&self, amount: f64, currency: &str) -> f64 {
        if currency.eq_ignore_ascii_case(&self.reference) {
            return amount;
        }

        if let Some(rate) = self.rate(currency) {
            return amount * rate;
        }

        let rate = match self.rate(&self.fallback) {
            Some(rate) if rate != 0.0 => rate,
            _ => LAST_RESORT_RATE,
        };

        amount * rate
    }

    pub fn validate(&self) -> Result<()> {
        if self.reference.trim().is_empty() {
            return Err(PriceEngineError::Config("reference currency is empty".into()));
        }
        if self.fallback.trim().is_empty() {
            return Err(PriceEngineError::Config("fallback currency is empty".into()));
        }
        for (code, rate) in &self.rates {
            if code.trim().is_empty() {
                return Err(PriceEngineError::Config("empty currency code in rate table".into()));
            }
            if !rate.is_finite() || *rate < 0.0 {
                return Err(PriceEngineError::Config(format!(
                    "invalid rate {} for currency {}",
                    rate, code
                )));
            }
        }
        Ok(())
    }
}
