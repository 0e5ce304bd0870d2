//! Engine configuration with defaults matching the production bot.
//!
//! ```
//! use game_price_engine::EngineConfig;
//!
//! let config = EngineConfig::from_yaml_str("countries:\n  - { code: TR, flag: \"🇹🇷\" }\n").unwrap();
//! assert_eq!(config.countries.len(), 1);
//! assert_eq!(config.steam.baseline_country, "US"); // default
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::core::Country;
use crate::currency::CurrencyRateTable;
use crate::error::{PriceEngineError, Result};

/// Steam store search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteamConfig {
    pub base_url: String,
    pub language: String,
    /// Region used to resolve the canonical name and id
    pub baseline_country: String,
    pub timeout_secs: u64,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://store.steampowered.com".to_string(),
            language: "english".to_string(),
            baseline_country: "US".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Chat completion oracle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 15,
        }
    }
}

/// Currency table plus the country whose prices need no annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    pub reference_country: String,
    #[serde(flatten)]
    pub table: CurrencyRateTable,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            reference_country: "RU".to_string(),
            table: CurrencyRateTable::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub steam: SteamConfig,
    pub oracle: OracleConfig,
    /// Quote order follows this list
    pub countries: Vec<Country>,
    pub currency: CurrencyConfig,
    /// Entries shown by the plain search fallback
    pub max_search_results: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            steam: SteamConfig::default(),
            oracle: OracleConfig::default(),
            countries: vec![
                Country::new("RU", "🇷🇺"),
                Country::new("KZ", "🇰🇿"),
                Country::new("TR", "🇹🇷"),
                Country::new("PL", "🇵🇱"),
            ],
            currency: CurrencyConfig::default(),
            max_search_results: 5,
        }
    }
}

impl EngineConfig {
    /// Parse YAML; missing sections keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            PriceEngineError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Apply `STEAM_BASE_URL`, `ORACLE_BASE_URL`, `ORACLE_MODEL` and `OPENAI_API_KEY`
    pub fn apply_env_overrides(mut self) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if let Some(url) = var("STEAM_BASE_URL") {
            self.steam.base_url = url;
        }
        if let Some(url) = var("ORACLE_BASE_URL") {
            self.oracle.base_url = url;
        }
        if let Some(model) = var("ORACLE_MODEL") {
            self.oracle.model = model;
        }
        if let Some(key) = var("OPENAI_API_KEY") {
            self.oracle.api_key = Some(key);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.countries.is_empty() {
            return Err(PriceEngineError::Config("no countries configured".into()));
        }

        let mut seen = HashSet::new();
        for country in &self.countries {
            let code = country.code.trim().to_ascii_uppercase();
            if code.is_empty() {
                return Err(PriceEngineError::Config("empty country code".into()));
            }
            if !seen.insert(code) {
                return Err(PriceEngineError::Config(format!(
                    "country {} configured twice",
                    country.code
                )));
            }
        }

        if self.steam.baseline_country.trim().is_empty() {
            return Err(PriceEngineError::Config("baseline country is empty".into()));
        }

        self.currency.table.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        let codes: Vec<&str> = config.countries.iter().map(|c| c.code.as_str()).collect();

        assert_eq!(codes, vec!["RU", "KZ", "TR", "PL"]);
        assert_eq!(config.currency.table.reference, "RUB");
        assert_eq!(config.currency.table.fallback, "USD");
        assert_eq!(config.currency.reference_country, "RU");
        assert_eq!(config.max_search_results, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_keeps_order_and_defaults() {
        let yaml = r#"
steam:
  baseline_country: GB
countries:
  - { code: PL, flag: "🇵🇱" }
  - { code: TR, flag: "🇹🇷" }
currency:
  reference: EUR
  fallback: USD
  rates:
    EUR: 1.0
    USD: 0.92
"#;
        let config = EngineConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.steam.baseline_country, "GB");
        assert_eq!(config.steam.language, "english");
        assert_eq!(config.countries[0].code, "PL");
        assert_eq!(config.countries[1].code, "TR");
        assert_eq!(config.currency.table.reference, "EUR");
        assert_eq!(config.currency.reference_country, "RU");
        assert_eq!(config.oracle.model, "gpt-4o-mini");
    }

    #[test]
    fn test_duplicate_countries_rejected() {
        let yaml = "countries:\n  - { code: TR, flag: a }\n  - { code: tr, flag: b }\n";
        let err = EngineConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, PriceEngineError::Config(_)));
    }

    #[test]
    fn test_empty_country_list_rejected() {
        assert!(EngineConfig::from_yaml_str("countries: []\n").is_err());
    }

    #[test]
    fn test_bad_yaml() {
        let err = EngineConfig::from_yaml_str("countries: [ {").unwrap_err();
        assert!(matches!(err, PriceEngineError::Yaml(_)));
    }
}
