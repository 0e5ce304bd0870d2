use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Game;

/// A storefront country the engine collects quotes for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Two-letter store country code ("RU", "TR", ...)
    pub code: String,

    /// Display marker, usually a flag emoji
    pub flag: String,
}

impl Country {
    pub fn new(code: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            flag: flag.into(),
        }
    }
}

/// One country's observation of the resolved game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalQuote {
    pub country_code: String,
    pub flag: String,

    /// The matching store record for this country
    pub game: Game,

    /// Final price in the reference currency. `None` when the game has no price.
    pub converted_reference: Option<f64>,
}

impl RegionalQuote {
    pub fn has_price(&self) -> bool {
        self.game.price.is_some()
    }
}

/// Per-country quotes for one user query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateResult {
    /// 0 when nothing was found
    pub game_id: u64,
    pub game_name: String,

    /// Ordered like the configured country list
    #[serde(default)]
    pub quotes: Vec<RegionalQuote>,

    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
}

impl AggregateResult {
    pub fn new(game_id: u64, game_name: impl Into<String>, quotes: Vec<RegionalQuote>) -> Self {
        Self {
            game_id,
            game_name: game_name.into(),
            quotes,
            fetched_at: Utc::now(),
        }
    }

    /// Result for a query nothing matched, named after the best-known title
    pub fn not_found(display_name: impl Into<String>) -> Self {
        Self::new(0, display_name, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn quote(&self, country_code: &str) -> Option<&RegionalQuote> {
        self.quotes
            .iter()
            .find(|q| q.country_code.eq_ignore_ascii_case(country_code))
    }

    pub fn country_codes(&self) -> Vec<&str> {
        self.quotes.iter().map(|q| q.country_code.as_str()).collect()
    }
}
