use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::core::Game;
use crate::providers::{select_match, LookupProvider};
use crate::error::{PriceEngineError, Result};

/// A lookup recorded by [`MemoryProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    pub country: String,
    pub query: String,
    pub constraining_id: Option<u64>,
}

/// Fixed catalog keyed by (country, query), for tests and offline runs.
///
/// Queries match case-insensitively after trimming.
pub struct MemoryProvider {
    baseline_country: String,
    catalog: HashMap<(String, String), Vec<Game>>,
    failing_countries: HashSet<String>,
    failing_lookups: HashSet<(String, String)>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<ProviderCall>>,
}

fn key(country: &str, query: &str) -> (String, String) {
    (country.to_ascii_uppercase(), query.trim().to_lowercase())
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::with_baseline("US")
    }

    pub fn with_baseline(baseline_country: impl Into<String>) -> Self {
        Self {
            baseline_country: baseline_country.into().to_ascii_uppercase(),
            catalog: HashMap::new(),
            failing_countries: HashSet::new(),
            failing_lookups: HashSet::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `query` return `game` in `country`
    pub fn with_game(mut self, country: &str, query: &str, game: Game) -> Self {
        self.catalog.entry(key(country, query)).or_default().push(game);
        self
    }

    /// Every lookup in `country` errors
    pub fn failing_country(mut self, country: &str) -> Self {
        self.failing_countries.insert(country.to_ascii_uppercase());
        self
    }

    /// Only this (country, query) lookup errors
    pub fn failing_lookup(mut self, country: &str, query: &str) -> Self {
        self.failing_lookups.insert(key(country, query));
        self
    }

    /// Sleep before answering lookups in `country`
    pub fn with_delay(mut self, country: &str, delay: Duration) -> Self {
        self.delays.insert(country.to_ascii_uppercase(), delay);
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn calls_for(&self, country: &str) -> Vec<ProviderCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.country.eq_ignore_ascii_case(country))
            .collect()
    }

    async fn lookup(
        &self,
        query: &str,
        country: &str,
        constraining_id: Option<u64>,
    ) -> Result<Vec<Game>> {
        let country = country.to_ascii_uppercase();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(ProviderCall {
                country: country.clone(),
                query: query.to_string(),
                constraining_id,
            });
        }

        if let Some(delay) = self.delays.get(&country) {
            tokio::time::sleep(*delay).await;
        }

        let key = key(&country, query);
        if self.failing_countries.contains(&country) || self.failing_lookups.contains(&key) {
            return Err(PriceEngineError::provider(
                "memory",
                format!("lookup failed for '{}' in {}", query, country),
            ));
        }

        Ok(self.catalog.get(&key).cloned().unwrap_or_default())
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupProvider for MemoryProvider {
    async fn search_by_name(&self, query: &str) -> Result<Vec<Game>> {
        let country = self.baseline_country.clone();
        self.lookup(query, &country, None).await
    }

    async fn search_first_match(&self, query: &str) -> Result<Option<Game>> {
        Ok(select_match(self.search_by_name(query).await?, None))
    }

    async fn search_by_country(
        &self,
        query: &str,
        country_code: &str,
        constraining_id: Option<u64>,
    ) -> Result<Option<Game>> {
        let games = self.lookup(query, country_code, constraining_id).await?;
        Ok(select_match(games, constraining_id))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let provider = MemoryProvider::new().with_game("US", "Half-Life", Game::new(70, "Half-Life"));

        let game = provider.search_first_match("  half-life ").await.unwrap();
        assert_eq!(game.unwrap().id, 70);
        assert_eq!(provider.calls_for("us").len(), 1);
    }

    #[tokio::test]
    async fn test_failing_country() {
        let provider = MemoryProvider::new()
            .with_game("TR", "Half-Life", Game::new(70, "Half-Life"))
            .failing_country("tr");

        let result = provider.search_by_country("Half-Life", "TR", Some(70)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_constraining_id() {
        let provider = MemoryProvider::new().with_game("PL", "Half-Life", Game::new(280, "Half-Life: Source"));

        let found = provider.search_by_country("Half-Life", "PL", Some(70)).await.unwrap();
        assert!(found.is_none());
        assert_eq!(provider.calls()[0].constraining_id, Some(70));
    }
}
