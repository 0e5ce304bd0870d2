use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::SteamConfig;
use crate::core::{Game, Money, Platforms, SearchHit};
use crate::providers::{select_match, LookupProvider};
use crate::error::{PriceEngineError, Result};

/// Steam store search provider
pub struct SteamStoreProvider {
    client: Client,
    base_url: String,
    language: String,
    baseline_country: String,
}

#[derive(Debug, Deserialize)]
struct StoreSearchResponse {
    #[serde(default)]
    items: Vec<StoreItem>,
}

#[derive(Debug, Deserialize)]
struct StoreItem {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: Option<StorePrice>,
    #[serde(default)]
    metascore: String,
    #[serde(default)]
    platforms: Platforms,
    #[serde(default)]
    controller_support: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StorePrice {
    currency: String,
    #[serde(default)]
    initial: i64,
    #[serde(rename = "final", default)]
    final_price: i64,
}

impl From<StoreItem> for SearchHit {
    fn from(item: StoreItem) -> Self {
        let game = Game {
            id: item.id,
            name: item.name,
            price: item
                .price
                .map(|p| Money::new(p.currency, p.initial, p.final_price)),
        };

        SearchHit {
            game,
            metascore: Some(item.metascore).filter(|m| !m.trim().is_empty()),
            platforms: item.platforms,
            controller_support: item.controller_support.filter(|c| !c.trim().is_empty()),
        }
    }
}

impl From<StoreItem> for Game {
    fn from(item: StoreItem) -> Self {
        SearchHit::from(item).game
    }
}

impl SteamStoreProvider {
    /// Create new Steam store provider
    pub fn new(config: &SteamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            baseline_country: config.baseline_country.clone(),
        })
    }

    fn search_url(&self, query: &str, country_code: &str) -> String {
        format!(
            "{}/api/storesearch/?term={}&l={}&cc={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.language),
            urlencoding::encode(country_code)
        )
    }

    /// Query the storesearch endpoint for one country
    async fn store_items(&self, query: &str, country_code: &str) -> Result<Vec<StoreItem>> {
        let url = self.search_url(query, country_code);

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| PriceEngineError::provider("steam", format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(PriceEngineError::provider(
                "steam",
                format!("HTTP {}", response.status()),
            ));
        }

        let body: StoreSearchResponse = response
            .json()
            .await
            .map_err(|e| PriceEngineError::provider("steam", format!("Invalid JSON: {}", e)))?;

        Ok(body.items)
    }

    async fn store_search(&self, query: &str, country_code: &str) -> Result<Vec<Game>> {
        let items = self.store_items(query, country_code).await?;
        Ok(items.into_iter().map(Game::from).collect())
    }
}

#[async_trait]
impl LookupProvider for SteamStoreProvider {
    async fn search_by_name(&self, query: &str) -> Result<Vec<Game>> {
        self.store_search(query, &self.baseline_country).await
    }

    async fn search_hits(&self, query: &str) -> Result<Vec<SearchHit>> {
        let items = self.store_items(query, &self.baseline_country).await?;
        Ok(items.into_iter().map(SearchHit::from).collect())
    }

    async fn search_first_match(&self, query: &str) -> Result<Option<Game>> {
        let games = self.store_search(query, &self.baseline_country).await?;
        Ok(select_match(games, None))
    }

    async fn search_by_country(
        &self,
        query: &str,
        country_code: &str,
        constraining_id: Option<u64>,
    ) -> Result<Option<Game>> {
        let games = self.store_search(query, country_code).await?;
        Ok(select_match(games, constraining_id))
    }

    fn name(&self) -> &str {
        "steam"
    }
}
