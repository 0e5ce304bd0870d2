pub mod memory;
pub mod steam;

use async_trait::async_trait;
use crate::core::{Game, SearchHit};
use crate::error::Result;

pub use memory::MemoryProvider;
pub use steam::SteamStoreProvider;

/// Trait for game lookup backends (Steam store search, in-memory fake)
#[async_trait]
pub trait LookupProvider: Send + Sync {
    /// Search the baseline region by name. An empty list is not an error.
    async fn search_by_name(&self, query: &str) -> Result<Vec<Game>>;

    /// Best baseline-region match for the query, if any
    async fn search_first_match(&self, query: &str) -> Result<Option<Game>> {
        Ok(self.search_by_name(query).await?.into_iter().next())
    }

    /// Baseline-region search with listing extras. Backends without extras wrap `search_by_name`.
    async fn search_hits(&self, query: &str) -> Result<Vec<SearchHit>> {
        Ok(self
            .search_by_name(query)
            .await?
            .into_iter()
            .map(SearchHit::from)
            .collect())
    }

    /// Country-scoped search. With `constraining_id`, only a record with that id is accepted.
    async fn search_by_country(
        &self,
        query: &str,
        country_code: &str,
        constraining_id: Option<u64>,
    ) -> Result<Option<Game>>;

    /// Get provider name
    fn name(&self) -> &str;
}

/// Pick the record a country-scoped search should return
pub(crate) fn select_match(games: Vec<Game>, constraining_id: Option<u64>) -> Option<Game> {
    let mut games = games.into_iter().filter(|g| !g.name.trim().is_empty());
    match constraining_id {
        Some(id) => games.find(|g| g.id == id),
        None => games.next(),
    }
}
