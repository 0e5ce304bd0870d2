use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::aggregator::RegionAggregator;
use crate::config::EngineConfig;
use crate::core::{AggregateResult, SearchHit};
use crate::error::{PriceEngineError, Result};
use crate::formatter::OfferFormatter;
use crate::observer::{EventObserver, LookupEvent, TracingObserver};
use crate::oracle::{ChatCompletionCorrector, QueryCorrector};
use crate::providers::{LookupProvider, SteamStoreProvider};
use crate::resolver::{GameResolver, Resolution};

pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_QUERY_CHARS: usize = 200;

/// Trim a user query and check its length
pub fn validate_query(query: &str) -> Result<&str> {
    let query = query.trim();
    let chars = query.chars().count();

    if chars < MIN_QUERY_CHARS {
        return Err(PriceEngineError::InvalidQuery(format!(
            "query too short (at least {} characters)",
            MIN_QUERY_CHARS
        )));
    }
    if chars > MAX_QUERY_CHARS {
        return Err(PriceEngineError::InvalidQuery(format!(
            "query too long (at most {} characters)",
            MAX_QUERY_CHARS
        )));
    }
    Ok(query)
}

/// What the engine answers to one user query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    /// Multi-region lookup succeeded (possibly with no quotes)
    Prices(AggregateResult),
    /// Identity resolution failed; plain baseline-region search results
    SearchResults { hits: Vec<SearchHit> },
}

/// Main price lookup orchestrator
pub struct PriceEngine {
    provider: Arc<dyn LookupProvider>,
    resolver: GameResolver,
    aggregator: RegionAggregator,
    formatter: OfferFormatter,
    observer: Arc<dyn EventObserver>,
}

impl PriceEngine {
    /// Create engine with the Steam store provider and the chat completion oracle
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let provider: Arc<dyn LookupProvider> = Arc::new(SteamStoreProvider::new(&config.steam)?);
        let corrector: Arc<dyn QueryCorrector> = Arc::new(ChatCompletionCorrector::new(&config.oracle)?);

        tracing::info!(
            "✅ Price engine ready ({} countries, provider {}, oracle {})",
            config.countries.len(),
            provider.name(),
            corrector.name()
        );

        Ok(Self::with_parts(config, provider, corrector, Arc::new(TracingObserver)))
    }

    /// Create engine around arbitrary collaborators
    pub fn with_parts(
        config: &EngineConfig,
        provider: Arc<dyn LookupProvider>,
        corrector: Arc<dyn QueryCorrector>,
        observer: Arc<dyn EventObserver>,
    ) -> Self {
        let resolver = GameResolver::new(Arc::clone(&provider), corrector, Arc::clone(&observer));
        let aggregator = RegionAggregator::new(
            Arc::clone(&provider),
            config.countries.clone(),
            config.currency.table.clone(),
            Arc::clone(&observer),
        );
        let formatter = OfferFormatter::new(
            config.currency.reference_country.clone(),
            config.currency.table.reference.clone(),
            config.max_search_results,
        );

        Self {
            provider,
            resolver,
            aggregator,
            formatter,
            observer,
        }
    }

    pub fn formatter(&self) -> &OfferFormatter {
        &self.formatter
    }

    /// Resolve the query and collect quotes for every configured country
    pub async fn lookup(&self, query: &str) -> Result<AggregateResult> {
        self.lookup_until(query, std::future::pending()).await
    }

    /// [`lookup`](Self::lookup) bounded by a deadline
    pub async fn lookup_within(&self, query: &str, timeout: Duration) -> Result<AggregateResult> {
        self.lookup_until(query, tokio::time::sleep(timeout)).await
    }

    /// Lookup that stops when `cancel` completes.
    ///
    /// Cancellation while resolving is an error; cancellation during the country fan-out
    /// returns the quotes collected so far.
    pub async fn lookup_until<C>(&self, query: &str, cancel: C) -> Result<AggregateResult>
    where
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);

        let resolution = self.resolver.resolve_until(query, &mut cancel).await?;

        match resolution {
            Resolution::Found { game, corrected_query } => Ok(self
                .aggregator
                .aggregate_until(&game, corrected_query.as_deref(), query, &mut cancel)
                .await),
            Resolution::NotFound { display_name } => Ok(AggregateResult::not_found(display_name)),
        }
    }

    /// All baseline-region matches for the query
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.provider.search_hits(query).await
    }

    /// Answer a user query: multi-region prices, or plain search when the game cannot be resolved
    pub async fn handle(&self, query: &str) -> Result<Reply> {
        self.handle_until(query, std::future::pending()).await
    }

    pub async fn handle_within(&self, query: &str, timeout: Duration) -> Result<Reply> {
        self.handle_until(query, tokio::time::sleep(timeout)).await
    }

    /// [`handle`](Self::handle) that stops when `cancel` completes.
    ///
    /// The deadline covers the fallback search too; cancellation at any stage before the
    /// fan-out is reported as `Cancelled`.
    pub async fn handle_until<C>(&self, query: &str, cancel: C) -> Result<Reply>
    where
        C: Future<Output = ()>,
    {
        let query = validate_query(query)?;
        tokio::pin!(cancel);

        match self.lookup_until(query, &mut cancel).await {
            Ok(result) => {
                self.observer.observe(&LookupEvent::LookupCompleted {
                    query: query.to_string(),
                    game_name: result.game_name.clone(),
                    quotes: result.quotes.len(),
                });
                Ok(Reply::Prices(result))
            }
            Err(e) if e.is_cancelled() => Err(PriceEngineError::Cancelled),
            Err(e) => {
                self.observer.observe(&LookupEvent::FallbackSearch {
                    query: query.to_string(),
                    reason: e.to_string(),
                });
                tokio::select! {
                    biased;
                    _ = &mut cancel => Err(PriceEngineError::Cancelled),
                    hits = self.search(query) => Ok(Reply::SearchResults { hits: hits? }),
                }
            }
        }
    }

    /// Render a reply as chat text
    pub fn render(&self, reply: &Reply) -> String {
        match reply {
            Reply::Prices(result) => self.formatter.format(result),
            Reply::SearchResults { hits } => self.formatter.format_search_results(hits),
        }
    }
}
