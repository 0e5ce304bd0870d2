use std::future::Future;
use std::sync::Arc;

use crate::core::Game;
use crate::error::{PriceEngineError, Result};
use crate::observer::{EventObserver, LookupEvent};
use crate::oracle::QueryCorrector;
use crate::providers::LookupProvider;

/// Outcome of identity resolution
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// `corrected_query` is set when the match came through the oracle
    Found {
        game: Game,
        corrected_query: Option<String>,
    },
    /// Nothing matched, even after correction
    NotFound { display_name: String },
}

impl Resolution {
    pub fn game(&self) -> Option<&Game> {
        match self {
            Resolution::Found { game, .. } => Some(game),
            Resolution::NotFound { .. } => None,
        }
    }
}

/// Turns a raw user query into a canonical game: direct lookup first, oracle-corrected lookup second
pub struct GameResolver {
    provider: Arc<dyn LookupProvider>,
    corrector: Arc<dyn QueryCorrector>,
    observer: Arc<dyn EventObserver>,
}

impl GameResolver {
    pub fn new(
        provider: Arc<dyn LookupProvider>,
        corrector: Arc<dyn QueryCorrector>,
        observer: Arc<dyn EventObserver>,
    ) -> Self {
        Self {
            provider,
            corrector,
            observer,
        }
    }

    /// Resolve a query. Provider and oracle failures are fatal.
    pub async fn resolve(&self, query: &str) -> Result<Resolution> {
        self.resolve_steps(query)
            .await
            .map_err(|e| PriceEngineError::resolution(query, e))
    }

    /// Like [`resolve`](Self::resolve), failing with `Cancelled` if `cancel` completes first
    pub async fn resolve_until<C>(&self, query: &str, cancel: C) -> Result<Resolution>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => Err(PriceEngineError::resolution(query, PriceEngineError::Cancelled)),
            resolution = self.resolve(query) => resolution,
        }
    }

    async fn first_named_match(&self, query: &str) -> Result<Option<Game>> {
        let found = self.provider.search_first_match(query).await?;
        Ok(found.filter(|game| !game.name.trim().is_empty()))
    }

    async fn resolve_steps(&self, query: &str) -> Result<Resolution> {
        if let Some(game) = self.first_named_match(query).await? {
            self.observer.observe(&LookupEvent::DirectHit {
                query: query.to_string(),
                game_id: game.id,
            });
            return Ok(Resolution::Found {
                game,
                corrected_query: None,
            });
        }

        let corrected = self.corrector.correct(query).await?;
        self.observer.observe(&LookupEvent::QueryCorrected {
            query: query.to_string(),
            corrected: corrected.clone(),
        });

        match self.first_named_match(&corrected).await? {
            Some(game) => {
                self.observer.observe(&LookupEvent::CorrectedHit {
                    corrected: corrected.clone(),
                    game_id: game.id,
                });
                Ok(Resolution::Found {
                    game,
                    corrected_query: Some(corrected),
                })
            }
            None => {
                self.observer.observe(&LookupEvent::NotFound {
                    query: query.to_string(),
                    corrected: corrected.clone(),
                });
                Ok(Resolution::NotFound {
                    display_name: corrected,
                })
            }
        }
    }
}
