use std::future::Future;
use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};

use crate::core::{AggregateResult, Country, Game, RegionalQuote};
use crate::currency::CurrencyRateTable;
use crate::observer::{EventObserver, LookupEvent};
use crate::providers::LookupProvider;

/// Queries to try per country, highest priority first
pub fn query_variants(canonical: &str, corrected: Option<&str>, original: &str) -> Vec<String> {
    let mut variants = vec![canonical.to_string()];

    let corrected = corrected.filter(|c| !c.trim().is_empty());
    if let Some(corrected) = corrected {
        if corrected != canonical {
            variants.push(corrected.to_string());
        }
    }

    if !original.trim().is_empty() && original != canonical && Some(original) != corrected {
        variants.push(original.to_string());
    }

    variants
}

enum CountryOutcome {
    Quote(RegionalQuote),
    Missed,
    Skipped,
}

/// Collects one quote per configured country for an already resolved game
pub struct RegionAggregator {
    provider: Arc<dyn LookupProvider>,
    countries: Arc<[Country]>,
    rates: Arc<CurrencyRateTable>,
    observer: Arc<dyn EventObserver>,
}

impl RegionAggregator {
    pub fn new(
        provider: Arc<dyn LookupProvider>,
        countries: Vec<Country>,
        rates: CurrencyRateTable,
        observer: Arc<dyn EventObserver>,
    ) -> Self {
        Self {
            provider,
            countries: countries.into(),
            rates: Arc::new(rates),
            observer,
        }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Fan out to every country and wait for all of them
    pub async fn aggregate(
        &self,
        game: &Game,
        corrected_query: Option<&str>,
        original_query: &str,
    ) -> AggregateResult {
        self.aggregate_until(game, corrected_query, original_query, std::future::pending())
            .await
    }

    /// Fan out to every country until `cancel` completes.
    ///
    /// On cancellation the pending lookups are aborted and the quotes collected so far are
    /// returned. Quotes always follow the configured country order.
    pub async fn aggregate_until<C>(
        &self,
        game: &Game,
        corrected_query: Option<&str>,
        original_query: &str,
        cancel: C,
    ) -> AggregateResult
    where
        C: Future<Output = ()>,
    {
        let variants: Arc<[String]> =
            query_variants(&game.name, corrected_query, original_query).into();

        let mut tasks = JoinSet::new();
        for (index, country) in self.countries.iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            let rates = Arc::clone(&self.rates);
            let observer = Arc::clone(&self.observer);
            let variants = Arc::clone(&variants);
            let country = country.clone();
            let game_id = game.id;

            tasks.spawn(async move {
                let outcome = quote_for_country(
                    provider.as_ref(),
                    rates.as_ref(),
                    observer.as_ref(),
                    &country,
                    &variants,
                    game_id,
                )
                .await;
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<RegionalQuote>> = vec![None; self.countries.len()];
        let mut completed = 0usize;
        tokio::pin!(cancel);

        loop {
            tokio::select! {
                biased;
                _ = &mut cancel => {
                    // Keep tasks that finished but were not joined yet
                    while let Some(joined) = tasks.try_join_next() {
                        completed += 1;
                        self.record(joined, &mut slots);
                    }
                    let pending = self.countries.len() - completed;
                    tasks.abort_all();
                    self.observer.observe(&LookupEvent::AggregationCancelled { completed, pending });
                    break;
                }
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(joined) => {
                        completed += 1;
                        self.record(joined, &mut slots);
                    }
                },
            }
        }

        let quotes = slots.into_iter().flatten().collect();
        AggregateResult::new(game.id, game.name.clone(), quotes)
    }

    fn record(
        &self,
        joined: std::result::Result<(usize, CountryOutcome), JoinError>,
        slots: &mut [Option<RegionalQuote>],
    ) {
        match joined {
            Ok((index, CountryOutcome::Quote(quote))) => slots[index] = Some(quote),
            Ok(_) => {}
            Err(e) => self.observer.observe(&LookupEvent::CountryTaskFailed {
                error: e.to_string(),
            }),
        }
    }
}

/// Walk the query variants for one country; see [`query_variants`] for the order
async fn quote_for_country(
    provider: &dyn LookupProvider,
    rates: &CurrencyRateTable,
    observer: &dyn EventObserver,
    country: &Country,
    variants: &[String],
    game_id: u64,
) -> CountryOutcome {
    for (variant, query) in variants.iter().enumerate() {
        let found = match provider
            .search_by_country(query, &country.code, Some(game_id))
            .await
        {
            Ok(found) => found,
            Err(e) if variant == 0 => {
                observer.observe(&LookupEvent::CountrySkipped {
                    country: country.code.clone(),
                    error: e.to_string(),
                });
                return CountryOutcome::Skipped;
            }
            Err(e) => {
                observer.observe(&LookupEvent::VariantFailed {
                    country: country.code.clone(),
                    query: query.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        if let Some(found) = found {
            observer.observe(&LookupEvent::QuoteCollected {
                country: country.code.clone(),
                variant,
            });
            let converted_reference = found
                .price
                .as_ref()
                .map(|price| rates.to_reference(price.final_major(), &price.currency));

            return CountryOutcome::Quote(RegionalQuote {
                country_code: country.code.clone(),
                flag: country.flag.clone(),
                game: found,
                converted_reference,
            });
        }
    }

    observer.observe(&LookupEvent::CountryMissed {
        country: country.code.clone(),
    });
    CountryOutcome::Missed
}
