use std::sync::Mutex;

/// Something worth reporting while resolving and aggregating a query
#[derive(Debug, Clone, PartialEq)]
pub enum LookupEvent {
    /// Baseline search matched the raw query
    DirectHit { query: String, game_id: u64 },
    /// Oracle rewrote an unmatched query
    QueryCorrected { query: String, corrected: String },
    /// Corrected title matched a game
    CorrectedHit { corrected: String, game_id: u64 },
    /// Nothing matched, even after correction
    NotFound { query: String, corrected: String },
    /// A country lookup failed and the country was dropped
    CountrySkipped { country: String, error: String },
    /// A later query variant failed; the next one is still tried
    VariantFailed { country: String, query: String, error: String },
    /// No variant matched in this country
    CountryMissed { country: String },
    /// A quote was collected; `variant` is the 0-based query variant that matched
    QuoteCollected { country: String, variant: usize },
    /// A country task panicked or was aborted before reporting
    CountryTaskFailed { error: String },
    /// Caller cancelled the fan-out; collected quotes are kept
    AggregationCancelled { completed: usize, pending: usize },
    /// Multi-region lookup finished
    LookupCompleted { query: String, game_name: String, quotes: usize },
    /// Identity resolution failed and the single-region search path is taken
    FallbackSearch { query: String, reason: String },
}

/// Injected instrumentation for the lookup pipeline
pub trait EventObserver: Send + Sync {
    fn observe(&self, event: &LookupEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EventObserver for TracingObserver {
    fn observe(&self, event: &LookupEvent) {
        match event {
            LookupEvent::DirectHit { query, game_id } => {
                tracing::debug!("🎯 '{}' matched app {}", query, game_id);
            }
            LookupEvent::QueryCorrected { query, corrected } => {
                tracing::info!("🔤 Oracle corrected '{}' → '{}'", query, corrected);
            }
            LookupEvent::CorrectedHit { corrected, game_id } => {
                tracing::debug!("🎯 '{}' matched app {}", corrected, game_id);
            }
            LookupEvent::NotFound { query, corrected } => {
                tracing::info!("❌ Nothing found for '{}' (corrected: '{}')", query, corrected);
            }
            LookupEvent::CountrySkipped { country, error } => {
                tracing::warn!("⚠️ Skipping {}: {}", country, error);
            }
            LookupEvent::VariantFailed { country, query, error } => {
                tracing::warn!("⚠️ {} lookup for '{}' failed: {}", country, query, error);
            }
            LookupEvent::CountryMissed { country } => {
                tracing::debug!("No match in {}", country);
            }
            LookupEvent::QuoteCollected { country, variant } => {
                tracing::debug!("💰 Quote for {} (variant {})", country, variant);
            }
            LookupEvent::CountryTaskFailed { error } => {
                tracing::warn!("Country lookup task failed: {}", error);
            }
            LookupEvent::AggregationCancelled { completed, pending } => {
                tracing::warn!(
                    "⏱️ Aggregation cancelled with {} countries done, {} pending",
                    completed,
                    pending
                );
            }
            LookupEvent::LookupCompleted { query, game_name, quotes } => {
                tracing::info!("✅ {} → {} ({} countries)", query, game_name, quotes);
            }
            LookupEvent::FallbackSearch { query, reason } => {
                tracing::warn!("↩️ Falling back to plain search for '{}': {}", query, reason);
            }
        }
    }
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EventObserver for NoopObserver {
    fn observe(&self, _event: &LookupEvent) {}
}

/// Keeps every event in memory, for assertions
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<LookupEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LookupEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventObserver for RecordingObserver {
    fn observe(&self, event: &LookupEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
