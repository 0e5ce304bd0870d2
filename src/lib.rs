//! # Game Price Engine
//!
//! Multi-region game price lookup for the chat bot:
//! - Steam store search provider
//! - LLM spelling oracle for queries the store cannot match
//! - Concurrent per-country fan-out with a three-step query fallback
//! - Static currency normalization to a reference currency
//! - Chat-ready formatting
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use game_price_engine::{EngineConfig, PriceEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::default().apply_env_overrides();
//!     let engine = PriceEngine::from_config(&config)?;
//!
//!     let reply = engine.handle("half life").await?;
//!     println!("{}", engine.render(&reply));
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod currency;
pub mod observer;
pub mod providers;
pub mod oracle;
pub mod resolver;
pub mod aggregator;
pub mod formatter;
pub mod config;
pub mod engine;
pub mod error;

// Re-export primary types
pub use crate::core::{AggregateResult, Country, Game, Money, Platforms, RegionalQuote, SearchHit};
pub use currency::CurrencyRateTable;
pub use observer::{EventObserver, LookupEvent, NoopObserver, RecordingObserver, TracingObserver};
pub use providers::{LookupProvider, MemoryProvider, SteamStoreProvider};
pub use oracle::{ChatCompletionCorrector, MemoryCorrector, QueryCorrector};
pub use resolver::{GameResolver, Resolution};
pub use aggregator::RegionAggregator;
pub use formatter::OfferFormatter;
pub use config::EngineConfig;
pub use engine::{validate_query, PriceEngine, Reply};
pub use error::{PriceEngineError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
