pub mod game;
pub mod offer;
pub mod search_hit;

pub use game::{store_url, Game, Money};
pub use offer::{AggregateResult, Country, RegionalQuote};
pub use search_hit::{Platforms, SearchHit};
