use serde::{Deserialize, Serialize};

/// Storefront page prefix; the app id is appended
pub const STORE_APP_URL: &str = "https://store.steampowered.com/app/";

/// Price in minor units (cents, kopecks, ...)
///
/// `final_price <= initial` always holds for values built through [`Money::new`].
/// A strictly lower final price means a discount is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// ISO 4217 code as reported by the store (e.g. "USD")
    pub currency: String,

    /// Price before discount
    pub initial: i64,

    /// Price actually charged
    #[serde(rename = "final")]
    pub final_price: i64,
}

impl Money {
    /// Build a price, raising `initial` when the store reports it below `final_price`
    pub fn new(currency: impl Into<String>, initial: i64, final_price: i64) -> Self {
        Self {
            currency: currency.into(),
            initial: initial.max(final_price),
            final_price,
        }
    }

    pub fn has_discount(&self) -> bool {
        self.initial > self.final_price
    }

    pub fn initial_major(&self) -> f64 {
        self.initial as f64 / 100.0
    }

    pub fn final_major(&self) -> f64 {
        self.final_price as f64 / 100.0
    }
}

/// A game as returned by a lookup provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Store app id
    pub id: u64,

    /// Canonical display title
    pub name: String,

    /// Missing for free titles
    #[serde(default)]
    pub price: Option<Money>,
}

impl Game {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price: None,
        }
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn is_free(&self) -> bool {
        self.price.is_none()
    }

    pub fn store_url(&self) -> String {
        store_url(self.id)
    }
}

pub fn store_url(id: u64) -> String {
    format!("{}{}", STORE_APP_URL, id)
}
