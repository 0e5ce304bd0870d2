use crate::core::{store_url, AggregateResult, Money, RegionalQuote, SearchHit};

/// Reply when no country produced a quote
pub const NO_PRICES_MESSAGE: &str = "❌ Could not find prices for this game.";

/// Reply when the plain search returned nothing
pub const NOTHING_FOUND_MESSAGE: &str = "❌ Nothing found.";

const FREE_LABEL: &str = "Free";

/// Shown for a priceless quote when another country does have a price
const UNAVAILABLE_LABEL: &str = "Unavailable";

fn amount(minor: i64, currency: &str) -> String {
    format!("{:.2} {}", minor as f64 / 100.0, currency)
}

/// Renders aggregate results and search fallbacks as chat text
#[derive(Debug, Clone)]
pub struct OfferFormatter {
    reference_country: String,
    reference_currency: String,
    max_search_results: usize,
}

impl Default for OfferFormatter {
    fn default() -> Self {
        Self::new("RU", "RUB", 5)
    }
}

impl OfferFormatter {
    pub fn new(
        reference_country: impl Into<String>,
        reference_currency: impl Into<String>,
        max_search_results: usize,
    ) -> Self {
        Self {
            reference_country: reference_country.into(),
            reference_currency: reference_currency.into(),
            max_search_results,
        }
    }

    /// One header line, one line per quote, then the store link.
    ///
    /// A quote without a price reads "Free" only when no country has a price at all;
    /// next to priced countries it reads "Unavailable".
    pub fn format(&self, result: &AggregateResult) -> String {
        if result.quotes.is_empty() {
            return NO_PRICES_MESSAGE.to_string();
        }

        let missing_price_label = if result.quotes.iter().any(|q| q.has_price()) {
            UNAVAILABLE_LABEL
        } else {
            FREE_LABEL
        };

        let mut lines = Vec::with_capacity(result.quotes.len() + 2);
        lines.push(format!("*{}*", result.game_name));

        for quote in &result.quotes {
            let text = match &quote.game.price {
                Some(price) => self.price_text(quote, price),
                None => missing_price_label.to_string(),
            };
            lines.push(format!("{} - {}", quote.flag, text));
        }

        lines.push(store_url(result.game_id));
        lines.join("\n")
    }

    fn price_text(&self, quote: &RegionalQuote, price: &Money) -> String {
        let final_price = amount(price.final_price, &price.currency);

        let mut text = if price.has_discount() {
            format!(
                "Discounted {} (was {})",
                final_price,
                amount(price.initial, &price.currency)
            )
        } else {
            final_price
        };

        let is_reference_country = quote
            .country_code
            .eq_ignore_ascii_case(&self.reference_country);
        if let Some(converted) = quote.converted_reference {
            if converted > 0.0 && !is_reference_country {
                text.push_str(&format!(" (~{:.0} {})", converted, self.reference_currency));
            }
        }

        text
    }

    /// Single-region search listing used when multi-region lookup failed
    pub fn format_search_results(&self, hits: &[SearchHit]) -> String {
        if hits.is_empty() {
            return NOTHING_FOUND_MESSAGE.to_string();
        }

        let mut parts: Vec<String> = hits
            .iter()
            .take(self.max_search_results)
            .map(search_entry)
            .collect();

        if hits.len() > self.max_search_results {
            parts.push(format!(
                "... and {} more results",
                hits.len() - self.max_search_results
            ));
        }

        parts.join("\n\n")
    }
}

fn search_entry(hit: &SearchHit) -> String {
    let game = &hit.game;
    let price = game
        .price
        .as_ref()
        .map(|p| amount(p.final_price, &p.currency))
        .unwrap_or_else(|| FREE_LABEL.to_string());

    let mut lines = vec![format!("🎮 *{}*", game.name), format!("💰 {}", price)];
    if let Some(metascore) = &hit.metascore {
        lines.push(format!("⭐ {}", metascore));
    }
    lines.push(format!("💻 {}", hit.platforms.icons()));

    let mut link = format!("🔗 {}", game.store_url());
    if let Some(support) = &hit.controller_support {
        link.push_str(&format!(" 🎮 {}", support));
    }
    lines.push(link);

    lines.join("\n")
}
