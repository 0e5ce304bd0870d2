use game_price_engine::{
    formatter::NO_PRICES_MESSAGE, CurrencyRateTable, EngineConfig, Game, LookupEvent,
    MemoryCorrector, MemoryProvider, Money, NoopObserver, PriceEngine, PriceEngineError,
    RecordingObserver, Reply,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn half_life(currency: &str, initial: i64, final_price: i64) -> Game {
    Game::new(70, "Half-Life").with_price(Money::new(currency, initial, final_price))
}

/// Baseline hit for "Half Life" and a local price in every default country
fn full_catalog() -> MemoryProvider {
    MemoryProvider::new()
        .with_game("US", "Half Life", half_life("USD", 999, 999))
        .with_game("RU", "Half-Life", half_life("RUB", 16900, 16900))
        .with_game("KZ", "Half-Life", half_life("KZT", 99000, 99000))
        .with_game("TR", "Half-Life", half_life("TRY", 4500, 4500))
        .with_game("PL", "Half-Life", half_life("PLN", 3599, 3599))
}

fn engine(provider: Arc<MemoryProvider>, oracle: Arc<MemoryCorrector>) -> PriceEngine {
    PriceEngine::with_parts(&EngineConfig::default(), provider, oracle, Arc::new(NoopObserver))
}

#[tokio::test]
async fn test_direct_hit_quotes_every_country() {
    let provider = Arc::new(full_catalog());
    let oracle = Arc::new(MemoryCorrector::new());
    let engine = engine(provider.clone(), oracle.clone());

    let result = assert_ok!(engine.lookup("Half Life").await);

    assert_eq!(result.game_id, 70);
    assert_eq!(result.game_name, "Half-Life");
    assert_eq!(result.country_codes(), vec!["RU", "KZ", "TR", "PL"]);
    assert!(result
        .quotes
        .iter()
        .all(|q| !q.game.price.as_ref().unwrap().has_discount()));

    let rates = CurrencyRateTable::default();
    for quote in &result.quotes {
        let price = quote.game.price.as_ref().unwrap();
        assert_eq!(
            quote.converted_reference,
            Some(rates.to_reference(price.final_major(), &price.currency))
        );
    }

    assert_eq!(oracle.call_count(), 0);
    // Fan-out starts from the canonical name
    assert!(provider
        .calls()
        .iter()
        .filter(|c| c.country != "US")
        .all(|c| c.query == "Half-Life"));
}

#[tokio::test]
async fn test_typo_goes_through_oracle() {
    let provider = Arc::new(
        MemoryProvider::new()
            .with_game("US", "Half-Life", half_life("USD", 999, 999))
            .with_game("TR", "Half-Life", half_life("TRY", 4500, 4500)),
    );
    let oracle = Arc::new(MemoryCorrector::new().with_correction("haf life", "Half-Life"));
    let engine = engine(provider.clone(), oracle.clone());

    let result = assert_ok!(engine.lookup("haf life").await);

    assert_eq!(oracle.call_count(), 1);
    assert_eq!(result.game_id, 70);
    assert_eq!(result.country_codes(), vec!["TR"]);

    // Corrected title equals the canonical name, so only canonical + original are tried
    let ru_queries: Vec<String> = provider.calls_for("RU").into_iter().map(|c| c.query).collect();
    assert_eq!(ru_queries, vec!["Half-Life", "haf life"]);
}

#[tokio::test]
async fn test_oracle_outage_falls_back_to_search() {
    let provider = Arc::new(MemoryProvider::new());
    let oracle = Arc::new(MemoryCorrector::unavailable());
    let observer = Arc::new(RecordingObserver::new());
    let engine = PriceEngine::with_parts(
        &EngineConfig::default(),
        provider.clone(),
        oracle,
        observer.clone(),
    );

    let err = assert_err!(engine.lookup("haf life").await);
    assert!(matches!(err, PriceEngineError::Resolution { .. }));

    let reply = assert_ok!(engine.handle("haf life").await);
    match &reply {
        Reply::SearchResults { hits } => assert!(hits.is_empty()),
        other => panic!("expected search fallback, got {:?}", other),
    }
    assert_eq!(engine.render(&reply), "❌ Nothing found.");
    assert!(observer
        .events()
        .iter()
        .any(|e| matches!(e, LookupEvent::FallbackSearch { .. })));

    // No country fan-out happened
    assert!(provider.calls().iter().all(|c| c.country == "US"));
}

#[tokio::test]
async fn test_transient_country_failure_is_silent() {
    let provider = Arc::new(full_catalog().failing_country("KZ"));
    let engine = engine(provider, Arc::new(MemoryCorrector::new()));

    let result = assert_ok!(engine.lookup("Half Life").await);

    assert_eq!(result.country_codes(), vec!["RU", "TR", "PL"]);
}

#[tokio::test]
async fn test_not_found_after_correction() {
    let oracle = Arc::new(MemoryCorrector::new().with_correction("qwertyuiop", "Qwerty Quest"));
    let engine = engine(Arc::new(MemoryProvider::new()), oracle);

    let reply = assert_ok!(engine.handle("qwertyuiop").await);

    match &reply {
        Reply::Prices(result) => {
            assert!(result.is_empty());
            assert_eq!(result.game_name, "Qwerty Quest");
        }
        other => panic!("expected prices reply, got {:?}", other),
    }
    assert_eq!(engine.render(&reply), NO_PRICES_MESSAGE);
}

#[tokio::test]
async fn test_rendered_offer() {
    let provider = Arc::new(
        MemoryProvider::new()
            .with_game("US", "Half Life", half_life("USD", 999, 999))
            .with_game("RU", "Half-Life", half_life("RUB", 16900, 16900))
            .with_game("TR", "Half-Life", half_life("TRY", 9000, 4500)),
    );
    let engine = engine(provider, Arc::new(MemoryCorrector::new()));

    let reply = assert_ok!(engine.handle("Half Life").await);

    assert_eq!(
        engine.render(&reply),
        "*Half-Life*\n\
         🇷🇺 - 169.00 RUB\n\
         🇹🇷 - Discounted 45.00 TRY (was 90.00 TRY) (~99 RUB)\n\
         https://store.steampowered.com/app/70"
    );
}

#[tokio::test]
async fn test_deadline_during_fan_out_keeps_partial_quotes() {
    let provider = Arc::new(full_catalog().with_delay("PL", Duration::from_secs(30)));
    let engine = engine(provider, Arc::new(MemoryCorrector::new()));

    let result = assert_ok!(engine.lookup_within("Half Life", Duration::from_millis(300)).await);

    assert_eq!(result.country_codes(), vec!["RU", "KZ", "TR"]);
}

#[tokio::test]
async fn test_deadline_during_resolution_is_fatal() {
    let provider = Arc::new(full_catalog().with_delay("US", Duration::from_secs(30)));
    let engine = engine(provider, Arc::new(MemoryCorrector::new()));

    let err = assert_err!(engine.lookup_within("Half Life", Duration::from_millis(50)).await);

    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_handle_deadline_during_resolution_skips_fallback() {
    let provider = Arc::new(full_catalog().with_delay("US", Duration::from_secs(30)));
    let engine = engine(provider.clone(), Arc::new(MemoryCorrector::new()));

    let started = std::time::Instant::now();
    let err = assert_err!(engine.handle_within("Half Life", Duration::from_millis(100)).await);

    assert!(matches!(err, PriceEngineError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
    // Only the aborted baseline lookup, no plain search afterwards
    assert_eq!(provider.calls_for("US").len(), 1);
}

#[tokio::test]
async fn test_handle_deadline_bounds_fallback_search() {
    // Resolution fails on the oracle after one slow lookup; the plain search would end past the deadline
    let provider = Arc::new(MemoryProvider::new().with_delay("US", Duration::from_millis(300)));
    let engine = engine(provider.clone(), Arc::new(MemoryCorrector::unavailable()));

    let started = std::time::Instant::now();
    let err = assert_err!(engine.handle_within("haf life", Duration::from_millis(450)).await);

    assert!(matches!(err, PriceEngineError::Cancelled));
    assert!(started.elapsed() < Duration::from_millis(600));
    assert_eq!(provider.calls_for("US").len(), 2);
}

#[tokio::test]
async fn test_search_fallback_lists_results() {
    let provider = Arc::new(
        MemoryProvider::new()
            .with_game("US", "portal", Game::new(400, "Portal").with_price(Money::new("USD", 999, 999)))
            .with_game("US", "portal", Game::new(620, "Portal 2").with_price(Money::new("USD", 999, 199))),
    );
    let engine = engine(provider, Arc::new(MemoryCorrector::new()));

    let hits = assert_ok!(engine.search("portal").await);
    let text = engine.formatter().format_search_results(&hits);

    assert_eq!(hits.len(), 2);
    assert!(text.contains("🎮 *Portal*\n💰 9.99 USD"));
    assert!(text.contains("🎮 *Portal 2*\n💰 1.99 USD"));
}

#[tokio::test]
#[ignore] // Requires network access and OPENAI_API_KEY
async fn test_live_lookup() {
    let config = EngineConfig::default().apply_env_overrides();
    let engine = PriceEngine::from_config(&config).unwrap();

    let result = engine.lookup("half life").await.unwrap();
    assert!(result.game_name.to_lowercase().contains("half"));
}
