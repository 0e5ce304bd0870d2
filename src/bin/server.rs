use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use game_price_engine::{EngineConfig, PriceEngine, PriceEngineError, Reply, SearchHit};

#[derive(Clone)]
struct AppState {
    engine: Arc<PriceEngine>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct QueryRequest {
    query: String,
}

#[derive(Debug, Serialize)]
struct PricesResponse {
    reply: Reply,
    text: String,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    hits: Vec<SearchHit>,
    text: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_price_server=debug,game_price_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => EngineConfig::from_yaml_file(&path)?,
        Err(_) => EngineConfig::default(),
    }
    .apply_env_overrides();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8090);
    let timeout_secs = std::env::var("LOOKUP_TIMEOUT_SECS")
        .ok()
        .and_then(|t| t.parse::<u64>().ok())
        .unwrap_or(20);

    tracing::info!("🚀 Starting game price server");
    tracing::info!("🌍 Countries: {}", config.countries.iter().map(|c| c.code.as_str()).collect::<Vec<_>>().join(", "));
    tracing::info!("🔌 Port: {}", port);

    let state = AppState {
        engine: Arc::new(PriceEngine::from_config(&config)?),
        timeout: Duration::from_secs(timeout_secs),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/prices", post(prices_handler))
        .route("/v1/search", post(search_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("🎮 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: game_price_engine::VERSION.to_string(),
    })
}

async fn prices_handler(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<PricesResponse>, AppError> {
    tracing::debug!("Prices request: {:?}", req);

    let reply = state.engine.handle_within(&req.query, state.timeout).await?;
    let text = state.engine.render(&reply);

    Ok(Json(PricesResponse { reply, text }))
}

async fn search_handler(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = game_price_engine::validate_query(&req.query)?;
    let hits = state.engine.search(query).await?;
    let text = state.engine.formatter().format_search_results(&hits);

    Ok(Json(SearchResponse { hits, text }))
}

// Error handling
struct AppError(PriceEngineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PriceEngineError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            PriceEngineError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
            PriceEngineError::Provider { .. }
            | PriceEngineError::Oracle(_)
            | PriceEngineError::Resolution { .. }
            | PriceEngineError::HttpRequest(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.0.to_string();

        tracing::error!("❌ Error: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<PriceEngineError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
