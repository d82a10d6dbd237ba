//! PhishGuard analysis server
//!
//! Accepts a URL over HTTP, gathers heuristic and third-party evidence
//! about it (liveness probe, monitoring reputation, lexical features,
//! WHOIS domain age), asks a hosted language model for a verdict, and
//! answers with the verdict plus the supporting findings.
//!
//! ```text
//! POST /analyze ──► normalize ──► gather evidence ──► adjudicate ──► JSON
//!                                 │ liveness probe
//!                                 │ reputation lookup
//!                                 │ lexical features
//!                                 └ WHOIS domain age
//! ```

mod analysis;
mod config;
mod error;
mod handlers;
mod models;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phishguard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("PhishGuard server starting...");
    if config.ai_enabled() {
        tracing::info!("Gemini API key found. AI analysis is ENABLED.");
    } else {
        tracing::warn!("Gemini API key not found. AI analysis is DISABLED.");
    }
    if config.monitoring_enabled() {
        tracing::info!("UptimeRobot API key found. Reputation lookup is ENABLED.");
    } else {
        tracing::warn!("UptimeRobot API key not found. Reputation lookup is DISABLED.");
    }

    let analyzer = analysis::Analyzer::new(&config)?;

    let state = AppState {
        analyzer,
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: analysis::Analyzer,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Cross-origin access is restricted to the configured allow-list,
    // and only for the analysis route.
    let allowed_origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let analyze_routes = Router::new()
        .route("/analyze", post(handlers::analyze::analyze))
        .layer(cors);

    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(analyze_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
