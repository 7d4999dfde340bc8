//! HTTP router, shared state and server lifecycle.

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::external::{QuoteClient, WeatherClient};
use crate::store::{self, SharedTaskStore};

use super::lookups;
use super::tasks;
use super::types::HealthResponse;
use super::views::Views;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Task storage, injected so each request works against the same handle
    pub store: SharedTaskStore,
    /// Source of "today" for status derivation
    pub clock: Arc<dyn Clock>,
    pub views: Views,
    pub weather: WeatherClient,
    pub quotes: QuoteClient,
}

impl AppState {
    /// Build the state around an existing store and clock.
    pub fn new(
        config: Config,
        store: SharedTaskStore,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let weather = WeatherClient::new(config.weather.clone(), config.http_timeout)?;
        let quotes = QuoteClient::new(config.quotes_url.clone(), config.http_timeout)?;
        Ok(Self {
            views: Views::new()?,
            config,
            store,
            clock,
            weather,
            quotes,
        })
    }
}

/// Assemble the full router.
pub fn app(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health))
        .merge(tasks::routes())
        .merge(lookups::routes())
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store = store::create_task_store(config.store_type, config.db_path.clone()).await?;
    if store.is_persistent() {
        tracing::info!("Task store: SQLite at {}", config.db_path.display());
    } else {
        tracing::warn!("Task store: in-memory, tasks will be lost on restart");
    }
    if config.weather.api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set; weather lookups will report an error");
    }

    let state = Arc::new(AppState::new(config.clone(), store, Arc::new(SystemClock))?);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGTERM/SIGINT.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        persistent_store: state.store.is_persistent(),
        weather_enabled: state.weather.is_configured(),
    })
}
