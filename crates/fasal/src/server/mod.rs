//! HTTP facade over the diagnosis pipeline.
//!
//! | Method | Path            | Handler                |
//! |--------|-----------------|------------------------|
//! | GET    | `/`             | [`handlers::health`]   |
//! | POST   | `/api/diagnose` | [`handlers::diagnose`] |
//! | GET    | `/api/crops`    | [`handlers::crops`]    |

mod error;
mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use fasal_core::config::ServerConfig;
use fasal_core::Diagnoser;
use tokio::signal;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Shared, read-only state for all requests.
pub struct AppState {
    pub diagnoser: Arc<Diagnoser>,
}

/// Build the router with body limits, tracing and CORS applied.
pub fn build_app(state: Arc<AppState>, config: &ServerConfig) -> Router {
    let max_payload_size = config.max_upload_bytes();

    Router::new()
        .route("/", get(handlers::health))
        .route("/api/diagnose", post(handlers::diagnose))
        .route("/api/crops", get(handlers::crops))
        .layer(DefaultBodyLimit::max(max_payload_size))
        .layer(RequestBodyLimitLayer::new(max_payload_size))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &ServerConfig, diagnoser: Arc<Diagnoser>) -> anyhow::Result<()> {
    let state = Arc::new(AppState { diagnoser });
    let app = build_app(state, config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("FasalRakshak API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}

/// Any origin when the list is empty, otherwise exactly the listed origins.
fn create_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    use tower_http::cors::Any;

    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    };

    cors.max_age(Duration::from_secs(3600))
}
