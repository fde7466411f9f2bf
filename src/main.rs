//! Daily word webhook
//!
//! Answers chat-platform events with a rotating vocabulary word per
//! conversation and acknowledges practice sentences that use it.

mod api;
mod catalog;
mod compose;
mod config;
mod inbound;
mod progress;
mod responder;
mod rotation;

use api::{create_router, AppState};
use catalog::Catalog;
use config::Config;
use progress::ProgressStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daily_word=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();

    let state = AppState::new(
        Catalog::load(&config.words_path),
        ProgressStore::open(&config.progress_path),
    );

    let catalog = state.rotation.catalog();
    tracing::info!(
        path = %config.words_path.display(),
        words = catalog.len(),
        source = ?catalog.source(),
        "Word catalog loaded"
    );

    let progress = state.rotation.progress();
    tracing::info!(
        path = %progress.path().display(),
        conversations = progress.len(),
        "Progress store opened"
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = config.addr();
    tracing::info!("Daily word webhook listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush conversations created by replies that never advanced a cursor
    state.rotation.progress().save()?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
