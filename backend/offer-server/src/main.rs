//! Offer form server: entry point.
//!
//! Hosts one offer form session. Edits arrive as JSON commands over a small
//! Axum REST API; a background task writes the draft to SQLite once edits go
//! quiet, and the draft is restored on the next start.

mod api;
mod autosave;
mod config;
mod db;
mod errors;
mod persistence;
mod session;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use autosave::AutosaveTiming;
use config::Config;
use persistence::{DraftStore, SqliteDraftStore};
use session::FormSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let pool = db::init_pool(&config.database_url).await?;
    let drafts: Arc<dyn DraftStore> = Arc::new(SqliteDraftStore::new(pool));

    // ─── Background autosave ──────────────────────────────
    let (feed, autosave) = autosave::spawn(
        drafts.clone(),
        config.draft_key.clone(),
        AutosaveTiming {
            debounce: config.autosave_debounce,
            indicator: config.saved_indicator,
        },
    );

    let session = FormSession::open(&config, drafts, feed).await;

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(api::ApiState {
        session: Mutex::new(session),
        saved: autosave.indicator(),
    });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/form", get(api::get_form))
        .route("/form/commands", post(api::apply_command))
        .route("/form/validation", get(api::get_validation))
        .route("/form/progress", get(api::get_progress))
        .route("/form/submit", post(api::submit))
        .route("/form/reset", post(api::reset))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api_state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;

    autosave.shutdown().await;
    Ok(())
}
