use std::sync::Arc;

use ticklist::api::{self, AppState, SharedState};
use ticklist::config::Config;
use ticklist::store::TodoStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // ── Tracing ────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ticklist=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── Store ──────────────────────────────────────────────────
    let config = Config::from_env();
    let store = TodoStore::open(&config.db_path).expect("Failed to open todo database");

    let count = store.list().expect("Failed to read todo table").len();
    tracing::info!("Store ready: {} todos in {}", count, config.db_path);

    // ── Shared state ───────────────────────────────────────────
    let state: SharedState = Arc::new(AppState { store });

    // ── Start ──────────────────────────────────────────────────
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await.unwrap();
    tracing::info!("Server running on http://{}", config.bind);
    tracing::info!("  List:   GET    /todos");
    tracing::info!("  Create: POST   /todos");
    tracing::info!("  Delete: DELETE /todos/:id");
    tracing::info!("  Toggle: PATCH  /todos/:id");

    axum::serve(listener, app).await.unwrap();
}
