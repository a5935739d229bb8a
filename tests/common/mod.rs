//! Shared harness: the real router served on an ephemeral port over a
//! throwaway database file.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::Router;
use ticklist::api::{self, AppState};
use ticklist::store::TodoStore;

static NEXT_DB: AtomicU32 = AtomicU32::new(0);

/// A running server plus a direct handle on its store, so tests can look
/// behind the HTTP surface.
pub struct TestApp {
    pub addr: SocketAddr,
    pub store: TodoStore,
    db_path: String,
}

impl TestApp {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

/// Open a fresh store and serve the real router over it.
pub async fn spawn_app() -> TestApp {
    let db_path = format!(
        "/tmp/ticklist_it_{}_{}.redb",
        std::process::id(),
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    );
    let _ = std::fs::remove_file(&db_path);

    let store = TodoStore::open(&db_path).expect("Failed to open test database");
    let app = api::router(Arc::new(AppState {
        store: store.clone(),
    }));
    let addr = spawn_router(app).await;

    TestApp {
        addr,
        store,
        db_path,
    }
}

/// Serve any router on 127.0.0.1:0, returning the bound address.
pub async fn spawn_router(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has a local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server exited");
    });
    addr
}
