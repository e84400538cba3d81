//! Standalone WebSocket game server.
//!
//! Configuration comes from the environment:
//! - `CARDROOM_ADDR`: listen address, default `0.0.0.0:8080`
//! - `CARDROOM_SETS`: directory of card-set JSON files, default `./sets`
//! - `CARDROOM_SET`: set every room's game plays with, default `set1`
//! - `RUST_LOG`: tracing filter, default `info`

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cardroom::cards::load_dir;
use cardroom::server::{router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let sets_dir = std::env::var("CARDROOM_SETS").unwrap_or_else(|_| "./sets".to_string());
    let set = std::env::var("CARDROOM_SET").unwrap_or_else(|_| "set1".to_string());
    let registry = load_dir(&sets_dir).expect("failed to load card sets");
    if !registry.contains_set(&set) {
        warn!(set = %set, dir = %sets_dir, "configured set not found, every deck will be rejected");
    }

    let addr: SocketAddr = std::env::var("CARDROOM_ADDR")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

    let app = router(AppState::shared(registry, set));

    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app).await.expect("server error");
}
