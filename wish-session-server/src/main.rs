use std::sync::Arc;

use tracing::info;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;
use wish_session_server::{create_session_route, spawn_coordinator, AppState, Config, WsClientRegistry};

#[tokio::main]
pub async fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wish_session_core=debug,wish_session_server=debug"));

    fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .with_ansi(true)
        .init();

    let config = Config::from_env();
    let addr = config.socket_addr();

    let registry = Arc::new(WsClientRegistry::new());
    let coordinator = spawn_coordinator(registry.clone());
    let app = create_session_route(AppState {
        registry,
        coordinator,
    });

    // Bind failure is fatal; there is no recovery path at startup.
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen port");
    info!(%addr, "wish session server listening");

    axum::serve(listener, app)
        .await
        .expect("server task failed");
}
