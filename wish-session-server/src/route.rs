use crate::registry::WsClientRegistry;
use crate::session_task::CoordinatorHandle;
use crate::websocket_listener;
use axum::extract::WebSocketUpgrade;
use axum::{routing::get, Router};
use std::sync::Arc;
use tracing::debug;

/// Shared handles every connection task needs
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<WsClientRegistry>,
    pub coordinator: CoordinatorHandle,
}

pub fn create_session_route(state: AppState) -> Router {
    debug!("creating session route");
    Router::new().route(
        "/session",
        get(move |ws: WebSocketUpgrade| {
            debug!("received WebSocket upgrade request");
            websocket_listener::handle_websocket(ws, state.clone())
        }),
    )
}
