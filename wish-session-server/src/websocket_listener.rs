use crate::registry::ClientRegistry;
use crate::route::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::WebSocketUpgrade;
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use wish_session_core::{ClientEvent, Command, ConnectionId};

const OUTBOUND_BUFFER: usize = 10;

pub async fn handle_websocket(ws: WebSocketUpgrade, state: AppState) -> impl IntoResponse {
    debug!("new WebSocket upgrade request");
    ws.on_upgrade(move |socket| listen(socket, state))
}

#[instrument(skip(socket, state), fields(connection_id))]
async fn listen(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    info!(%connection_id, "WebSocket connection established");

    let (ws_sender, ws_receiver) = socket.split();
    let (tx, rx) = tokio::sync::mpsc::channel(OUTBOUND_BUFFER);
    state.registry.register(connection_id, tx).await;

    let sender_task = handle_outgoing_messages(rx, ws_sender);
    let receiver_task = handle_incoming_messages(ws_receiver, connection_id, &state);

    tokio::select! {
        _ = sender_task => {
            info!(%connection_id, "sender task completed");
        }
        _ = receiver_task => {
            info!(%connection_id, "receiver task completed");
        }
    }

    // The disconnect command must run after the registry drop so the
    // departed client never receives its own departure broadcast.
    state.registry.unregister(connection_id).await;
    state
        .coordinator
        .submit(Command::Disconnect { connection_id })
        .await;
}

#[instrument(skip(rx, ws_sender))]
async fn handle_outgoing_messages(
    mut rx: Receiver<Message>,
    mut ws_sender: SplitSink<WebSocket, Message>,
) {
    while let Some(msg) = rx.recv().await {
        debug!(?msg, "sending message");
        if let Err(e) = ws_sender.send(msg).await {
            error!(error = ?e, "failed to send message");
            break;
        }
    }
}

#[instrument(skip(receiver, state))]
async fn handle_incoming_messages(
    mut receiver: SplitStream<WebSocket>,
    connection_id: ConnectionId,
    state: &AppState,
) {
    while let Some(message) = receiver.next().await {
        match message {
            Ok(message) => {
                if !handle_message(message, connection_id, state).await {
                    break;
                }
            }
            Err(e) => {
                error!(error = ?e, "failed to receive message");
                break;
            }
        }
    }
}

/// Handle one inbound frame; returns false once the connection should
/// be torn down.
async fn handle_message(message: Message, connection_id: ConnectionId, state: &AppState) -> bool {
    match message {
        Message::Text(text) => {
            debug!(%connection_id, ?text, "handling text message");
            match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => {
                    state.coordinator.submit(into_command(connection_id, event)).await;
                }
                Err(e) => {
                    // Malformed input is ignored, not an error surface.
                    warn!(%connection_id, error = %e, "dropping unparsable message");
                }
            }
            true
        }
        Message::Close(_) => {
            info!(%connection_id, "client closed the connection");
            false
        }
        Message::Ping(_) | Message::Pong(_) => true,
        other => {
            warn!(%connection_id, message = ?other, "unsupported message type");
            true
        }
    }
}

fn into_command(connection_id: ConnectionId, event: ClientEvent) -> Command {
    match event {
        ClientEvent::Join { nickname } => Command::Join {
            connection_id,
            nickname,
        },
        ClientEvent::AddWish { wish } => Command::AddWish {
            connection_id,
            wish,
        },
    }
}
