use crate::error::ServerError;
use async_trait::async_trait;
use axum::extract::ws::Message;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc::Sender, RwLock};
use tracing::{debug, error, instrument};
use wish_session_core::{ConnectionId, Outbound, Recipient, ServerEvent};

/// Registry of connected clients, keyed by connection.
///
/// The coordinator addresses clients only through this trait; the
/// transport mechanism stays behind it.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    async fn register(&self, id: ConnectionId, sender: Sender<Message>);
    async fn unregister(&self, id: ConnectionId);
    async fn send_to(&self, id: ConnectionId, event: &ServerEvent) -> Result<(), ServerError>;
    async fn broadcast(&self, event: &ServerEvent);

    /// Deliver one addressed event. Fire-and-forget: a failed unicast
    /// is logged, never propagated.
    async fn deliver(&self, outbound: &Outbound) {
        match outbound.recipient {
            Recipient::All => self.broadcast(&outbound.event).await,
            Recipient::Client(id) => {
                if let Err(e) = self.send_to(id, &outbound.event).await {
                    error!(client_id = %id, error = %e, "failed to deliver event");
                }
            }
        }
    }
}

/// WebSocket-backed registry holding one outbound channel per client
#[derive(Debug, Clone, Default)]
pub struct WsClientRegistry {
    clients: Arc<RwLock<HashMap<ConnectionId, Sender<Message>>>>,
}

impl WsClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    fn encode(event: &ServerEvent) -> Result<Message, ServerError> {
        let text = serde_json::to_string(event)?;
        Ok(Message::Text(text))
    }
}

#[async_trait]
impl ClientRegistry for WsClientRegistry {
    #[instrument(skip(self, sender))]
    async fn register(&self, id: ConnectionId, sender: Sender<Message>) {
        debug!(client_id = %id, "registering client");
        self.clients.write().await.insert(id, sender);
    }

    #[instrument(skip(self))]
    async fn unregister(&self, id: ConnectionId) {
        debug!(client_id = %id, "unregistering client");
        self.clients.write().await.remove(&id);
    }

    async fn send_to(&self, id: ConnectionId, event: &ServerEvent) -> Result<(), ServerError> {
        let message = Self::encode(event)?;

        let clients = self.clients.read().await;
        let Some(sender) = clients.get(&id) else {
            // Client already gone; nothing to deliver.
            return Ok(());
        };

        sender
            .send(message)
            .await
            .map_err(|e| ServerError::ChannelClosed(e.to_string()))
    }

    async fn broadcast(&self, event: &ServerEvent) {
        let message = match Self::encode(event) {
            Ok(m) => m,
            Err(e) => {
                error!(error = %e, "failed to encode broadcast event");
                return;
            }
        };

        // Fan-out never waits on any one client: a full or closed
        // outbound buffer drops that client's copy, and the read lock
        // is never held across an await.
        let clients = self.clients.read().await;
        for (id, sender) in clients.iter() {
            if let Err(e) = sender.try_send(message.clone()) {
                error!(client_id = %id, error = %e, "broadcast delivery failed, event dropped");
            }
        }
    }
}
