use crate::domain::ConnectionId;
use serde::{Deserialize, Serialize};

/// Messages a client sends over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Request to join under a nickname
    Join { nickname: String },

    /// Submit a wish for the current round
    AddWish { wish: String },
}

/// Messages the coordinator sends to clients.
///
/// Field names follow the original wire format the browser client
/// expects (`isGameStarted`, `masterName`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Informational text, broadcast or unicast depending on context
    GameStatus { message: String },

    /// Personalized round-start notification, one per player
    StartGame {
        #[serde(rename = "isGameStarted")]
        is_game_started: bool,
        #[serde(rename = "masterName")]
        master_name: String,
    },
}

/// Delivery target for an outbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every connected client
    All,
    /// A single connection
    Client(ConnectionId),
}

/// An event addressed to its recipient, as emitted by the coordinator
/// and delivered by the transport's client registry
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub recipient: Recipient,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn broadcast(event: ServerEvent) -> Self {
        Outbound {
            recipient: Recipient::All,
            event,
        }
    }

    pub fn unicast(connection_id: ConnectionId, event: ServerEvent) -> Self {
        Outbound {
            recipient: Recipient::Client(connection_id),
            event,
        }
    }
}
