use crate::domain::ConnectionId;

/// Commands that can be executed on the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A connection asks to join the game under a nickname
    Join {
        connection_id: ConnectionId,
        nickname: String,
    },

    /// A joined player submits a wish
    AddWish {
        connection_id: ConnectionId,
        wish: String,
    },

    /// The transport lost the connection
    Disconnect { connection_id: ConnectionId },
}
