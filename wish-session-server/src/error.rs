/// Transport-level failures.
///
/// Game rejections are never errors; they travel to the client as
/// `game_status` text.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid message payload")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("client channel closed: {0}")]
    ChannelClosed(String),
}
