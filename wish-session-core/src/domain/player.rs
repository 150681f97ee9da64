use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the transport session a player joined on.
///
/// This is the source of player identity; the nickname is display-only.
pub type ConnectionId = Uuid;

/// Maximum number of wishes a player may submit per round.
pub const MAX_WISHES: usize = 3;

/// Errors that can occur when creating a player
#[derive(Debug, thiserror::Error, PartialEq, Serialize, Deserialize)]
pub enum PlayerError {
    #[error("nickname cannot be empty")]
    EmptyNickname,

    #[error("nickname must be between 1 and 50 characters")]
    InvalidNicknameLength,
}

/// Domain entity representing a connected player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Transport connection this player joined on
    id: ConnectionId,
    /// Display name (unique within the session)
    nickname: String,
    /// Connection ID of the assigned master, set by role assignment
    master_id: Option<ConnectionId>,
    /// Cached nickname of the assigned master (denormalized for the client view)
    master_name: Option<String>,
    /// Submitted wishes, append-only, at most MAX_WISHES
    wishes: Vec<String>,
}

impl Player {
    /// Create a new player with no master and no wishes
    pub fn new(id: ConnectionId, nickname: String) -> Result<Self, PlayerError> {
        Self::validate_nickname(&nickname)?;

        Ok(Player {
            id,
            nickname,
            master_id: None,
            master_name: None,
            wishes: Vec::new(),
        })
    }

    /// Validate nickname according to business rules
    fn validate_nickname(nickname: &str) -> Result<(), PlayerError> {
        if nickname.is_empty() {
            return Err(PlayerError::EmptyNickname);
        }

        if nickname.chars().count() > 50 {
            return Err(PlayerError::InvalidNicknameLength);
        }

        Ok(())
    }

    // Getters

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn master_id(&self) -> Option<ConnectionId> {
        self.master_id
    }

    pub fn master_name(&self) -> Option<&str> {
        self.master_name.as_deref()
    }

    pub fn wishes(&self) -> &[String] {
        &self.wishes
    }

    /// Check if this player has been assigned a master
    pub fn has_master(&self) -> bool {
        self.master_id.is_some()
    }

    // State mutations

    /// Record the assigned master for this round
    pub fn assign_master(&mut self, master_id: ConnectionId, master_name: String) {
        self.master_id = Some(master_id);
        self.master_name = Some(master_name);
    }

    /// Drop any master assignment (round reset)
    pub fn clear_master(&mut self) {
        self.master_id = None;
        self.master_name = None;
    }

    /// Append a wish, returning false once the capacity is reached.
    /// Excess wishes are dropped, not an error.
    pub fn add_wish(&mut self, wish: String) -> bool {
        if self.wishes.len() >= MAX_WISHES {
            return false;
        }

        self.wishes.push(wish);
        true
    }
}
