use crate::domain::roles::assign_roles;
use crate::domain::{ConnectionId, Player, PlayerError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum roster size for a round to run
pub const MIN_PLAYERS: usize = 2;

/// Two-valued game phase gating new joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Accepting joins, roles not assigned
    Waiting,
    /// Roles assigned, no new joins
    Started,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Waiting => write!(f, "Waiting"),
            Phase::Started => write!(f, "Started"),
        }
    }
}

/// Errors that can occur in session operations.
///
/// The Display text of each variant is the user-facing rejection
/// message delivered over `game_status`.
#[derive(Debug, thiserror::Error, PartialEq, Serialize, Deserialize)]
pub enum SessionError {
    #[error("the game has already started, please wait for the next round")]
    GameAlreadyStarted,

    #[error("the nickname \"{0}\" is already taken, please choose another")]
    NicknameTaken(String),

    #[error("player error: {0}")]
    Player(#[from] PlayerError),
}

/// What a successful join did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Joined; still waiting for more players
    Waiting,
    /// Joined, and this join started the round (roles are assigned)
    Started,
}

/// What happened to a submitted wish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishOutcome {
    /// Appended to the player's wish list
    Recorded,
    /// Player already holds the maximum number of wishes; dropped
    AtCapacity,
    /// No player on that connection; ignored
    UnknownConnection,
}

/// Result of removing a player from the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Nickname of the departed player
    pub nickname: String,
    /// Roster size right after the removal, before any wipe
    pub remaining: usize,
    /// True if the removal dropped the roster below MIN_PLAYERS,
    /// wiping the roster and resetting the phase
    pub reset: bool,
}

/// Session aggregate root: the ordered roster and the game phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Connected players in join order
    roster: Vec<Player>,
    /// Current game phase
    phase: Phase,
}

impl Session {
    /// Create an empty session in the Waiting phase
    pub fn new() -> Self {
        Session {
            roster: Vec::new(),
            phase: Phase::Waiting,
        }
    }

    // ===== Getters =====

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase == Phase::Started
    }

    /// All players in join order
    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Look up a player by connection
    pub fn player(&self, id: ConnectionId) -> Option<&Player> {
        self.roster.iter().find(|p| p.id() == id)
    }

    /// Check whether a nickname is held by a connected player
    /// (case-sensitive exact match)
    pub fn contains_nickname(&self, nickname: &str) -> bool {
        self.roster.iter().any(|p| p.nickname() == nickname)
    }

    // ===== Player lifecycle =====

    /// Admit a player with the production RNG
    pub fn join(
        &mut self,
        id: ConnectionId,
        nickname: String,
    ) -> Result<JoinOutcome, SessionError> {
        self.join_with_rng(id, nickname, &mut rand::thread_rng())
    }

    /// Admit a player into the session.
    ///
    /// The phase is checked here, atomically with nickname uniqueness,
    /// so a connection that sends its join after the round begins is
    /// rejected rather than admitted into a running game.
    ///
    /// Once the roster reaches MIN_PLAYERS the phase flips to Started
    /// and roles are assigned over the whole roster.
    pub fn join_with_rng<R: Rng + ?Sized>(
        &mut self,
        id: ConnectionId,
        nickname: String,
        rng: &mut R,
    ) -> Result<JoinOutcome, SessionError> {
        if self.phase == Phase::Started {
            return Err(SessionError::GameAlreadyStarted);
        }

        if self.contains_nickname(&nickname) {
            return Err(SessionError::NicknameTaken(nickname));
        }

        let player = Player::new(id, nickname)?;
        tracing::info!(player = %player.nickname(), count = self.roster.len() + 1, "player joined");
        self.roster.push(player);

        if self.roster.len() >= MIN_PLAYERS {
            self.phase = Phase::Started;
            assign_roles(&mut self.roster, rng);
            tracing::info!(count = self.roster.len(), "game started, roles assigned");
            return Ok(JoinOutcome::Started);
        }

        Ok(JoinOutcome::Waiting)
    }

    /// Append a wish to the player on the given connection.
    ///
    /// Unknown connections and wishes beyond capacity are silent
    /// no-ops; the outcome exists for logging only.
    pub fn add_wish(&mut self, id: ConnectionId, wish: String) -> WishOutcome {
        let Some(player) = self.roster.iter_mut().find(|p| p.id() == id) else {
            return WishOutcome::UnknownConnection;
        };

        if player.add_wish(wish) {
            tracing::debug!(player = %player.nickname(), wishes = player.wishes().len(), "wish recorded");
            WishOutcome::Recorded
        } else {
            WishOutcome::AtCapacity
        }
    }

    /// Remove the player on the given connection, if any.
    ///
    /// When the post-removal roster drops below MIN_PLAYERS, all
    /// remaining players are dropped too and the phase resets to
    /// Waiting (full-roster wipe, not selective).
    pub fn disconnect(&mut self, id: ConnectionId) -> Option<Departure> {
        let index = self.roster.iter().position(|p| p.id() == id)?;
        let player = self.roster.remove(index);
        let remaining = self.roster.len();

        tracing::info!(player = %player.nickname(), remaining, "player left");

        let reset = remaining < MIN_PLAYERS;
        if reset {
            self.roster.clear();
            self.phase = Phase::Waiting;
            tracing::info!("not enough players, game reset");
        }

        Some(Departure {
            nickname: player.nickname().to_owned(),
            remaining,
            reset,
        })
    }
}

impl Session {
    /// Build a session from explicit state (for tests)
    #[cfg(test)]
    pub(crate) fn with_state(roster: Vec<Player>, phase: Phase) -> Self {
        Session { roster, phase }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
