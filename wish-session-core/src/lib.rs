pub mod application;
pub mod domain;

pub use application::{ClientEvent, Command, Coordinator, Outbound, Recipient, ServerEvent};
pub use domain::{
    ConnectionId, Phase, Player, PlayerError, Session, SessionError, MAX_WISHES, MIN_PLAYERS,
};
