pub mod player;
pub mod roles;
pub mod session;

pub use player::{ConnectionId, Player, PlayerError, MAX_WISHES};
pub use roles::assign_roles;
pub use session::{Departure, JoinOutcome, Phase, Session, SessionError, WishOutcome, MIN_PLAYERS};
