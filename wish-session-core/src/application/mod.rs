mod commands;
mod coordinator;
mod events;

pub use commands::Command;
pub use coordinator::Coordinator;
pub use events::{ClientEvent, Outbound, Recipient, ServerEvent};
