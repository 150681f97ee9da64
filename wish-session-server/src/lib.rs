pub mod config;
pub mod error;
pub mod registry;
pub mod route;
pub mod session_task;
pub mod websocket_listener;

pub use config::Config;
pub use error::ServerError;
pub use registry::{ClientRegistry, WsClientRegistry};
pub use route::{create_session_route, AppState};
pub use session_task::{spawn_coordinator, CoordinatorHandle};
