use crate::registry::ClientRegistry;
use std::sync::Arc;
use tokio::sync::mpsc::{self, Sender};
use tracing::{debug, error, info};
use wish_session_core::{Command, Coordinator};

const COMMAND_BUFFER: usize = 64;

/// Cloneable handle for submitting commands to the coordinator task
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: Sender<Command>,
}

impl CoordinatorHandle {
    /// Queue a command for the coordinator. Dropped (with a log) if
    /// the coordinator task has shut down.
    pub async fn submit(&self, command: Command) {
        if let Err(e) = self.tx.send(command).await {
            error!(error = %e, "coordinator task is gone, command dropped");
        }
    }
}

/// Spawn the single coordinator task.
///
/// The task owns the `Coordinator` and consumes commands one at a
/// time, so every join/add_wish/disconnect runs to completion before
/// the next is processed. Outbound events go to the client registry.
pub fn spawn_coordinator(registry: Arc<dyn ClientRegistry>) -> CoordinatorHandle {
    let (tx, mut rx) = mpsc::channel(COMMAND_BUFFER);

    tokio::spawn(async move {
        let mut coordinator = Coordinator::new();
        info!("coordinator task started");

        while let Some(command) = rx.recv().await {
            debug!(?command, "processing command");
            for outbound in coordinator.handle(command) {
                registry.deliver(&outbound).await;
            }
        }

        info!("coordinator task stopped");
    });

    CoordinatorHandle { tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::WsClientRegistry;
    use axum::extract::ws::Message;
    use tokio::sync::mpsc::channel;
    use uuid::Uuid;

    async fn next_json(rx: &mut tokio::sync::mpsc::Receiver<Message>) -> serde_json::Value {
        let Some(Message::Text(text)) = rx.recv().await else {
            panic!("expected a text frame");
        };
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn test_two_joins_drive_a_full_round_start() {
        let registry = Arc::new(WsClientRegistry::new());
        let handle = spawn_coordinator(registry.clone());

        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let (alice_tx, mut alice_rx) = channel(8);
        let (bob_tx, mut bob_rx) = channel(8);
        registry.register(alice, alice_tx).await;
        registry.register(bob, bob_tx).await;

        handle
            .submit(Command::Join {
                connection_id: alice,
                nickname: "Alice".to_string(),
            })
            .await;
        handle
            .submit(Command::Join {
                connection_id: bob,
                nickname: "Bob".to_string(),
            })
            .await;

        // Both clients are registered up front, so each hears both
        // join broadcasts followed by its own personalized start_game.
        let first = next_json(&mut alice_rx).await;
        assert_eq!(first["type"], "game_status");
        let second = next_json(&mut alice_rx).await;
        assert_eq!(second["type"], "game_status");
        let start = next_json(&mut alice_rx).await;
        assert_eq!(start["type"], "start_game");
        assert_eq!(start["isGameStarted"], true);
        assert_eq!(start["masterName"], "Bob");

        next_json(&mut bob_rx).await;
        next_json(&mut bob_rx).await;
        let start = next_json(&mut bob_rx).await;
        assert_eq!(start["type"], "start_game");
        assert_eq!(start["masterName"], "Alice");
    }

    #[tokio::test]
    async fn test_disconnect_triggers_reset_broadcast() {
        let registry = Arc::new(WsClientRegistry::new());
        let handle = spawn_coordinator(registry.clone());

        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let (alice_tx, _alice_rx) = channel(8);
        let (bob_tx, mut bob_rx) = channel(8);
        registry.register(alice, alice_tx).await;
        registry.register(bob, bob_tx).await;

        handle
            .submit(Command::Join {
                connection_id: alice,
                nickname: "Alice".to_string(),
            })
            .await;
        handle
            .submit(Command::Join {
                connection_id: bob,
                nickname: "Bob".to_string(),
            })
            .await;

        registry.unregister(alice).await;
        handle
            .submit(Command::Disconnect {
                connection_id: alice,
            })
            .await;

        // Skip the two join broadcasts and Bob's start_game.
        next_json(&mut bob_rx).await;
        next_json(&mut bob_rx).await;
        next_json(&mut bob_rx).await;

        let left = next_json(&mut bob_rx).await;
        assert_eq!(left["type"], "game_status");
        assert!(left["message"]
            .as_str()
            .unwrap()
            .contains("Alice left the game"));

        let reset = next_json(&mut bob_rx).await;
        assert!(reset["message"].as_str().unwrap().contains("reset"));
    }
}
