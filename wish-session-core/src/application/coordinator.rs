use crate::application::{Command, Outbound, ServerEvent};
use crate::domain::{ConnectionId, JoinOutcome, Session, WishOutcome};
use rand::Rng;

/// Session coordinator: processes player lifecycle commands against
/// the single session and emits addressed outbound events.
///
/// The coordinator never touches the transport; delivery is the
/// client registry's concern. Each `handle` call runs to completion
/// before the next, so all state transitions are atomic with respect
/// to each other as long as the caller serializes commands.
#[derive(Debug, Clone)]
pub struct Coordinator {
    session: Session,
}

impl Coordinator {
    /// Create a coordinator over an empty waiting session
    pub fn new() -> Self {
        Self {
            session: Session::new(),
        }
    }

    /// The current session state (for inspection and tests)
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Process a single command with the production RNG
    pub fn handle(&mut self, command: Command) -> Vec<Outbound> {
        self.handle_with_rng(command, &mut rand::thread_rng())
    }

    /// Process a single command, using the given RNG for any role
    /// assignment it triggers
    pub fn handle_with_rng<R: Rng + ?Sized>(
        &mut self,
        command: Command,
        rng: &mut R,
    ) -> Vec<Outbound> {
        match command {
            Command::Join {
                connection_id,
                nickname,
            } => self.handle_join(connection_id, nickname, rng),

            Command::AddWish {
                connection_id,
                wish,
            } => self.handle_add_wish(connection_id, wish),

            Command::Disconnect { connection_id } => self.handle_disconnect(connection_id),
        }
    }

    fn handle_join<R: Rng + ?Sized>(
        &mut self,
        connection_id: ConnectionId,
        nickname: String,
        rng: &mut R,
    ) -> Vec<Outbound> {
        let nick = nickname.clone();
        match self.session.join_with_rng(connection_id, nickname, rng) {
            Ok(outcome) => {
                let mut out = vec![Outbound::broadcast(ServerEvent::GameStatus {
                    message: format!(
                        "{nick} joined the game. {} player(s) connected.",
                        self.session.len()
                    ),
                })];

                if outcome == JoinOutcome::Started {
                    // One personalized start notification per player;
                    // the assignment is announced to the angel only.
                    for player in self.session.roster() {
                        out.push(Outbound::unicast(
                            player.id(),
                            ServerEvent::StartGame {
                                is_game_started: true,
                                master_name: player.master_name().unwrap_or_default().to_owned(),
                            },
                        ));
                    }
                }

                out
            }
            Err(e) => {
                tracing::debug!(%connection_id, nickname = %nick, reason = %e, "join rejected");
                vec![Outbound::unicast(
                    connection_id,
                    ServerEvent::GameStatus {
                        message: e.to_string(),
                    },
                )]
            }
        }
    }

    fn handle_add_wish(&mut self, connection_id: ConnectionId, wish: String) -> Vec<Outbound> {
        // Wishes are only collected; nothing is sent back or routed
        // to the assigned master.
        match self.session.add_wish(connection_id, wish) {
            WishOutcome::Recorded => {}
            WishOutcome::AtCapacity => {
                tracing::debug!(%connection_id, "wish dropped, player at capacity");
            }
            WishOutcome::UnknownConnection => {
                tracing::warn!(%connection_id, "wish from unknown connection ignored");
            }
        }

        Vec::new()
    }

    fn handle_disconnect(&mut self, connection_id: ConnectionId) -> Vec<Outbound> {
        let Some(departure) = self.session.disconnect(connection_id) else {
            return Vec::new();
        };

        let mut out = vec![Outbound::broadcast(ServerEvent::GameStatus {
            message: format!(
                "{} left the game. {} player(s) connected.",
                departure.nickname, departure.remaining
            ),
        })];

        if departure.reset {
            out.push(Outbound::broadcast(ServerEvent::GameStatus {
                message: "Not enough players, the game has been reset. Waiting for new players..."
                    .to_string(),
            }));
        }

        out
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Recipient;
    use crate::domain::Phase;
    use uuid::Uuid;

    fn join_cmd(connection_id: ConnectionId, nickname: &str) -> Command {
        Command::Join {
            connection_id,
            nickname: nickname.to_string(),
        }
    }

    fn status_message(outbound: &Outbound) -> &str {
        match &outbound.event {
            ServerEvent::GameStatus { message } => message,
            other => panic!("expected game_status, got {other:?}"),
        }
    }

    #[test]
    fn test_first_join_broadcasts_status_only() {
        let mut coordinator = Coordinator::new();
        let alice = Uuid::new_v4();

        let out = coordinator.handle(join_cmd(alice, "Alice"));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipient, Recipient::All);
        assert_eq!(
            status_message(&out[0]),
            "Alice joined the game. 1 player(s) connected."
        );
    }

    #[test]
    fn test_second_join_starts_game_with_personalized_events() {
        // Each player receives exactly one start_game
        // carrying the other player's nickname.
        let mut coordinator = Coordinator::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        coordinator.handle(join_cmd(alice, "Alice"));
        let out = coordinator.handle(join_cmd(bob, "Bob"));

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].recipient, Recipient::All);
        assert_eq!(
            status_message(&out[0]),
            "Bob joined the game. 2 player(s) connected."
        );

        let starts: Vec<&Outbound> = out[1..].iter().collect();
        for start in &starts {
            let Recipient::Client(to) = start.recipient else {
                panic!("start_game must be unicast");
            };
            match &start.event {
                ServerEvent::StartGame {
                    is_game_started,
                    master_name,
                } => {
                    assert!(*is_game_started);
                    let expected = if to == alice { "Bob" } else { "Alice" };
                    assert_eq!(master_name, expected);
                }
                other => panic!("expected start_game, got {other:?}"),
            }
        }
        assert_eq!(starts.len(), 2);
    }

    #[test]
    fn test_duplicate_nickname_rejection_is_unicast() {
        // The rejection goes to the requester only, roster
        // unchanged, no start_game fired.
        let mut coordinator = Coordinator::new();
        let alice = Uuid::new_v4();
        let imposter = Uuid::new_v4();

        coordinator.handle(join_cmd(alice, "Alice"));
        let out = coordinator.handle(join_cmd(imposter, "Alice"));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipient, Recipient::Client(imposter));
        assert!(status_message(&out[0]).contains("already taken"));
        assert_eq!(coordinator.session().len(), 1);
    }

    #[test]
    fn test_late_join_is_rejected_with_status() {
        // The game is running, so the third joiner gets a
        // private status and never enters the roster.
        let mut coordinator = Coordinator::new();
        coordinator.handle(join_cmd(Uuid::new_v4(), "Alice"));
        coordinator.handle(join_cmd(Uuid::new_v4(), "Bob"));

        let carol = Uuid::new_v4();
        let out = coordinator.handle(join_cmd(carol, "Carol"));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipient, Recipient::Client(carol));
        assert!(status_message(&out[0]).contains("already started"));
        assert_eq!(coordinator.session().len(), 2);
        assert!(coordinator.session().player(carol).is_none());
    }

    #[test]
    fn test_empty_nickname_is_rejected_with_status() {
        let mut coordinator = Coordinator::new();
        let alice = Uuid::new_v4();

        let out = coordinator.handle(join_cmd(alice, ""));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipient, Recipient::Client(alice));
        assert!(status_message(&out[0]).contains("empty"));
        assert!(coordinator.session().is_empty());
    }

    #[test]
    fn test_add_wish_produces_no_outbound() {
        let mut coordinator = Coordinator::new();
        let alice = Uuid::new_v4();
        coordinator.handle(join_cmd(alice, "Alice"));
        coordinator.handle(join_cmd(Uuid::new_v4(), "Bob"));

        for i in 0..5 {
            let out = coordinator.handle(Command::AddWish {
                connection_id: alice,
                wish: format!("wish {i}"),
            });
            assert!(out.is_empty());
        }

        // Only the first three stick.
        assert_eq!(coordinator.session().player(alice).unwrap().wishes().len(), 3);
    }

    #[test]
    fn test_add_wish_from_unknown_connection_is_silent() {
        let mut coordinator = Coordinator::new();

        let out = coordinator.handle(Command::AddWish {
            connection_id: Uuid::new_v4(),
            wish: "nothing".to_string(),
        });

        assert!(out.is_empty());
    }

    #[test]
    fn test_disconnect_broadcasts_departure_and_reset() {
        // One of two started players leaves; everyone
        // left hears the departure and the reset notice.
        let mut coordinator = Coordinator::new();
        let alice = Uuid::new_v4();
        coordinator.handle(join_cmd(alice, "Alice"));
        coordinator.handle(join_cmd(Uuid::new_v4(), "Bob"));

        let out = coordinator.handle(Command::Disconnect {
            connection_id: alice,
        });

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].recipient, Recipient::All);
        assert_eq!(
            status_message(&out[0]),
            "Alice left the game. 1 player(s) connected."
        );
        assert_eq!(out[1].recipient, Recipient::All);
        assert!(status_message(&out[1]).contains("reset"));

        assert!(coordinator.session().is_empty());
        assert_eq!(coordinator.session().phase(), Phase::Waiting);
    }

    #[test]
    fn test_disconnect_of_unknown_connection_is_silent() {
        let mut coordinator = Coordinator::new();
        coordinator.handle(join_cmd(Uuid::new_v4(), "Alice"));

        let out = coordinator.handle(Command::Disconnect {
            connection_id: Uuid::new_v4(),
        });

        assert!(out.is_empty());
        assert_eq!(coordinator.session().len(), 1);
    }

    #[test]
    fn test_round_restarts_after_reset() {
        let mut coordinator = Coordinator::new();
        let alice = Uuid::new_v4();
        coordinator.handle(join_cmd(alice, "Alice"));
        coordinator.handle(join_cmd(Uuid::new_v4(), "Bob"));
        coordinator.handle(Command::Disconnect {
            connection_id: alice,
        });

        // A fresh pair can start a new round.
        coordinator.handle(join_cmd(Uuid::new_v4(), "Carol"));
        let out = coordinator.handle(join_cmd(Uuid::new_v4(), "Dave"));

        assert_eq!(out.len(), 3);
        assert_eq!(coordinator.session().phase(), Phase::Started);
    }
}
