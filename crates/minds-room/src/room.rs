//! Room actor: an isolated Tokio task that owns one [`GameState`].
//!
//! Each room runs in its own task and communicates with the outside world
//! through an mpsc channel, so triggers for the same room are processed
//! one at a time in arrival order. That serialization is what makes the
//! unanimity checks in the game engine correct: two players crossing the
//! "everyone is focused" threshold at the same instant are still handled
//! sequentially. Broadcasts are fire-and-forget; the actor never waits on
//! a client.

use std::collections::HashMap;

use minds_protocol::{PlayerId, PlayerPosition, ServerEvent};
use tokio::sync::{mpsc, oneshot};

use crate::{GameState, Phase, Recipient, RoomError};

/// Channel sender for delivering events to one player's connection handler.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// A player intent forwarded to the room (fire-and-forget).
#[derive(Debug, Clone)]
pub enum Trigger {
    StartRound,
    SetName(String),
    SetFocus(bool),
    SetPosition(PlayerPosition),
    PlayCard,
}

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Seat a player. Replies with the join outcome.
    Join {
        player: PlayerId,
        name: String,
        sender: EventSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Unseat a player. Replies with the remaining player count so the
    /// registry can destroy empty rooms.
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<usize>,
    },

    /// Deliver a player intent.
    Trigger { player: PlayerId, trigger: Trigger },

    /// Request a metadata snapshot.
    Info { reply: oneshot::Sender<RoomInfo> },

    /// Shut down the actor.
    Shutdown,
}

/// A snapshot of room metadata for diagnostics and tests.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub name: String,
    pub phase: Phase,
    pub players: usize,
    pub round: u32,
    pub lives: u32,
    pub stars: u32,
}

/// Handle to a running room actor. Cheap to clone — just an mpsc sender.
#[derive(Clone)]
pub struct RoomHandle {
    name: String,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seats a player in the room.
    pub async fn join(
        &self,
        player: PlayerId,
        name: String,
        sender: EventSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Unseats a player; returns how many players remain.
    pub async fn leave(&self, player: PlayerId) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Forwards a player intent (fire-and-forget).
    pub async fn trigger(
        &self,
        player: PlayerId,
        trigger: Trigger,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Trigger { player, trigger })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Requests the current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable)
    }
}

/// The internal room actor. Runs inside a Tokio task.
struct RoomActor {
    game: GameState,
    /// Per-player outbound channels, maintained alongside the roster.
    senders: HashMap<PlayerId, EventSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room = %self.game.name(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player,
                    name,
                    sender,
                    reply,
                } => {
                    let result = match self.game.join(player, name) {
                        Ok(events) => {
                            self.senders.insert(player, sender);
                            self.dispatch(events);
                            Ok(())
                        }
                        Err(e) => Err(e),
                    };
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { player, reply } => {
                    let remaining = self.handle_leave(player);
                    let _ = reply.send(remaining);
                }
                RoomCommand::Trigger { player, trigger } => {
                    let events = match trigger {
                        Trigger::StartRound => self.game.start_round(player),
                        Trigger::SetName(name) => self.game.set_name(player, name),
                        Trigger::SetFocus(focus) => self.game.set_focus(player, focus),
                        Trigger::SetPosition(pos) => self.game.set_position(player, pos),
                        Trigger::PlayCard => self.game.play_card(player),
                    };
                    self.dispatch(events);
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room = %self.game.name(), "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room = %self.game.name(), "room actor stopped");
    }

    /// Removes the player's sender before dispatching, so the departure
    /// acknowledgement still reaches them but the roster broadcast only
    /// goes to the remaining players.
    fn handle_leave(&mut self, player: PlayerId) -> usize {
        let (events, remaining) = self.game.leave(player);
        let departed = self.senders.remove(&player);

        for (recipient, event) in events {
            match recipient {
                Recipient::Player(p) if p == player => {
                    if let Some(sender) = &departed {
                        let _ = sender.send(event);
                    }
                }
                other => self.send(other, event),
            }
        }
        remaining
    }

    fn dispatch(&self, events: Vec<(Recipient, ServerEvent)>) {
        for (recipient, event) in events {
            self.send(recipient, event);
        }
    }

    /// Delivers one event. Sends to gone receivers are silently dropped —
    /// the disconnect notification will clean the player up shortly.
    fn send(&self, recipient: Recipient, event: ServerEvent) {
        match recipient {
            Recipient::All => {
                for sender in self.senders.values() {
                    let _ = sender.send(event.clone());
                }
            }
            Recipient::Player(player) => {
                if let Some(sender) = self.senders.get(&player) {
                    let _ = sender.send(event);
                }
            }
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            name: self.game.name().to_string(),
            phase: self.game.phase(),
            players: self.game.player_count(),
            round: self.game.round(),
            lives: self.game.lives(),
            stars: self.game.stars(),
        }
    }
}

/// Spawns a room actor task and returns a handle to it.
pub(crate) fn spawn_room(game: GameState, channel_size: usize) -> RoomHandle {
    let name = game.name().to_string();
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        game,
        senders: HashMap::new(),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RoomHandle { name, sender: tx }
}
