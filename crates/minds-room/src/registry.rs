//! Room registry: the process-wide name→room map.
//!
//! Rooms are created lazily on first join to an unknown name and destroyed
//! when the last player leaves. The registry also tracks which room each
//! connection is seated in (a connection is in at most one room at a time).
//!
//! The registry itself is not thread-safe; the server keeps it behind a
//! single async mutex, which makes the check-then-create on join atomic
//! with respect to concurrent creation attempts for other names.

use std::collections::HashMap;

use minds_protocol::PlayerId;

use crate::room::spawn_room;
use crate::{EventSender, GameState, RegistryConfig, RoomError, RoomHandle, RoomInfo, Trigger};

/// Command channel size for room actors.
const ROOM_CHANNEL_SIZE: usize = 64;

/// Creates, tracks, and destroys rooms, and routes triggers to them.
pub struct RoomRegistry {
    config: RegistryConfig,
    /// Active rooms, keyed by name.
    rooms: HashMap<String, RoomHandle>,
    /// Maps each seated connection to its room name.
    player_rooms: HashMap<PlayerId, String>,
}

impl RoomRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
        }
    }

    /// Seats a connection in the named room, creating the room first if
    /// the name is unknown and the room limit allows it.
    pub async fn join(
        &mut self,
        room_name: &str,
        player: PlayerId,
        display_name: String,
        sender: EventSender,
    ) -> Result<(), RoomError> {
        if self.player_rooms.contains_key(&player) {
            return Err(RoomError::AlreadyInRoom);
        }

        let handle = match self.rooms.get(room_name) {
            Some(handle) => handle.clone(),
            None => {
                if self.rooms.len() >= self.config.max_rooms {
                    return Err(RoomError::RoomFull);
                }
                let game = match self.config.deck_seed {
                    Some(seed) => GameState::seeded(room_name, seed),
                    None => GameState::new(room_name),
                };
                let handle = spawn_room(game, ROOM_CHANNEL_SIZE);
                self.rooms.insert(room_name.to_string(), handle.clone());
                tracing::info!(room = room_name, rooms = self.rooms.len(), "room created");
                handle
            }
        };

        handle.join(player, display_name, sender).await?;
        self.player_rooms.insert(player, room_name.to_string());
        Ok(())
    }

    /// Unseats a connection from its room, destroying the room if it is
    /// now empty. Fails with `NotInRoom` if the connection has no room.
    pub async fn leave(&mut self, player: PlayerId) -> Result<(), RoomError> {
        let room_name = self
            .player_rooms
            .remove(&player)
            .ok_or(RoomError::NotInRoom)?;

        let Some(handle) = self.rooms.get(&room_name) else {
            return Ok(());
        };
        let remaining = handle.leave(player).await?;

        if remaining == 0 {
            if let Some(handle) = self.rooms.remove(&room_name) {
                let _ = handle.shutdown().await;
            }
            tracing::info!(room = %room_name, rooms = self.rooms.len(), "room destroyed");
        }
        Ok(())
    }

    /// Transport-level disconnect: identical to [`leave`](Self::leave) but
    /// a no-op for connections that never joined a room.
    pub async fn disconnect(&mut self, player: PlayerId) {
        match self.leave(player).await {
            Ok(()) | Err(RoomError::NotInRoom) => {}
            Err(e) => {
                tracing::debug!(player = %player, error = %e, "disconnect cleanup failed");
            }
        }
    }

    /// Routes a player intent to their room.
    pub async fn route(&self, player: PlayerId, trigger: Trigger) -> Result<(), RoomError> {
        let room_name = self.player_rooms.get(&player).ok_or(RoomError::NotInRoom)?;
        let handle = self.rooms.get(room_name).ok_or(RoomError::NotInRoom)?;
        handle.trigger(player, trigger).await
    }

    /// Returns the room name a connection is currently seated in, if any.
    pub fn room_of(&self, player: PlayerId) -> Option<&str> {
        self.player_rooms.get(&player).map(String::as_str)
    }

    /// Returns metadata for the named room.
    pub async fn info(&self, room_name: &str) -> Option<RoomInfo> {
        let handle = self.rooms.get(room_name)?;
        handle.info().await.ok()
    }

    /// Number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
