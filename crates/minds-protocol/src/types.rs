//! Wire types for the minds game server.
//!
//! Every message on the wire is one variant of a closed tagged union:
//! [`ClientEvent`] for client→server triggers, [`ServerEvent`] for
//! server→client events. Both are internally tagged on an `"event"` field
//! with camelCase names, so a join request travels as
//! `{"event": "joinRoom", "name": "A"}`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A card value. Decks are permutations of `1..=100`.
pub type Card = u8;

/// Opaque identifier for a seated player.
///
/// Assigned by the transport layer when the connection is accepted and
/// stable for the connection's lifetime. Serializes as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A player's last reported pointer position plus intent flags.
///
/// `r`/`theta` are polar coordinates on the table — the server stores and
/// rebroadcasts them without interpretation. `star` signals intent to spend
/// a star charge; `pressing` signals a held card.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPosition {
    pub r: f32,
    pub theta: f32,
    pub star: bool,
    pub pressing: bool,
}

/// A revealed or played card attributed to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCard {
    pub id: PlayerId,
    pub card: Card,
}

/// One roster entry in a room-position broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: PlayerId,
    pub name: String,
}

/// The broadcastable room summary all clients resynchronize from:
/// round number, shared counters, and the roster in join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPosition {
    pub round: u32,
    pub lives: u32,
    pub stars: u32,
    pub players: Vec<RosterEntry>,
}

/// A player's position in a `setPlayerPositions` broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionEntry {
    pub id: PlayerId,
    pub position: PlayerPosition,
}

/// Decodes a focus vote leniently: anything that isn't literal `true`
/// (including non-boolean payloads from stale clients) counts as `false`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value == serde_json::Value::Bool(true))
}

/// Client→server triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Join the named room, creating it if it doesn't exist yet.
    JoinRoom { name: String },

    /// Leave the current room.
    LeaveRoom,

    /// Set the display name (defaults to a server-assigned placeholder).
    SetName { name: String },

    /// Start the next round (lobby only).
    RoundStart,

    /// Vote on the focus gate.
    SetFocus {
        #[serde(default, deserialize_with = "lenient_bool")]
        focus: bool,
    },

    /// Report pointer position and star/pressing intent.
    SetPosition { position: PlayerPosition },

    /// Play the lowest card in hand.
    PlayCard,
}

/// Server→client events.
///
/// Failure variants carry a short machine-stable reason string; the full
/// set of reasons is defined by the room layer's error type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    JoinRoomSuccess { room: String },
    JoinRoomFailure { reason: String },

    LeaveRoomSuccess,
    LeaveRoomFailure { reason: String },

    SetNameSuccess { name: String },
    SetNameFailure { reason: String },

    /// Broadcast on any roster or counter change.
    SetRoomPosition {
        #[serde(flatten)]
        position: RoomPosition,
    },

    /// Unicast: the recipient's freshly dealt hand, sorted ascending.
    RoundStartSuccess { hand: Vec<Card> },
    RoundStartFailure { reason: String },

    /// Broadcast: ids of players currently voting focus (partial consensus).
    SetPlayerFocusses { ids: Vec<PlayerId> },

    /// Broadcast: the focus gate passed, cards may be played.
    FocusStart,

    /// Broadcast: last reported pointer positions.
    SetPlayerPositions { positions: Vec<PositionEntry> },

    /// Broadcast: a star reveal — every player's lowest card, the remaining
    /// star count, and whether the reveal emptied all hands.
    Star {
        revealed: Vec<PlayerCard>,
        stars: u32,
        round_complete: bool,
    },

    /// Broadcast: a bust — the forcibly revealed cards, the remaining life
    /// count, and whether the game is over.
    Bust {
        revealed: Vec<PlayerCard>,
        lives: u32,
        game_over: bool,
    },

    /// Broadcast: a clean play.
    PlayCardSuccess { play: PlayerCard, round_complete: bool },
    PlayCardFailure { reason: String },
}

// =========================================================================
// Tests
// =========================================================================
