//! Error types for the room layer.
//!
//! Every variant is local and recoverable: the `Display` strings double as
//! the machine-stable reason strings carried by failure events on the wire,
//! so they must not change.

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoomError {
    /// The connection already has an assigned room.
    #[error("already in a room")]
    AlreadyInRoom,

    /// The registry is at its configured room-count limit.
    #[error("room limit reached")]
    RoomFull,

    /// A join was attempted outside the lobby phase.
    #[error("room already in game")]
    RoomInGame,

    /// A leave or trigger arrived from a connection with no assigned room.
    #[error("not in a room")]
    NotInRoom,

    /// A round start was attempted outside the lobby phase.
    #[error("not in lobby")]
    NotInLobby,

    /// A round start was attempted with no seated players.
    #[error("not enough players")]
    InsufficientPlayers,

    /// A card play was attempted outside the in-game phase.
    #[error("not in game")]
    NotInGame,

    /// A card play was attempted with an empty hand.
    #[error("no cards left")]
    NoCardsLeft,

    /// The room's actor task is gone (shutting down).
    #[error("room unavailable")]
    Unavailable,
}
