//! Wire protocol for the minds game server.
//!
//! Defines the closed tagged unions the client and server exchange:
//!
//! - [`ClientEvent`] — triggers (join, leave, start round, focus vote,
//!   position report, card play)
//! - [`ServerEvent`] — success/failure replies and room broadcasts
//! - [`Codec`] / [`JsonCodec`] — how events become text frames
//!
//! The protocol layer knows nothing about rooms or connections; it only
//! serializes and deserializes.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    Card, ClientEvent, PlayerCard, PlayerId, PlayerPosition, PositionEntry,
    RoomPosition, RosterEntry, ServerEvent,
};
