//! Room engine for the minds game server.
//!
//! Each room runs as an isolated Tokio task (actor model) owning the
//! authoritative game state; the registry maps room names to running
//! actors and enforces the process-wide room limit.
//!
//! # Key types
//!
//! - [`GameState`] — the pure per-room rules engine
//! - [`RoomRegistry`] — creates/destroys rooms, routes connections
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`Trigger`] — the player intents a room accepts
//! - [`Phase`] — the per-room phase machine

mod config;
mod deck;
mod error;
mod game;
mod phase;
mod registry;
mod room;

pub use config::RegistryConfig;
pub use deck::{DECK_SIZE, shuffled_deck};
pub use error::RoomError;
pub use game::{GameState, Outbox, Player, Recipient};
pub use phase::Phase;
pub use registry::RoomRegistry;
pub use room::{EventSender, RoomHandle, RoomInfo, Trigger};
