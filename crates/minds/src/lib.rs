//! # minds
//!
//! Server for a cooperative card game: players in a room are dealt hands
//! from a shared 1–100 deck and must play them in globally ascending
//! order without communicating.
//!
//! The server is the sum of three layers:
//!
//! - [`minds_transport`] — WebSocket listener and connections
//! - [`minds_protocol`] — the JSON event vocabulary
//! - [`minds_room`] — the registry and per-room game actors
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use minds::MindsServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), minds::ServerError> {
//!     let server = MindsServer::<minds_protocol::JsonCodec>::builder()
//!         .bind("0.0.0.0:8080")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use server::{MindsServer, MindsServerBuilder};
