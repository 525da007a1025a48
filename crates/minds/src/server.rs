//! `MindsServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → registry → rooms.

use std::sync::Arc;

use minds_protocol::{Codec, JsonCodec};
use minds_room::{RegistryConfig, RoomRegistry};
use minds_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::ServerError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry sits behind a single mutex, which makes the room-limit
/// check-then-create on join atomic across concurrent connections.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a minds server.
///
/// # Example
///
/// ```rust,ignore
/// let server = MindsServer::builder()
///     .bind("0.0.0.0:8080")
///     .max_rooms(4)
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct MindsServerBuilder {
    bind_addr: String,
    config: RegistryConfig,
}

impl MindsServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            config: RegistryConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the maximum number of concurrently active rooms.
    pub fn max_rooms(mut self, max_rooms: usize) -> Self {
        self.config.max_rooms = max_rooms;
        self
    }

    /// Replaces the whole registry configuration.
    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the server. Uses `JsonCodec` over WebSocket text frames.
    pub async fn build(self) -> Result<MindsServer<JsonCodec>, ServerError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(RoomRegistry::new(self.config)),
            codec: JsonCodec,
        });

        Ok(MindsServer { transport, state })
    }
}

impl Default for MindsServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running minds game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct MindsServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl<C: Codec + Clone> MindsServer<C> {
    /// Creates a new builder.
    pub fn builder() -> MindsServerBuilder {
        MindsServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, ServerError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task per connection. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), ServerError> {
        tracing::info!("minds server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
