//! Per-connection handler: frame decoding and event routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The handler owns the connection's identity (its `PlayerId` and current
//! display name) and an unbounded event channel whose sending half is
//! handed to whichever room the player joins. The loop selects over
//! inbound frames and outbound room events, so a broadcast can go out
//! while the player is idle.

use std::sync::Arc;

use minds_protocol::{ClientEvent, Codec, PlayerId, ServerEvent};
use minds_room::{EventSender, Trigger};
use minds_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ServerError;
use crate::server::ServerState;

/// Drop guard that unseats the player when the handler exits.
///
/// This ensures room cleanup happens even if the handler errors out.
/// Since `Drop` is synchronous, we spawn a fire-and-forget task for the
/// async lock.
struct DisconnectGuard<C: Codec> {
    player: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let player = self.player;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.registry.lock().await.disconnect(player).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), ServerError> {
    let conn_id = conn.id();
    let player = PlayerId(conn_id.into_inner());
    let mut display_name = format!("player-{}", conn_id.into_inner());
    tracing::debug!(%conn_id, %player, "handling new connection");

    // Events addressed to this player funnel through this channel: the
    // sending half goes to the room actor on join, and the handler also
    // uses it for failures raised before any room is involved, so the
    // client sees one ordered event stream.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let _guard = DisconnectGuard {
        player,
        state: Arc::clone(&state),
    };

    loop {
        tokio::select! {
            frame = conn.recv() => match frame {
                Ok(Some(data)) => {
                    let event: ClientEvent = match state.codec.decode(&data) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::debug!(%player, error = %e, "undecodable frame");
                            continue;
                        }
                    };
                    handle_client_event(&state, player, &mut display_name, &tx, event).await;
                }
                Ok(None) => {
                    tracing::info!(%player, "connection closed cleanly");
                    break;
                }
                Err(e) => {
                    tracing::debug!(%player, error = %e, "recv error");
                    break;
                }
            },
            event = rx.recv() => match event {
                Some(event) => {
                    let text = state.codec.encode(&event)?;
                    if let Err(e) = conn.send(&text).await {
                        tracing::debug!(%player, error = %e, "send error");
                        break;
                    }
                }
                // Unreachable while `tx` lives above, but harmless.
                None => break,
            },
        }
    }

    // _guard drops here → the registry unseats the player.
    Ok(())
}

/// Dispatches one decoded client event.
///
/// Registry-level rejections are reported through `tx` rather than sent
/// on the connection directly, so they stay ordered with room events.
async fn handle_client_event<C: Codec>(
    state: &Arc<ServerState<C>>,
    player: PlayerId,
    display_name: &mut String,
    tx: &EventSender,
    event: ClientEvent,
) {
    match event {
        ClientEvent::JoinRoom { name: room } => {
            let result = state
                .registry
                .lock()
                .await
                .join(&room, player, display_name.clone(), tx.clone())
                .await;
            if let Err(e) = result {
                tracing::debug!(%player, room, error = %e, "join rejected");
                let _ = tx.send(ServerEvent::JoinRoomFailure {
                    reason: e.to_string(),
                });
            }
        }

        ClientEvent::LeaveRoom => {
            let result = state.registry.lock().await.leave(player).await;
            if let Err(e) = result {
                let _ = tx.send(ServerEvent::LeaveRoomFailure {
                    reason: e.to_string(),
                });
            }
        }

        ClientEvent::SetName { name } => {
            if name.trim().is_empty() {
                let _ = tx.send(ServerEvent::SetNameFailure {
                    reason: "invalid name".to_string(),
                });
                return;
            }
            *display_name = name.clone();
            let registry = state.registry.lock().await;
            if registry.room_of(player).is_some() {
                // The room acknowledges and rebroadcasts the roster.
                let _ = registry.route(player, Trigger::SetName(name)).await;
            } else {
                let _ = tx.send(ServerEvent::SetNameSuccess { name });
            }
        }

        ClientEvent::RoundStart => {
            let result = state
                .registry
                .lock()
                .await
                .route(player, Trigger::StartRound)
                .await;
            if let Err(e) = result {
                let _ = tx.send(ServerEvent::RoundStartFailure {
                    reason: e.to_string(),
                });
            }
        }

        ClientEvent::SetFocus { focus } => {
            // No failure event for focus; out-of-room votes are dropped.
            let result = state
                .registry
                .lock()
                .await
                .route(player, Trigger::SetFocus(focus))
                .await;
            if let Err(e) = result {
                tracing::debug!(%player, error = %e, "focus ignored");
            }
        }

        ClientEvent::SetPosition { position } => {
            let result = state
                .registry
                .lock()
                .await
                .route(player, Trigger::SetPosition(position))
                .await;
            if let Err(e) = result {
                tracing::debug!(%player, error = %e, "position ignored");
            }
        }

        ClientEvent::PlayCard => {
            let result = state
                .registry
                .lock()
                .await
                .route(player, Trigger::PlayCard)
                .await;
            if let Err(e) = result {
                let _ = tx.send(ServerEvent::PlayCardFailure {
                    reason: e.to_string(),
                });
            }
        }
    }
}
