//! The per-room phase machine.

use serde::{Deserialize, Serialize};

/// The phase a room is currently in.
///
/// ```text
/// Lobby → RoundStartPending → AwaitingFocus ⇄ InGame
///                                  ↑            │
///                                  └── Star/Bust┘→ Lobby
/// ```
///
/// - **Lobby**: joins and leaves accepted, a round can be started.
/// - **RoundStartPending**: deck being shuffled and dealt. Transient —
///   no external trigger is valid here.
/// - **AwaitingFocus**: hands dealt, waiting for a unanimous focus vote.
/// - **InGame**: cards may be played, star votes accepted.
/// - **Star** / **Bust**: a reveal is being resolved. Transient.
///
/// Transitions are strictly sequential per room: the actor processes one
/// trigger at a time, so a transient phase is never observable across two
/// triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    RoundStartPending,
    AwaitingFocus,
    InGame,
    Star,
    Bust,
}

impl Phase {
    /// Returns `true` if the room accepts new players.
    pub fn accepts_joins(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` if a round is in flight (dealt but not resolved).
    pub fn in_round(&self) -> bool {
        !matches!(self, Self::Lobby)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Lobby => "lobby",
            Self::RoundStartPending => "roundStartPending",
            Self::AwaitingFocus => "awaitingFocus",
            Self::InGame => "inGame",
            Self::Star => "star",
            Self::Bust => "bust",
        };
        write!(f, "{name}")
    }
}
