//! The pure game engine for one room.
//!
//! [`GameState`] owns everything a room tracks — phase, counters, roster,
//! hands — and exposes one method per trigger. Methods never touch the
//! network: they mutate state and return `(Recipient, ServerEvent)` pairs
//! for the caller to deliver. The room actor wraps this in a task; tests
//! drive it directly.
//!
//! Rule summary: each round deals every player `round` cards from a shared
//! shuffled 1–100 deck. After a unanimous focus vote, players must play
//! their lowest cards in globally ascending order. A play that strands
//! lower cards in other hands is a bust (costs a life); a unanimous star
//! vote reveals everyone's lowest card instead (costs a star).

use minds_protocol::{
    Card, PlayerCard, PlayerId, PlayerPosition, PositionEntry, RoomPosition,
    RosterEntry, ServerEvent,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::deck::shuffled_deck;
use crate::{Phase, RoomError};

const STARTING_LIVES: u32 = 2;
const STARTING_STARS: u32 = 1;

/// Where an outbound event should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One specific player.
    Player(PlayerId),
}

/// Events produced by a trigger, in delivery order.
pub type Outbox = Vec<(Recipient, ServerEvent)>;

/// One seated player.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Undealt between rounds; sorted ascending while a round is live.
    pub hand: Vec<Card>,
    pub focussed: bool,
    pub position: PlayerPosition,
}

/// The authoritative state of one room.
pub struct GameState {
    name: String,
    phase: Phase,
    round: u32,
    lives: u32,
    stars: u32,
    /// Join order. Order matters for deal slices and position layout only.
    players: Vec<Player>,
    rng: StdRng,
}

impl GameState {
    /// Creates a lobby with a deck seeded from OS entropy.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_rng(name, StdRng::from_os_rng())
    }

    /// Creates a lobby with a fixed deck seed (deterministic deals).
    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(name, StdRng::seed_from_u64(seed))
    }

    fn with_rng(name: impl Into<String>, rng: StdRng) -> Self {
        Self {
            name: name.into(),
            phase: Phase::Lobby,
            round: 1,
            lives: STARTING_LIVES,
            stars: STARTING_STARS,
            players: Vec::new(),
            rng,
        }
    }

    // -- accessors ---------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The player's current hand, if seated.
    pub fn hand(&self, id: PlayerId) -> Option<&[Card]> {
        self.player(id).map(|p| p.hand.as_slice())
    }

    fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The broadcastable room summary clients resynchronize from.
    pub fn room_position(&self) -> RoomPosition {
        RoomPosition {
            round: self.round,
            lives: self.lives,
            stars: self.stars,
            players: self
                .players
                .iter()
                .map(|p| RosterEntry {
                    id: p.id,
                    name: p.name.clone(),
                })
                .collect(),
        }
    }

    fn room_position_event(&self) -> (Recipient, ServerEvent) {
        (
            Recipient::All,
            ServerEvent::SetRoomPosition {
                position: self.room_position(),
            },
        )
    }

    // -- triggers ----------------------------------------------------------

    /// Seats a player. Only valid in the lobby.
    pub fn join(&mut self, id: PlayerId, name: String) -> Result<Outbox, RoomError> {
        if !self.phase.accepts_joins() {
            return Err(RoomError::RoomInGame);
        }

        self.players.push(Player {
            id,
            name,
            hand: Vec::new(),
            focussed: false,
            position: PlayerPosition::default(),
        });
        tracing::info!(room = %self.name, player = %id, players = self.players.len(), "player joined");

        Ok(vec![
            (
                Recipient::Player(id),
                ServerEvent::JoinRoomSuccess {
                    room: self.name.clone(),
                },
            ),
            self.room_position_event(),
        ])
    }

    /// Unseats a player. Valid in any phase; mid-round departures simply
    /// leave one fewer hand to track and shrink subsequent unanimity
    /// checks — no phase reset.
    pub fn leave(&mut self, id: PlayerId) -> (Outbox, usize) {
        self.players.retain(|p| p.id != id);
        tracing::info!(room = %self.name, player = %id, players = self.players.len(), "player left");

        let out = vec![
            (Recipient::Player(id), ServerEvent::LeaveRoomSuccess),
            self.room_position_event(),
        ];
        (out, self.players.len())
    }

    /// Renames a player and republishes the roster.
    pub fn set_name(&mut self, id: PlayerId, name: String) -> Outbox {
        let Some(player) = self.player_mut(id) else {
            return Vec::new();
        };
        player.name = name.clone();

        vec![
            (Recipient::Player(id), ServerEvent::SetNameSuccess { name }),
            self.room_position_event(),
        ]
    }

    /// Shuffles a fresh deck and deals `round` cards to each player in
    /// join order: player *i* takes the slice `[i*round, (i+1)*round)`,
    /// sorted ascending. If `players * round` exceeds the deck, later
    /// players are under-dealt (short or empty hands), not an error.
    pub fn start_round(&mut self, requester: PlayerId) -> Outbox {
        if self.phase != Phase::Lobby {
            return vec![(
                Recipient::Player(requester),
                ServerEvent::RoundStartFailure {
                    reason: RoomError::NotInLobby.to_string(),
                },
            )];
        }
        if self.players.is_empty() {
            return vec![(
                Recipient::Player(requester),
                ServerEvent::RoundStartFailure {
                    reason: RoomError::InsufficientPlayers.to_string(),
                },
            )];
        }

        self.phase = Phase::RoundStartPending;
        let deck = shuffled_deck(&mut self.rng);
        tracing::info!(room = %self.name, round = self.round, players = self.players.len(), "round starting");

        let mut out = vec![self.room_position_event()];

        let per_player = self.round as usize;
        for (i, player) in self.players.iter_mut().enumerate() {
            let lo = (i * per_player).min(deck.len());
            let hi = ((i + 1) * per_player).min(deck.len());
            let mut hand = deck[lo..hi].to_vec();
            hand.sort_unstable();
            out.push((
                Recipient::Player(player.id),
                ServerEvent::RoundStartSuccess { hand: hand.clone() },
            ));
            player.hand = hand;
        }

        self.phase = Phase::AwaitingFocus;
        out
    }

    /// Records a focus vote. The gate passes when the triggering vote is
    /// `true` and every seated player's flag is set — evaluated after
    /// applying this player's own update, against the current roster.
    pub fn set_focus(&mut self, id: PlayerId, focus: bool) -> Outbox {
        if self.phase != Phase::AwaitingFocus {
            tracing::debug!(room = %self.name, player = %id, phase = %self.phase, "setFocus ignored");
            return Vec::new();
        }
        let Some(player) = self.player_mut(id) else {
            return Vec::new();
        };
        player.focussed = focus;

        if focus && self.players.iter().all(|p| p.focussed) {
            self.phase = Phase::InGame;
            return vec![(Recipient::All, ServerEvent::FocusStart)];
        }

        let ids = self
            .players
            .iter()
            .filter(|p| p.focussed)
            .map(|p| p.id)
            .collect();
        vec![(Recipient::All, ServerEvent::SetPlayerFocusses { ids })]
    }

    /// Stores a position report. A unanimous `star` intent (with charges
    /// remaining) resolves a star reveal; otherwise the positions are
    /// rebroadcast for rendering.
    pub fn set_position(&mut self, id: PlayerId, position: PlayerPosition) -> Outbox {
        if self.phase != Phase::InGame {
            tracing::debug!(room = %self.name, player = %id, phase = %self.phase, "setPosition ignored");
            return Vec::new();
        }
        let Some(player) = self.player_mut(id) else {
            return Vec::new();
        };
        player.position = position;

        if position.star
            && self.stars > 0
            && self.players.iter().all(|p| p.position.star)
        {
            return self.reveal_star();
        }

        let positions = self
            .players
            .iter()
            .map(|p| PositionEntry {
                id: p.id,
                position: p.position,
            })
            .collect();
        vec![(Recipient::All, ServerEvent::SetPlayerPositions { positions })]
    }

    /// Resolves a star reveal: every player loses (and shows) their
    /// current lowest card.
    fn reveal_star(&mut self) -> Outbox {
        self.phase = Phase::Star;
        self.stars -= 1;

        let revealed: Vec<PlayerCard> = self
            .players
            .iter_mut()
            .filter(|p| !p.hand.is_empty())
            .map(|p| PlayerCard {
                id: p.id,
                card: p.hand.remove(0),
            })
            .collect();

        let round_complete = self.players.iter().all(|p| p.hand.is_empty());
        tracing::info!(room = %self.name, stars = self.stars, round_complete, "star revealed");

        let mut out = vec![(
            Recipient::All,
            ServerEvent::Star {
                revealed,
                stars: self.stars,
                round_complete,
            },
        )];

        if round_complete {
            out.extend(self.complete_round());
        } else {
            self.phase = Phase::AwaitingFocus;
        }
        out
    }

    /// Plays the triggering player's lowest card. Any card strictly lower
    /// than it left in another hand is a bust: those cards are forcibly
    /// revealed and a life is lost.
    pub fn play_card(&mut self, id: PlayerId) -> Outbox {
        if self.phase != Phase::InGame {
            return vec![(
                Recipient::Player(id),
                ServerEvent::PlayCardFailure {
                    reason: RoomError::NotInGame.to_string(),
                },
            )];
        }
        let Some(player) = self.player_mut(id) else {
            return Vec::new();
        };
        if player.hand.is_empty() {
            return vec![(
                Recipient::Player(id),
                ServerEvent::PlayCardFailure {
                    reason: RoomError::NoCardsLeft.to_string(),
                },
            )];
        }
        let played = player.hand.remove(0);

        let mut revealed: Vec<PlayerCard> = Vec::new();
        for other in self.players.iter_mut().filter(|p| p.id != id) {
            // Hands are sorted, so the busted prefix is everything < played.
            let cut = other.hand.partition_point(|&c| c < played);
            for card in other.hand.drain(..cut) {
                revealed.push(PlayerCard {
                    id: other.id,
                    card,
                });
            }
        }

        if !revealed.is_empty() {
            return self.resolve_bust(revealed);
        }

        let round_complete = self.players.iter().all(|p| p.hand.is_empty());
        let mut out = vec![(
            Recipient::All,
            ServerEvent::PlayCardSuccess {
                play: PlayerCard { id, card: played },
                round_complete,
            },
        )];
        if round_complete {
            out.extend(self.complete_round());
        }
        out
    }

    fn resolve_bust(&mut self, revealed: Vec<PlayerCard>) -> Outbox {
        self.phase = Phase::Bust;
        // Saturating: a room restarted at zero lives busts straight back
        // to game over instead of underflowing.
        self.lives = self.lives.saturating_sub(1);
        let game_over = self.lives == 0;
        tracing::info!(room = %self.name, lives = self.lives, game_over, "bust");

        let out = vec![(
            Recipient::All,
            ServerEvent::Bust {
                revealed,
                lives: self.lives,
                game_over,
            },
        )];

        // Lives are not reset on game over; the next round restarts with
        // whatever remains.
        self.phase = if game_over {
            Phase::Lobby
        } else {
            Phase::AwaitingFocus
        };
        out
    }

    /// All hands emptied cleanly: back to the lobby, next round number.
    /// Lives and stars persist across rounds.
    fn complete_round(&mut self) -> Outbox {
        self.phase = Phase::Lobby;
        self.round += 1;
        tracing::info!(room = %self.name, round = self.round, "round complete");
        vec![self.room_position_event()]
    }
}
