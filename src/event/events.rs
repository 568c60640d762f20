use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::game::scoring::Outcome;
use crate::game::session::ScoreboardEntry;
use crate::room::models::{GameStateSnapshot, Player};

/// Events that can occur in a quiz room
///
/// Events represent facts about things that have already happened.
/// Services emit them while holding the room's lock; subscribers turn
/// them into wire broadcasts or follow-up engine work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoomEvent {
    /// A player has joined the room roster
    PlayerJoined { player: Player },

    /// A player has left the room roster
    PlayerLeft { player: Player },

    /// The creator left and another member was promoted
    CreatorChanged { creator: Player },

    /// Questions are being drawn from the question source
    QuestionsLoading,

    /// The game has started (waiting -> in_progress)
    GameStarted { state: GameStateSnapshot },

    /// The armed turn deadline elapsed; system-initiated, consumed by
    /// the game session subscriber rather than broadcast to clients
    TurnExpired { epoch: u64 },

    /// The current player's turn resolved with an outcome
    AnswerResolved { player: Player, outcome: Outcome },

    /// Cumulative scores after a resolved turn
    ScoresUpdated { scores: HashMap<String, i64> },

    /// The game has finished, with the final scoreboard
    GameEnded { scoreboard: Vec<ScoreboardEntry> },

    /// Canonical full-state snapshot, emitted after every transition
    StateChanged { state: GameStateSnapshot },
}

impl RoomEvent {
    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::PlayerJoined { .. } => "player_joined",
            RoomEvent::PlayerLeft { .. } => "player_left",
            RoomEvent::CreatorChanged { .. } => "creator_changed",
            RoomEvent::QuestionsLoading => "questions_loading",
            RoomEvent::GameStarted { .. } => "game_started",
            RoomEvent::TurnExpired { .. } => "turn_expired",
            RoomEvent::AnswerResolved { .. } => "answer_resolved",
            RoomEvent::ScoresUpdated { .. } => "scores_updated",
            RoomEvent::GameEnded { .. } => "game_ended",
            RoomEvent::StateChanged { .. } => "state_changed",
        }
    }
}
