use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::game::scoring::Outcome;
use crate::game::session::ScoreboardEntry;
use crate::room::models::{GameStateSnapshot, Player};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server
    StartGame,
    SubmitAnswer,
    LeaveGame,
    EndGame,

    // Server -> Client
    PlayerJoined,
    PlayerLeft,
    CreatorChanged,
    QuestionsLoading,
    GameStarted,
    GameState,
    CorrectAnswer,
    WrongAnswer,
    NoAnswer,
    ScoreUpdate,
    GameEnded,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerPayload {
    /// `None` is a deliberate no-answer submission
    pub answer: Option<String>,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPayload {
    pub player_id: String,
    pub display_name: String,
}

impl From<&Player> for PlayerPayload {
    fn from(player: &Player) -> Self {
        Self {
            player_id: player.id.clone(),
            display_name: player.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStartedPayload {
    pub current_player_id: String,
    pub question_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreUpdatePayload {
    /// player_id -> cumulative score
    pub scores: HashMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEndedPayload {
    /// Scores descending, ties broken by original turn order
    pub scoreboard: Vec<ScoreboardEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    /// Create a PLAYER_JOINED message
    pub fn player_joined(player: &Player) -> Self {
        Self::new(
            MessageType::PlayerJoined,
            serde_json::to_value(PlayerPayload::from(player)).unwrap(),
        )
    }

    /// Create a PLAYER_LEFT message
    pub fn player_left(player: &Player) -> Self {
        Self::new(
            MessageType::PlayerLeft,
            serde_json::to_value(PlayerPayload::from(player)).unwrap(),
        )
    }

    /// Create a CREATOR_CHANGED message
    pub fn creator_changed(creator: &Player) -> Self {
        Self::new(
            MessageType::CreatorChanged,
            serde_json::to_value(PlayerPayload::from(creator)).unwrap(),
        )
    }

    /// Create a QUESTIONS_LOADING message
    pub fn questions_loading() -> Self {
        Self::new(MessageType::QuestionsLoading, serde_json::json!({}))
    }

    /// Create a GAME_STARTED message
    pub fn game_started(state: &GameStateSnapshot) -> Self {
        let payload = GameStartedPayload {
            current_player_id: state.current_player_id.clone().unwrap_or_default(),
            question_count: state.question_count,
        };
        Self::new(
            MessageType::GameStarted,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a GAME_STATE message carrying the canonical snapshot
    pub fn game_state(state: &GameStateSnapshot) -> Self {
        Self::new(MessageType::GameState, serde_json::to_value(state).unwrap())
    }

    /// Create the outcome message matching a turn resolution
    pub fn answer_outcome(player: &Player, outcome: Outcome) -> Self {
        let message_type = match outcome {
            Outcome::Correct => MessageType::CorrectAnswer,
            Outcome::Wrong => MessageType::WrongAnswer,
            Outcome::NoAnswer => MessageType::NoAnswer,
        };
        Self::new(
            message_type,
            serde_json::to_value(PlayerPayload::from(player)).unwrap(),
        )
    }

    /// Create a SCORE_UPDATE message
    pub fn score_update(scores: HashMap<String, i64>) -> Self {
        let payload = ScoreUpdatePayload { scores };
        Self::new(
            MessageType::ScoreUpdate,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a GAME_ENDED message
    pub fn game_ended(scoreboard: Vec<ScoreboardEntry>) -> Self {
        let payload = GameEndedPayload { scoreboard };
        Self::new(
            MessageType::GameEnded,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create an ERROR message (sent to the originating caller only)
    pub fn error(message: String) -> Self {
        let payload = ErrorPayload { message };
        Self::new(MessageType::Error, serde_json::to_value(payload).unwrap())
    }
}
