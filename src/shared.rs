use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::event::EventBus;
use crate::game::GameSessionService;
use crate::room::registry::RoomRegistry;
use crate::room::service::RoomService;
use crate::session::service::SessionService;
use crate::websockets::ConnectionManager;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: EngineConfig,
    pub session_service: Arc<SessionService>,
    pub room_service: Arc<RoomService>,
    pub game_service: Arc<GameSessionService>,
    pub registry: Arc<RoomRegistry>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub event_bus: EventBus,
}

/// Everything an inbound request can be rejected with.
///
/// Validation always happens before any mutation, so returning one of
/// these never leaves a room in a half-transitioned state.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is full")]
    RoomFull,

    #[error("Room id {0} is already taken")]
    RoomIdConflict(String),

    #[error("Room id {0} is not a 5-digit number")]
    InvalidRoomId(String),

    #[error("Topic cannot be blank")]
    InvalidTopic,

    #[error("Only the room creator may do that")]
    NotCreator,

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("You are not a member of this room")]
    NotAMember,

    #[error("The game has not started yet")]
    GameNotStarted,

    #[error("The game has already started")]
    GameAlreadyStarted,

    #[error("The game has already finished")]
    GameAlreadyFinished,

    #[error("At least {0} players are needed to start")]
    InsufficientPlayers(usize),

    #[error("No questions available for topic: {0}")]
    NoQuestionsAvailable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::RoomNotFound => StatusCode::NOT_FOUND,
            AppError::RoomFull
            | AppError::RoomIdConflict(_)
            | AppError::GameNotStarted
            | AppError::GameAlreadyStarted
            | AppError::GameAlreadyFinished
            | AppError::NoQuestionsAvailable(_) => StatusCode::CONFLICT,
            AppError::InvalidRoomId(_)
            | AppError::InvalidTopic
            | AppError::InsufficientPlayers(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotCreator | AppError::NotYourTurn | AppError::NotAMember => {
                StatusCode::FORBIDDEN
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
