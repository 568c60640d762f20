// Library crate for the relayquiz room engine
// This file exposes the public API for integration tests

pub mod config;
pub mod event;
pub mod game;
pub mod quiz;
pub mod room;
pub mod session;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::EngineConfig;
pub use event::{EventBus, RoomEvent, RoomEventHandler, RoomSubscription};
pub use game::{GameSessionService, GameSessionSubscriber, TurnScheduler};
pub use quiz::{InMemoryQuestionSource, QuestionFeed, QuestionSource, QUESTION_LIMIT};
pub use room::registry::RoomRegistry;
pub use room::service::RoomService;
pub use shared::{AppError, AppState};
pub use websockets::{
    ConnectionManager, EventGateway, InMemoryConnectionManager, MessageHandler, MessageType,
    WebSocketMessage, WebSocketRoomSubscriber,
};
