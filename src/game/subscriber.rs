use std::sync::Arc;

use async_trait::async_trait;

use crate::event::{RoomEvent, RoomEventError, RoomEventHandler};

use super::service::GameSessionService;

/// Routes the scheduler's deadline fires back into the game service.
///
/// Subscribed per room alongside the WebSocket fan-out; every event other
/// than `TurnExpired` is someone else's business.
pub struct GameSessionSubscriber {
    game_service: Arc<GameSessionService>,
}

impl GameSessionSubscriber {
    pub fn new(game_service: Arc<GameSessionService>) -> Self {
        Self { game_service }
    }
}

#[async_trait]
impl RoomEventHandler for GameSessionSubscriber {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        if let RoomEvent::TurnExpired { epoch } = event {
            self.game_service.resolve_expired(room_id, epoch).await;
        }
        Ok(())
    }

    fn handler_name(&self) -> &'static str {
        "GameSessionSubscriber"
    }
}
