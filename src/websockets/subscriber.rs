use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::event::{RoomEvent, RoomEventError, RoomEventHandler};
use crate::room::registry::RoomRegistry;

use super::connection_manager::ConnectionManager;
use super::messages::WebSocketMessage;

/// Outbound half of the event gateway.
///
/// Consumes a room's domain events and fans the corresponding wire
/// messages out to every member's live channel. A member whose channel
/// is stale is skipped without aborting delivery to the rest.
pub struct WebSocketRoomSubscriber {
    registry: Arc<RoomRegistry>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl WebSocketRoomSubscriber {
    pub fn new(
        registry: Arc<RoomRegistry>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            registry,
            connection_manager,
        }
    }

    async fn broadcast(
        &self,
        room_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let Some(cell) = self.registry.get(room_id) else {
            // Room already evicted; nobody left to tell
            debug!(room_id = %room_id, "Broadcast for evicted room dropped");
            return Ok(());
        };

        let member_ids: Vec<String> = {
            let state = cell.state.lock().await;
            state.model.members.iter().map(|p| p.id.clone()).collect()
        };

        let json = serde_json::to_string(message)
            .map_err(|e| RoomEventError::HandlerError(format!("Serialize failed: {e}")))?;

        self.connection_manager
            .send_to_players(&member_ids, &json)
            .await;

        Ok(())
    }
}

#[async_trait]
impl RoomEventHandler for WebSocketRoomSubscriber {
    async fn handle_room_event(
        &self,
        room_id: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        let message = match &event {
            RoomEvent::PlayerJoined { player } => WebSocketMessage::player_joined(player),
            RoomEvent::PlayerLeft { player } => WebSocketMessage::player_left(player),
            RoomEvent::CreatorChanged { creator } => WebSocketMessage::creator_changed(creator),
            RoomEvent::QuestionsLoading => WebSocketMessage::questions_loading(),
            RoomEvent::GameStarted { state } => WebSocketMessage::game_started(state),
            RoomEvent::StateChanged { state } => WebSocketMessage::game_state(state),
            RoomEvent::AnswerResolved { player, outcome } => {
                WebSocketMessage::answer_outcome(player, *outcome)
            }
            RoomEvent::ScoresUpdated { scores } => WebSocketMessage::score_update(scores.clone()),
            RoomEvent::GameEnded { scoreboard } => {
                WebSocketMessage::game_ended(scoreboard.clone())
            }
            // Engine-internal; never hits the wire
            RoomEvent::TurnExpired { .. } => return Ok(()),
        };

        self.broadcast(room_id, &message).await
    }

    fn handler_name(&self) -> &'static str {
        "WebSocketRoomSubscriber"
    }
}
