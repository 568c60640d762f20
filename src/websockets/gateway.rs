use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::game::GameSessionService;
use crate::room::service::RoomService;
use crate::shared::AppError;

use super::connection_manager::ConnectionManager;
use super::messages::{MessageType, SubmitAnswerPayload, WebSocketMessage};
use super::socket::MessageHandler;

/// Inbound half of the event gateway.
///
/// Maps each transport message to exactly one service call. Rejections
/// are answered with a single ERROR message to the originating caller;
/// the room's broadcast state is untouched by rejected actions.
pub struct EventGateway {
    room_service: Arc<RoomService>,
    game_service: Arc<GameSessionService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl EventGateway {
    pub fn new(
        room_service: Arc<RoomService>,
        game_service: Arc<GameSessionService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            room_service,
            game_service,
            connection_manager,
        }
    }

    async fn reply_error(&self, player_id: &str, error: AppError) {
        let message = WebSocketMessage::error(error.to_string());
        match serde_json::to_string(&message) {
            Ok(json) => self.connection_manager.send_to_player(player_id, &json).await,
            Err(e) => warn!(error = %e, "Failed to serialize error reply"),
        }
    }
}

#[async_trait]
impl MessageHandler for EventGateway {
    async fn handle_message(&self, player_id: &str, room_id: &str, message: String) {
        info!(
            player_id = %player_id,
            room_id = %room_id,
            "Received message"
        );

        let ws_message = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(m) => m,
            Err(e) => {
                warn!(
                    player_id = %player_id,
                    room_id = %room_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                self.reply_error(
                    player_id,
                    AppError::BadRequest("Malformed message".to_string()),
                )
                .await;
                return;
            }
        };

        let result = match ws_message.message_type {
            MessageType::StartGame => self.game_service.start_game(room_id, player_id).await,
            MessageType::SubmitAnswer => {
                let answer = serde_json::from_value::<SubmitAnswerPayload>(ws_message.payload)
                    .map(|p| p.answer)
                    .unwrap_or(None);
                self.game_service
                    .submit_answer(room_id, player_id, answer)
                    .await
            }
            MessageType::LeaveGame => self.room_service.leave_room(room_id, player_id).await,
            MessageType::EndGame => self.game_service.end_game(room_id, player_id).await,
            other => {
                debug!(message_type = ?other, "Unhandled message type");
                Ok(())
            }
        };

        if let Err(e) = result {
            debug!(
                player_id = %player_id,
                room_id = %room_id,
                error = %e,
                "Action rejected"
            );
            self.reply_error(player_id, e).await;
        }
    }
}
