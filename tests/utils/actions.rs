use serde_json::json;
use tokio::time::{sleep, Duration};

use relayquiz::websockets::{MessageHandler, MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a WebSocket message through the gateway and wait for the
    /// subscription tasks to settle
    pub async fn send_message(&self, player_id: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.gateway
            .handle_message(player_id, &self.room_id, message_json)
            .await;
        sleep(Duration::from_millis(10)).await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn send_start_game(&self, player_id: &str) {
        self.send_message(
            player_id,
            WebSocketMessage::new(MessageType::StartGame, json!({})),
        )
        .await;
    }

    pub async fn send_answer(&self, player_id: &str, answer: Option<&str>) {
        self.send_message(
            player_id,
            WebSocketMessage::new(MessageType::SubmitAnswer, json!({ "answer": answer })),
        )
        .await;
    }

    pub async fn send_leave(&self, player_id: &str) {
        self.send_message(
            player_id,
            WebSocketMessage::new(MessageType::LeaveGame, json!({})),
        )
        .await;
    }

    pub async fn send_end_game(&self, player_id: &str) {
        self.send_message(
            player_id,
            WebSocketMessage::new(MessageType::EndGame, json!({})),
        )
        .await;
    }

    /// The player currently holding the turn, straight from the engine
    pub async fn current_player(&self) -> String {
        let cell = self.registry.get(&self.room_id).expect("room missing");
        let state = cell.state.lock().await;
        state
            .session
            .as_ref()
            .expect("no session")
            .current_player()
            .id
            .clone()
    }
}
