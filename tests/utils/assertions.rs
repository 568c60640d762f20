//! Test assertion helpers - fluent API for verifying broadcast expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use relayquiz::websockets::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    players: Vec<String>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for all players in the setup
    pub fn for_all_players(setup: &'a TestSetup) -> Self {
        let players = setup.players.iter().map(|p| p.id.clone()).collect();
        Self { setup, players }
    }

    /// Create an assertion for specific players
    pub fn for_players(setup: &'a TestSetup, players: Vec<&str>) -> Self {
        Self {
            setup,
            players: players.into_iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Assert that every targeted player's next message has the expected
    /// type (consumes it), and that all payloads are identical
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        consume_and_assert(self.setup, &self.players, expected_type).await
    }

    /// Assert that the targeted players received a sequence of message
    /// types, in order (consumes them)
    pub async fn received_message_sequence(
        self,
        expected_types: Vec<MessageType>,
    ) -> Vec<MessageContent> {
        let mut contents = vec![];
        for expected in expected_types {
            contents.push(consume_and_assert(self.setup, &self.players, expected).await);
        }
        contents
    }

    /// Assert that the targeted players received no messages at all
    pub async fn received_no_messages(self) {
        for player in &self.players {
            let messages = self.setup.mock_conn_manager.get_messages_for(player).await;
            assert!(
                messages.is_empty(),
                "{player} should not have received any messages, got: {messages:?}"
            );
        }
    }

    /// Count messages of a type a player has queued (non-consuming)
    pub async fn count_message_type(&self, player: &str, msg_type: MessageType) -> usize {
        let messages = self.setup.mock_conn_manager.get_messages_for(player).await;
        messages
            .iter()
            .filter_map(|msg_str| serde_json::from_str::<WebSocketMessage>(msg_str).ok())
            .filter(|msg| msg.message_type == msg_type)
            .count()
    }
}

async fn consume_and_assert(
    setup: &TestSetup,
    players: &[String],
    expected_type: MessageType,
) -> MessageContent {
    let mut messages = vec![];

    for player in players {
        let message = setup.mock_conn_manager.consume_message_for(player).await;
        assert!(message.is_some(), "{player} should have received a message");

        let msg: WebSocketMessage = serde_json::from_str(&message.unwrap()).unwrap();
        assert_eq!(
            msg.message_type, expected_type,
            "{player} received wrong message type"
        );
        messages.push(msg);
    }

    // Broadcasts are canonical: every member sees the same payload
    if messages.len() > 1 {
        let first_payload = &messages[0].payload;
        for (i, msg) in messages.iter().enumerate().skip(1) {
            assert_eq!(
                &msg.payload, first_payload,
                "Player {} payload differs from player {}",
                players[i], players[0]
            );
        }
    }

    MessageContent {
        payload: messages[0].payload.clone(),
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    pub payload: serde_json::Value,
}

impl MessageContent {
    /// Assert the message is about a specific player
    pub fn with_player(self, expected_player_id: &str) -> Self {
        assert_eq!(self.payload["player_id"], expected_player_id);
        self
    }

    /// Assert the snapshot's current turn-holder
    pub fn with_current_player(self, expected_player_id: &str) -> Self {
        assert_eq!(self.payload["current_player_id"], expected_player_id);
        self
    }

    /// Assert the snapshot's room status
    pub fn with_status(self, expected_status: &str) -> Self {
        assert_eq!(self.payload["status"], expected_status);
        self
    }

    /// Assert a player's cumulative score in a SCORE_UPDATE payload
    pub fn with_score(self, player_id: &str, expected: i64) -> Self {
        assert_eq!(self.payload["scores"][player_id], expected);
        self
    }

    /// Assert the GAME_ENDED scoreboard ordering by player id
    pub fn with_scoreboard_order(self, expected_ids: Vec<&str>) -> Self {
        let ids: Vec<String> = self.payload["scoreboard"]
            .as_array()
            .expect("scoreboard should be an array")
            .iter()
            .map(|e| e["player_id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, expected_ids);
        self
    }

    /// Assert the error text sent back to a rejected caller
    pub fn with_error_containing(self, needle: &str) -> Self {
        let message = self.payload["message"].as_str().unwrap_or_default();
        assert!(
            message.contains(needle),
            "error {message:?} should contain {needle:?}"
        );
        self
    }
}
