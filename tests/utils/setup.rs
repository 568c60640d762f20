#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;
use std::time::Duration;

use relayquiz::event::{EventBus, RoomEventHandler};
use relayquiz::game::{GameSessionService, GameSessionSubscriber, TurnScheduler};
use relayquiz::quiz::models::Question;
use relayquiz::quiz::InMemoryQuestionSource;
use relayquiz::room::models::Player;
use relayquiz::room::registry::RoomRegistry;
use relayquiz::room::service::RoomService;
use relayquiz::websockets::{ConnectionManager, EventGateway, WebSocketRoomSubscriber};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Every answer "a" is correct in the seeded question set.
pub const RIGHT: &str = "a";
pub const WRONG: &str = "definitely-not";

pub struct TestSetup {
    pub event_bus: EventBus,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub gateway: EventGateway,
    pub registry: Arc<RoomRegistry>,
    pub room_service: Arc<RoomService>,
    pub game_service: Arc<GameSessionService>,
    pub players: Vec<Player>,
    pub room_id: String,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    room_id: String,
    topic: String,
    question_count: usize,
    turn_timeout: Duration,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            room_id: "12345".to_string(),
            topic: "History".to_string(),
            question_count: 5,
            turn_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "carol"])
    }

    pub fn with_four_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "carol", "dave"])
    }

    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub async fn build(self) -> TestSetup {
        let event_bus = EventBus::new();
        let registry = Arc::new(RoomRegistry::new());
        let scheduler = Arc::new(TurnScheduler::new(event_bus.clone(), self.turn_timeout));
        let mock_conn_manager = Arc::new(MockConnectionManager::new());

        let source = Arc::new(InMemoryQuestionSource::new());
        source.insert_topic(
            &self.topic,
            (0..self.question_count)
                .map(|i| {
                    Question::new(
                        &self.topic,
                        &format!("Question {i}?"),
                        [RIGHT, "b", "c", "d"],
                        RIGHT,
                    )
                })
                .collect(),
        );

        let game_service = Arc::new(GameSessionService::new(
            Arc::clone(&registry),
            source,
            Arc::clone(&scheduler),
            event_bus.clone(),
        ));

        let subscribers: Vec<Arc<dyn RoomEventHandler>> = vec![
            Arc::new(WebSocketRoomSubscriber::new(
                Arc::clone(&registry),
                mock_conn_manager.clone() as Arc<dyn ConnectionManager>,
            )),
            Arc::new(GameSessionSubscriber::new(Arc::clone(&game_service))),
        ];

        let room_service = Arc::new(RoomService::new(
            Arc::clone(&registry),
            event_bus.clone(),
            Arc::clone(&game_service),
            Arc::clone(&scheduler),
            subscribers,
        ));

        let gateway = EventGateway::new(
            Arc::clone(&room_service),
            Arc::clone(&game_service),
            mock_conn_manager.clone() as Arc<dyn ConnectionManager>,
        );

        let players: Vec<Player> = self
            .players
            .iter()
            .map(|name| Player::new(name.as_str(), capitalize(name)))
            .collect();

        // Connect players, create the room as the first player, join the rest
        for player in &players {
            mock_conn_manager.add_connected_player(&player.id).await;
        }
        if let Some(creator) = players.first() {
            room_service
                .create_room(creator.clone(), &self.topic, Some(self.room_id.clone()))
                .await
                .expect("room creation failed");
            for player in &players[1..] {
                room_service
                    .join_room(&self.room_id, player.clone())
                    .await
                    .expect("join failed");
            }
        }

        // Setup traffic is not part of any test expectation
        tokio::time::sleep(Duration::from_millis(10)).await;
        mock_conn_manager.clear_messages().await;

        TestSetup {
            event_bus,
            mock_conn_manager,
            gateway,
            registry,
            room_service,
            game_service,
            players,
            room_id: self.room_id,
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
