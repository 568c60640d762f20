use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::game::session::GameSession;
use crate::quiz::models::QuestionView;

/// Maximum number of members in a room.
pub const ROOM_CAPACITY: usize = 4;

/// Minimum number of members required to start a game.
pub const MIN_PLAYERS: usize = 2;

/// A room-scoped participant, identity resolved by the session service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub display_name: String,
}

impl Player {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Room lifecycle state: waiting -> in_progress -> finished, no skips,
/// no reversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    InProgress,
    Finished,
}

/// Roster and score state for one room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomModel {
    /// 5-digit numeric string, unique among active rooms
    pub id: String,
    /// Player id of the creator; holds start/end privileges
    pub creator_id: String,
    pub topic: String,
    /// Ordered by join time, unique by player id
    pub members: Vec<Player>,
    pub status: RoomStatus,
    /// Cumulative scores; entries are created at join time and survive a
    /// member leaving so the final scoreboard stays complete
    pub scores: HashMap<String, i64>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl RoomModel {
    /// Creates a new waiting room with the creator as sole member,
    /// scoring from zero.
    pub fn new(id: String, creator: Player, topic: String) -> Self {
        let now = Utc::now();
        let mut scores = HashMap::new();
        scores.insert(creator.id.clone(), 0);

        Self {
            id,
            creator_id: creator.id.clone(),
            topic,
            members: vec![creator],
            status: RoomStatus::Waiting,
            scores,
            created_at: now,
            last_activity_at: now,
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    pub fn has_member(&self, player_id: &str) -> bool {
        self.members.iter().any(|p| p.id == player_id)
    }

    pub fn member(&self, player_id: &str) -> Option<&Player> {
        self.members.iter().find(|p| p.id == player_id)
    }

    /// Adds a member and opens their score at zero. No-op for an
    /// existing member.
    pub fn add_member(&mut self, player: Player) {
        if !self.has_member(&player.id) {
            self.scores.entry(player.id.clone()).or_insert(0);
            self.members.push(player);
        }
    }

    /// Removes a member from the roster. Their score entry is kept.
    pub fn remove_member(&mut self, player_id: &str) -> Option<Player> {
        let position = self.members.iter().position(|p| p.id == player_id)?;
        Some(self.members.remove(position))
    }

    /// Records activity for idle-eviction purposes.
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }
}

/// All mutable state of one room, guarded by the room's lock.
///
/// The session is absent while the room is waiting and stays in place
/// (frozen) once the game finishes.
#[derive(Debug)]
pub struct RoomState {
    pub model: RoomModel,
    pub session: Option<GameSession>,
}

impl RoomState {
    pub fn new(model: RoomModel) -> Self {
        Self {
            model,
            session: None,
        }
    }

    /// Canonical full-state snapshot, broadcast after every transition.
    pub fn snapshot(&self) -> GameStateSnapshot {
        let session = self.session.as_ref();
        let in_progress = self.model.status == RoomStatus::InProgress;

        GameStateSnapshot {
            room_id: self.model.id.clone(),
            topic: self.model.topic.clone(),
            status: self.model.status,
            members: self.model.members.clone(),
            creator_id: self.model.creator_id.clone(),
            current_player_id: session
                .filter(|_| in_progress)
                .map(|s| s.current_player().id.clone()),
            question_index: session.map(|s| s.question_index()).unwrap_or(0),
            question_count: session.map(|s| s.question_count()).unwrap_or(0),
            current_question: session
                .filter(|_| in_progress)
                .and_then(|s| s.current_question())
                .map(|q| q.view()),
            turn_deadline: session.filter(|_| in_progress).and_then(|s| s.turn_deadline()),
        }
    }
}

/// The complete game state as every member sees it.
///
/// Turn identity is visible to everyone; the correct answer never
/// appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub room_id: String,
    pub topic: String,
    pub status: RoomStatus,
    pub members: Vec<Player>,
    pub creator_id: String,
    pub current_player_id: Option<String>,
    pub question_index: usize,
    pub question_count: usize,
    pub current_question: Option<QuestionView>,
    pub turn_deadline: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> RoomModel {
        RoomModel::new(
            "12345".to_string(),
            Player::new("alice", "Alice"),
            "History".to_string(),
        )
    }

    #[test]
    fn test_new_room_has_creator_scoring_from_zero() {
        let room = room();
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.member_count(), 1);
        assert_eq!(room.scores.get("alice"), Some(&0));
        assert_eq!(room.creator_id, "alice");
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let mut room = room();
        room.add_member(Player::new("bob", "Bob"));
        room.add_member(Player::new("bob", "Bob"));

        assert_eq!(room.member_count(), 2);
        assert_eq!(room.scores.get("bob"), Some(&0));
    }

    #[test]
    fn test_capacity_boundary() {
        let mut room = room();
        room.add_member(Player::new("bob", "Bob"));
        room.add_member(Player::new("carol", "Carol"));
        assert!(!room.is_full());

        room.add_member(Player::new("dave", "Dave"));
        assert!(room.is_full());
    }

    #[test]
    fn test_remove_member_keeps_score_entry() {
        let mut room = room();
        room.add_member(Player::new("bob", "Bob"));
        *room.scores.get_mut("bob").unwrap() = 25;

        let removed = room.remove_member("bob").unwrap();
        assert_eq!(removed.display_name, "Bob");
        assert!(!room.has_member("bob"));
        assert_eq!(room.scores.get("bob"), Some(&25));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&RoomStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&RoomStatus::Waiting).unwrap(),
            "\"waiting\""
        );
    }

    #[test]
    fn test_waiting_snapshot_has_no_turn_data() {
        let state = RoomState::new(room());
        let snapshot = state.snapshot();

        assert_eq!(snapshot.status, RoomStatus::Waiting);
        assert!(snapshot.current_player_id.is_none());
        assert!(snapshot.current_question.is_none());
        assert_eq!(snapshot.question_count, 0);
    }
}
