use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::quiz::models::Question;
use crate::room::models::Player;

/// One line of the final scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardEntry {
    pub player_id: String,
    pub display_name: String,
    pub score: i64,
}

/// Turn and question state for one in-flight game.
///
/// Created at game start and never replaced; the room's status decides
/// whether it is live. The turn order is the member list frozen at start
/// time, so late joiners never enter the rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    questions: Vec<Question>,
    question_index: usize,
    turn_order: Vec<Player>,
    current_player_index: usize,
    /// Bumped on every turn handover; an armed deadline captures the
    /// epoch it was armed for, so a stale timer fire is a no-op.
    turn_epoch: u64,
    turn_deadline: Option<DateTime<Utc>>,
}

impl GameSession {
    pub fn new(questions: Vec<Question>, turn_order: Vec<Player>) -> Self {
        debug_assert!(!questions.is_empty());
        debug_assert!(!turn_order.is_empty());

        Self {
            questions,
            question_index: 0,
            turn_order,
            current_player_index: 0,
            turn_epoch: 1,
            turn_deadline: None,
        }
    }

    pub fn current_player(&self) -> &Player {
        &self.turn_order[self.current_player_index]
    }

    /// The question the current turn is about, `None` once exhausted.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.question_index)
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn turn_order(&self) -> &[Player] {
        &self.turn_order
    }

    pub fn turn_epoch(&self) -> u64 {
        self.turn_epoch
    }

    pub fn turn_deadline(&self) -> Option<DateTime<Utc>> {
        self.turn_deadline
    }

    pub fn set_turn_deadline(&mut self, deadline: Option<DateTime<Utc>>) {
        self.turn_deadline = deadline;
    }

    pub fn is_exhausted(&self) -> bool {
        self.question_index >= self.questions.len()
    }

    /// Resolves the current turn: consumes the question and rotates to
    /// the next player. Returns true when the question run is exhausted.
    pub fn advance_turn(&mut self) -> bool {
        self.question_index += 1;
        self.current_player_index = (self.current_player_index + 1) % self.turn_order.len();
        self.turn_epoch += 1;
        self.turn_deadline = None;
        self.is_exhausted()
    }

    /// Hands the turn to the next rotation player still on the roster,
    /// without consuming a question (a departure is not a resolution).
    ///
    /// Returns false when no rotation player remains a member, in which
    /// case the caller finishes the session.
    pub fn hand_off_turn(&mut self, members: &[Player]) -> bool {
        let len = self.turn_order.len();
        for step in 1..=len {
            let candidate = (self.current_player_index + step) % len;
            let player = &self.turn_order[candidate];
            if members.iter().any(|m| m.id == player.id) {
                self.current_player_index = candidate;
                self.turn_epoch += 1;
                self.turn_deadline = None;
                return true;
            }
        }
        false
    }

    /// Final standings: scores descending, ties broken by original
    /// turn-order position. Members who joined after the game started
    /// sit outside the rotation and sort after it, in join order.
    pub fn final_scoreboard(
        &self,
        scores: &HashMap<String, i64>,
        members: &[Player],
    ) -> Vec<ScoreboardEntry> {
        let mut ranked: Vec<(usize, ScoreboardEntry)> = self
            .turn_order
            .iter()
            .enumerate()
            .map(|(index, player)| (index, entry(player, scores)))
            .collect();

        let rotation_len = self.turn_order.len();
        ranked.extend(
            members
                .iter()
                .filter(|m| !self.turn_order.iter().any(|p| p.id == m.id))
                .enumerate()
                .map(|(index, player)| (rotation_len + index, entry(player, scores))),
        );

        ranked.sort_by_key(|(order, e)| (-e.score, *order));
        ranked.into_iter().map(|(_, e)| e).collect()
    }
}

fn entry(player: &Player, scores: &HashMap<String, i64>) -> ScoreboardEntry {
    ScoreboardEntry {
        player_id: player.id.clone(),
        display_name: player.display_name.clone(),
        score: scores.get(&player.id).copied().unwrap_or(0),
    }
}
