use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

use super::models::Question;
use crate::shared::AppError;

/// External collaborator that supplies questions for a topic.
///
/// Invoked exactly once per room, at game start. Implementations may be
/// slow (a remote generator); the room stays visibly loading while the
/// call is in flight.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Returns up to `limit` questions for the topic. An empty result is
    /// not an error at this layer; the feed turns it into
    /// `NoQuestionsAvailable`.
    async fn fetch(&self, topic: &str, limit: usize) -> Result<Vec<Question>, AppError>;
}

/// In-memory question source for development and testing
pub struct InMemoryQuestionSource {
    by_topic: RwLock<HashMap<String, Vec<Question>>>,
}

impl Default for InMemoryQuestionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryQuestionSource {
    /// Creates a new empty in-memory source
    pub fn new() -> Self {
        Self {
            by_topic: RwLock::new(HashMap::new()),
        }
    }

    /// Registers (or replaces) the question set for a topic.
    pub fn insert_topic(&self, topic: &str, questions: Vec<Question>) {
        self.by_topic
            .write()
            .unwrap()
            .insert(topic.to_string(), questions);
    }

    /// A small built-in question set, a stand-in for the real external
    /// generator when running the server locally.
    pub fn with_demo_set() -> Self {
        let source = Self::new();
        source.insert_topic(
            "General",
            vec![
                Question::new(
                    "General",
                    "What is the largest planet in the solar system?",
                    ["Jupiter", "Saturn", "Earth", "Neptune"],
                    "Jupiter",
                ),
                Question::new(
                    "General",
                    "How many continents are there?",
                    ["5", "6", "7", "8"],
                    "7",
                ),
                Question::new(
                    "General",
                    "Which element has the chemical symbol O?",
                    ["Oxygen", "Osmium", "Gold", "Oganesson"],
                    "Oxygen",
                ),
            ],
        );
        source
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn fetch(&self, topic: &str, limit: usize) -> Result<Vec<Question>, AppError> {
        let questions: Vec<Question> = {
            let by_topic = self.by_topic.read().unwrap();
            by_topic
                .get(topic)
                .map(|qs| qs.iter().take(limit).cloned().collect())
                .unwrap_or_default()
        };

        debug!(
            topic = %topic,
            count = questions.len(),
            "Fetched questions from in-memory source"
        );

        Ok(questions)
    }
}
