use tracing::info;

use super::models::Question;
use super::source::QuestionSource;
use crate::shared::AppError;

/// Maximum number of questions drawn for a single game session.
pub const QUESTION_LIMIT: usize = 10;

/// A fixed, ordered run of questions for one game session.
///
/// Wraps the one-shot call to the question source; once drawn, the
/// sequence never changes for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct QuestionFeed {
    questions: Vec<Question>,
}

impl QuestionFeed {
    /// Draws up to [`QUESTION_LIMIT`] questions for the topic.
    ///
    /// Fails with `NoQuestionsAvailable` when the source has nothing for
    /// the topic, leaving the caller free to keep the room in waiting.
    pub async fn draw(source: &dyn QuestionSource, topic: &str) -> Result<Self, AppError> {
        let questions = source.fetch(topic, QUESTION_LIMIT).await?;

        if questions.is_empty() {
            return Err(AppError::NoQuestionsAvailable(topic.to_string()));
        }

        info!(
            topic = %topic,
            count = questions.len(),
            "Question feed drawn"
        );

        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}
