use serde::{Deserialize, Serialize};

/// A single quiz question as supplied by the question source.
///
/// The `correct_answer` never leaves the engine; broadcasts carry the
/// [`QuestionView`] projection instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub topic: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    pub fn new<const N: usize>(
        topic: &str,
        prompt: &str,
        options: [&str; N],
        correct_answer: &str,
    ) -> Self {
        Self {
            topic: topic.to_string(),
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct_answer.to_string(),
        }
    }

    /// Wire-safe projection without the answer.
    pub fn view(&self) -> QuestionView {
        QuestionView {
            prompt: self.prompt.clone(),
            options: self.options.clone(),
        }
    }
}

/// What players are allowed to see of a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub prompt: String,
    pub options: Vec<String>,
}
