use serde::{Deserialize, Serialize};

/// Classification of a resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Wrong,
    NoAnswer,
}

impl Outcome {
    /// The score delta this outcome awards. Scores are unbounded and may
    /// go negative.
    pub fn delta(self) -> i64 {
        match self {
            Outcome::Correct => 10,
            Outcome::Wrong => -5,
            Outcome::NoAnswer => 0,
        }
    }
}

/// Classifies a submitted answer against the question's correct answer.
///
/// Comparison is exact: no trimming, no case folding. An absent answer
/// (explicit null or deadline expiry) is a no-answer.
pub fn classify(answer: Option<&str>, correct_answer: &str) -> Outcome {
    match answer {
        None => Outcome::NoAnswer,
        Some(a) if a == correct_answer => Outcome::Correct,
        Some(_) => Outcome::Wrong,
    }
}
