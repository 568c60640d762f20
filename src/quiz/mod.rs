// Question supply: the external source seam and the per-session feed

// Public API - what other modules can use
pub use feed::{QuestionFeed, QUESTION_LIMIT};
pub use source::{InMemoryQuestionSource, QuestionSource};

// Internal modules
pub mod feed;
pub mod models;
pub mod source;
