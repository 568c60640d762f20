// Game session state machine, turn scheduling, and the score ledger

// Public API - what other modules can use
pub use scheduler::TurnScheduler;
pub use service::GameSessionService;
pub use subscriber::GameSessionSubscriber;

// Internal modules
mod scheduler;
pub mod scoring;
mod service;
pub mod session;
mod subscriber;
