// Room registry and roster lifecycle

// Public API - what other modules can use
pub use cleanup_task::{start_cleanup_task, CleanupConfig};
pub use handlers::{create_room, join_room, list_rooms};

// Internal modules
mod cleanup_task;
mod handlers;
pub mod models;
pub mod registry;
pub mod service;
pub mod types;
