// Public API
pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use gateway::EventGateway;
pub use handler::websocket_handler;
pub use messages::{MessageType, WebSocketMessage};
pub use socket::MessageHandler;
pub use subscriber::WebSocketRoomSubscriber;

// Internal modules
mod connection_manager;
mod gateway;
mod handler;
pub mod messages;
mod socket;
mod subscriber;
