use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::RoomEvent;

/// Event bus for distributing room events throughout the application
///
/// Each room gets its own broadcast channel, created lazily on first
/// emit or subscribe and dropped when the room is evicted.
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Room-specific event channels: room_id -> sender
    room_channels: Arc<RwLock<HashMap<String, broadcast::Sender<RoomEvent>>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            room_channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Emits an event to all subscribers of a specific room
    pub async fn emit_to_room(&self, room_id: &str, event: RoomEvent) {
        let room_channels = self.room_channels.read().await;

        if let Some(sender) = room_channels.get(room_id) {
            match sender.send(event) {
                Ok(receiver_count) => {
                    debug!(
                        room_id = %room_id,
                        receivers = receiver_count,
                        "Room event emitted"
                    );
                }
                Err(_) => {
                    debug!(room_id = %room_id, "Room event emitted with no receivers");
                }
            }
        } else {
            debug!(room_id = %room_id, "No room channel found - creating one");
            drop(room_channels);

            // Create room channel if it doesn't exist
            let mut room_channels = self.room_channels.write().await;
            let sender = room_channels
                .entry(room_id.to_string())
                .or_insert_with(|| broadcast::channel(100).0)
                .clone();

            if sender.send(event).is_err() {
                debug!(room_id = %room_id, "Room event sent to new channel with no receivers");
            }
        }
    }

    /// Subscribe to events for a specific room
    pub async fn subscribe_to_room(&self, room_id: &str) -> broadcast::Receiver<RoomEvent> {
        let room_channels = self.room_channels.read().await;

        if let Some(sender) = room_channels.get(room_id) {
            sender.subscribe()
        } else {
            debug!(room_id = %room_id, "Creating new room channel for subscription");
            drop(room_channels);

            let mut room_channels = self.room_channels.write().await;
            room_channels
                .entry(room_id.to_string())
                .or_insert_with(|| broadcast::channel(100).0)
                .subscribe()
        }
    }

    /// Drops the channel for an evicted room, ending its subscriptions
    pub async fn remove_room(&self, room_id: &str) {
        let mut room_channels = self.room_channels.write().await;
        if room_channels.remove(room_id).is_some() {
            debug!(room_id = %room_id, "Room channel removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_then_emit_delivers_event() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe_to_room("12345").await;

        bus.emit_to_room("12345", RoomEvent::QuestionsLoading).await;

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event_type(), "questions_loading");
    }

    #[tokio::test]
    async fn test_rooms_have_independent_channels() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe_to_room("11111").await;

        bus.emit_to_room("22222", RoomEvent::QuestionsLoading).await;
        bus.emit_to_room("11111", RoomEvent::QuestionsLoading).await;

        // Only the event for our room arrives
        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event_type(), "questions_loading");
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_remove_room_closes_subscriptions() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe_to_room("12345").await;

        bus.remove_room("12345").await;

        assert!(matches!(
            receiver.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
