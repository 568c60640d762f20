use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Live outbound channels, keyed by player id.
///
/// A send to a disconnected player is silently dropped; transport
/// failures never abort a room transition or delivery to other members.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, player_id: String, sender: mpsc::UnboundedSender<String>);

    async fn remove_connection(&self, player_id: &str);

    async fn send_to_player(&self, player_id: &str, message: &str);

    async fn send_to_players(&self, player_ids: &[String], message: &str);
}

pub struct InMemoryConnectionManager {
    // player_id -> sender
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<String>>>>,
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, player_id: String, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.insert(player_id, sender);
    }

    async fn remove_connection(&self, player_id: &str) {
        let mut connections = self.connections.write().await;
        connections.remove(player_id);
    }

    async fn send_to_player(&self, player_id: &str, message: &str) {
        let connections = self.connections.read().await;
        if let Some(sender) = connections.get(player_id) {
            if sender.send(message.to_string()).is_err() {
                debug!(player_id = %player_id, "Dropped message to stale connection");
            }
        }
    }

    async fn send_to_players(&self, player_ids: &[String], message: &str) {
        let connections = self.connections.read().await;
        for player_id in player_ids {
            if let Some(sender) = connections.get(player_id) {
                if sender.send(message.to_string()).is_err() {
                    debug!(player_id = %player_id, "Dropped message to stale connection");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fan_out_skips_stale_and_missing_channels() {
        let manager = InMemoryConnectionManager::new();

        let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
        let (bob_tx, bob_rx) = mpsc::unbounded_channel();
        manager.add_connection("alice".to_string(), alice_tx).await;
        manager.add_connection("bob".to_string(), bob_tx).await;

        // bob's receiver is gone; carol never connected
        drop(bob_rx);

        let targets = vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
        ];
        manager.send_to_players(&targets, "hello").await;

        // alice still got her copy
        assert_eq!(alice_rx.recv().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_remove_connection_stops_delivery() {
        let manager = InMemoryConnectionManager::new();

        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.add_connection("alice".to_string(), tx).await;
        manager.remove_connection("alice").await;

        manager.send_to_player("alice", "hello").await;
        assert!(rx.try_recv().is_err());
    }
}
