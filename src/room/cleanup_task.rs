use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, instrument};

use super::service::RoomService;

/// Configuration for the cleanup task
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to scan for idle rooms
    pub cleanup_interval: Duration,
    /// How long a waiting or finished room may sit idle before eviction
    pub idle_grace: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(60),
            idle_grace: Duration::from_secs(5 * 60),
        }
    }
}

/// Runs the periodic idle-room eviction loop.
///
/// Rooms are otherwise only destroyed when their last member leaves;
/// this covers abandoned waiting rooms and finished rooms nobody closed.
#[instrument(skip(room_service))]
pub async fn start_cleanup_task(room_service: Arc<RoomService>, config: CleanupConfig) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        idle_grace_secs = config.idle_grace.as_secs(),
        "Starting room cleanup background task"
    );

    let mut cleanup_interval = interval(config.cleanup_interval);

    loop {
        cleanup_interval.tick().await;

        let evicted = evict_idle_rooms(&room_service, config.idle_grace).await;
        if evicted > 0 {
            info!(evicted = evicted, "Room cleanup completed");
        }
    }
}

/// One cleanup sweep; returns how many rooms were evicted.
async fn evict_idle_rooms(room_service: &Arc<RoomService>, idle_grace: Duration) -> usize {
    let idle = room_service.idle_rooms(idle_grace).await;

    for room_id in &idle {
        info!(room_id = %room_id, "Evicting idle room");
        room_service.evict_room(room_id).await;
    }

    idle.len()
}
