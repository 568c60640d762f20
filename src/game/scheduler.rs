use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::event::{EventBus, RoomEvent};

struct ArmedTurn {
    epoch: u64,
    handle: JoinHandle<()>,
}

/// Owns the single turn deadline per active session.
///
/// Arming aborts any previous timer task before spawning the new one, so
/// no two timers for the same room are ever live. The fired event carries
/// the epoch it was armed for; the game service ignores it if the turn
/// has moved on in the meantime.
pub struct TurnScheduler {
    event_bus: EventBus,
    turn_timeout: Duration,
    timers: Mutex<HashMap<String, ArmedTurn>>,
}

impl TurnScheduler {
    pub fn new(event_bus: EventBus, turn_timeout: Duration) -> Self {
        Self {
            event_bus,
            turn_timeout,
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// (Re)arms the deadline for a room's current turn and returns the
    /// wall-clock instant it expires at.
    pub fn arm(&self, room_id: &str, epoch: u64) -> DateTime<Utc> {
        let deadline = Utc::now()
            + chrono::Duration::from_std(self.turn_timeout)
                .unwrap_or_else(|_| chrono::Duration::seconds(20));

        let event_bus = self.event_bus.clone();
        let timeout = self.turn_timeout;
        let room = room_id.to_string();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            debug!(room_id = %room, epoch = epoch, "Turn deadline elapsed");
            event_bus
                .emit_to_room(&room, RoomEvent::TurnExpired { epoch })
                .await;
        });

        let mut timers = self.timers.lock().unwrap();
        if let Some(previous) = timers.insert(
            room_id.to_string(),
            ArmedTurn { epoch, handle },
        ) {
            previous.handle.abort();
            debug!(
                room_id = %room_id,
                old_epoch = previous.epoch,
                new_epoch = epoch,
                "Replaced armed turn timer"
            );
        }

        deadline
    }

    /// Cancels any armed timer for the room (leave-to-empty, finish,
    /// eviction).
    pub fn cancel(&self, room_id: &str) {
        let mut timers = self.timers.lock().unwrap();
        if let Some(armed) = timers.remove(room_id) {
            armed.handle.abort();
            debug!(room_id = %room_id, epoch = armed.epoch, "Cancelled turn timer");
        }
    }
}
