use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::models::{Player, RoomModel, RoomState};
use crate::shared::AppError;

/// One room's state behind its own async lock.
///
/// All mutations of a room serialize on this lock while distinct rooms
/// proceed independently; transitions that await (the question fetch at
/// game start) hold it for their full duration, which is the lock-based
/// equivalent of an actor processing one event at a time.
#[derive(Debug)]
pub struct RoomCell {
    pub room_id: String,
    pub state: tokio::sync::Mutex<RoomState>,
}

/// Process-wide set of active rooms.
///
/// The map itself is guarded by a plain mutex with short critical
/// sections; id reservation is atomic with insertion so two creates can
/// never collide on the same id.
pub struct RoomRegistry {
    rooms: Mutex<HashMap<String, Arc<RoomCell>>>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a room with the creator as sole member.
    ///
    /// A requested id must be a free 5-digit numeric string; with no
    /// request, a fresh unused id is allocated.
    pub fn create_room(
        &self,
        creator: Player,
        topic: String,
        requested_id: Option<String>,
    ) -> Result<Arc<RoomCell>, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room_id = match requested_id {
            Some(id) => {
                if !is_valid_room_id(&id) {
                    return Err(AppError::InvalidRoomId(id));
                }
                if rooms.contains_key(&id) {
                    return Err(AppError::RoomIdConflict(id));
                }
                id
            }
            None => allocate_id(&rooms)?,
        };

        let model = RoomModel::new(room_id.clone(), creator, topic);
        let cell = Arc::new(RoomCell {
            room_id: room_id.clone(),
            state: tokio::sync::Mutex::new(RoomState::new(model)),
        });
        rooms.insert(room_id.clone(), Arc::clone(&cell));

        info!(room_id = %room_id, active_rooms = rooms.len(), "Room created");
        Ok(cell)
    }

    pub fn get(&self, room_id: &str) -> Option<Arc<RoomCell>> {
        self.rooms.lock().unwrap().get(room_id).cloned()
    }

    /// Like [`get`](Self::get) but rejecting unknown rooms.
    pub fn resolve(&self, room_id: &str) -> Result<Arc<RoomCell>, AppError> {
        self.get(room_id).ok_or(AppError::RoomNotFound)
    }

    /// Evicts a room from the registry. Callers holding the cell can
    /// still finish their work; new lookups no longer find it.
    pub fn remove(&self, room_id: &str) -> Option<Arc<RoomCell>> {
        let removed = self.rooms.lock().unwrap().remove(room_id);
        if removed.is_some() {
            debug!(room_id = %room_id, "Room evicted from registry");
        }
        removed
    }

    pub fn room_ids(&self) -> Vec<String> {
        self.rooms.lock().unwrap().keys().cloned().collect()
    }

    pub fn cells(&self) -> Vec<Arc<RoomCell>> {
        self.rooms.lock().unwrap().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.lock().unwrap().is_empty()
    }
}

fn is_valid_room_id(id: &str) -> bool {
    id.len() == 5 && id.bytes().all(|b| b.is_ascii_digit())
}

fn allocate_id(rooms: &HashMap<String, Arc<RoomCell>>) -> Result<String, AppError> {
    let mut rng = rand::rng();
    for _ in 0..10_000 {
        let id = format!("{:05}", rng.random_range(0..100_000u32));
        if !rooms.contains_key(&id) {
            return Ok(id);
        }
    }
    // 100k ids; only reachable when the space is effectively exhausted
    Err(AppError::Internal)
}
