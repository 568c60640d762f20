use serde::{Deserialize, Serialize};

use super::models::{RoomModel, RoomStatus};

/// Request payload for creating a new room
#[derive(Debug, Deserialize)]
pub struct RoomCreateRequest {
    pub topic: String,
    /// Optional human-shared id; allocated fresh when absent
    pub room_id: Option<String>,
}

/// Room overview for the control surface and lobby listing
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: String,
    pub topic: String,
    pub status: RoomStatus,
    pub member_count: usize,
    pub creator_id: String,
}

impl RoomSummary {
    pub fn from_model(model: &RoomModel) -> Self {
        Self {
            id: model.id.clone(),
            topic: model.topic.clone(),
            status: model.status,
            member_count: model.member_count(),
            creator_id: model.creator_id.clone(),
        }
    }
}
