use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use tracing::{info, instrument};

use super::models::Player;
use super::types::{RoomCreateRequest, RoomSummary};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new room
///
/// POST /room
/// Returns the room summary with its assigned 5-digit id
#[instrument(name = "create_room", skip(state, headers, request))]
pub async fn create_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RoomCreateRequest>,
) -> Result<Json<RoomSummary>, AppError> {
    let claims = state.session_service.claims_from_headers(&headers)?;
    let creator = Player::new(claims.sub, claims.name);

    info!(creator_id = %creator.id, topic = %request.topic, "Creating new room");

    let summary = state
        .room_service
        .create_room(creator, &request.topic, request.room_id)
        .await?;

    Ok(Json(summary))
}

/// HTTP handler for joining a room
///
/// POST /room/{room_id}/join
/// Idempotent for players who are already members
#[instrument(name = "join_room", skip(state, headers))]
pub async fn join_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<RoomSummary>, AppError> {
    let claims = state.session_service.claims_from_headers(&headers)?;
    let player = Player::new(claims.sub, claims.name);

    let summary = state.room_service.join_room(&room_id, player).await?;

    Ok(Json(summary))
}

/// HTTP handler for listing all rooms
///
/// GET /rooms
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSummary>> {
    Json(state.room_service.list_rooms().await)
}
