use axum::{extract::State, Json};
use tracing::instrument;

use super::types::{CreateSessionRequest, SessionResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for opening a session
///
/// POST /session
/// Returns a signed token carrying the new player identity
#[instrument(name = "create_session", skip(state, request))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.session_service.register(&request.display_name)?;
    Ok(Json(session))
}
