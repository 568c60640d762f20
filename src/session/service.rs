use axum::http::HeaderMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::token::TokenConfig;
use super::types::{SessionClaims, SessionResponse};
use crate::shared::AppError;

/// Thin identity layer: registers a display name against a fresh player
/// id and hands out a signed token the engine trusts afterwards.
///
/// Stateless by design; everything the engine needs travels inside the
/// token. Real account storage is an external collaborator's concern.
pub struct SessionService {
    token_config: TokenConfig,
}

impl SessionService {
    pub fn new(token_config: TokenConfig) -> Self {
        Self { token_config }
    }

    /// Opens a session for a display name, minting a fresh player id.
    pub fn register(&self, display_name: &str) -> Result<SessionResponse, AppError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::BadRequest(
                "Display name cannot be empty".to_string(),
            ));
        }

        let player_id = Uuid::new_v4().to_string();
        let token = self.token_config.create_token(&player_id, display_name)?;

        info!(player_id = %player_id, display_name = %display_name, "Session opened");

        Ok(SessionResponse {
            token,
            player_id,
            display_name: display_name.to_string(),
        })
    }

    /// Validates a raw token string.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, AppError> {
        self.token_config.validate_token(token)
    }

    /// Extracts and validates the bearer token from request headers.
    pub fn claims_from_headers(&self, headers: &HeaderMap) -> Result<SessionClaims, AppError> {
        let token = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| {
                debug!("Missing or malformed Authorization header");
                AppError::Unauthorized("Missing bearer token".to_string())
            })?;

        self.validate(token)
    }
}
