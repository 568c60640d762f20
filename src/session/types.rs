use serde::{Deserialize, Serialize};

/// JWT claims carried by a session token.
///
/// `sub` is the stable player id the engine trusts for the lifetime of
/// the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub name: String,
    pub iat: usize,
    pub exp: usize,
}

/// Request payload for opening a session
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub display_name: String,
}

/// Response for a freshly opened session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub player_id: String,
    pub display_name: String,
}
