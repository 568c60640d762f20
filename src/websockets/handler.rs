use axum::{
    extract::{Path, State, WebSocketUpgrade},
    http::HeaderMap,
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::room::models::Player;
use crate::session::SessionClaims;
use crate::shared::{AppError, AppState};

use super::gateway::EventGateway;
use super::messages::WebSocketMessage;
use super::socket::{Connection, SocketWrapper};

/// WebSocket endpoint that authenticates via the Sec-WebSocket-Protocol
/// header.
///
/// GET /ws/{room_id} with the session JWT as the protocol value.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    let token = headers
        .get("sec-websocket-protocol")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing or invalid Sec-WebSocket-Protocol header");
            AppError::Unauthorized("Missing authentication token".to_string())
        })?;

    let claims = app_state.session_service.validate(token)?;

    // Reject unknown rooms before upgrading
    app_state.registry.resolve(&room_id)?;

    info!(
        room_id = %room_id,
        player_id = %claims.sub,
        "WebSocket authentication successful"
    );

    Ok(ws.on_upgrade(move |socket| {
        handle_websocket_connection(socket, room_id, claims, app_state)
    }))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    room_id: String,
    claims: SessionClaims,
    app_state: AppState,
) {
    let player = Player::new(claims.sub, claims.name);
    let mut socket: Box<dyn SocketWrapper> = Box::new(socket);

    info!(
        room_id = %room_id,
        player_id = %player.id,
        "WebSocket connection established"
    );

    // Connecting is an (idempotent) join; a rejection is answered on
    // this socket and the connection dropped without touching the room.
    if let Err(e) = app_state
        .room_service
        .join_room(&room_id, player.clone())
        .await
    {
        warn!(
            room_id = %room_id,
            player_id = %player.id,
            error = %e,
            "Join rejected, closing connection"
        );
        if let Ok(json) = serde_json::to_string(&WebSocketMessage::error(e.to_string())) {
            let _ = socket.send_message(json).await;
        }
        let _ = socket.close().await;
        return;
    }

    // Create the outbound channel (engine -> client) and register it
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connection_manager
        .add_connection(player.id.clone(), outbound_sender.clone())
        .await;

    // The fresh connection gets the canonical snapshot immediately, so
    // clients never reconstruct state from partial events.
    if let Ok(snapshot) = app_state.room_service.snapshot(&room_id).await {
        if let Ok(json) = serde_json::to_string(&WebSocketMessage::game_state(&snapshot)) {
            let _ = outbound_sender.send(json);
        }
    }

    let gateway = Arc::new(EventGateway::new(
        Arc::clone(&app_state.room_service),
        Arc::clone(&app_state.game_service),
        Arc::clone(&app_state.connection_manager),
    ));

    let connection = Connection::new(
        player.id.clone(),
        room_id.clone(),
        socket,
        outbound_receiver,
        gateway,
    );

    match connection.run().await {
        Ok(()) => {
            info!(
                room_id = %room_id,
                player_id = %player.id,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                room_id = %room_id,
                player_id = %player.id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    // A dropped transport does not remove membership; the roster only
    // changes on an explicit LEAVE_GAME. The armed turn deadline keeps
    // the game moving if the vanished player held the turn.
    app_state
        .connection_manager
        .remove_connection(&player.id)
        .await;
}
