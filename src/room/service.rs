use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::models::{GameStateSnapshot, Player, RoomStatus};
use super::registry::RoomRegistry;
use super::types::RoomSummary;
use crate::event::{EventBus, RoomEvent, RoomEventHandler, RoomSubscription};
use crate::game::{GameSessionService, TurnScheduler};
use crate::shared::AppError;

/// Service for room lifecycle: create, join, leave, evict.
///
/// Game transitions live in the game service; this one owns the roster
/// and everything that happens to it, including the creator-promotion
/// policy and turn hand-off when the turn-holder walks out.
pub struct RoomService {
    registry: Arc<RoomRegistry>,
    event_bus: EventBus,
    game_service: Arc<GameSessionService>,
    scheduler: Arc<TurnScheduler>,
    /// Handlers subscribed to every new room's event channel
    subscribers: Vec<Arc<dyn RoomEventHandler>>,
}

impl RoomService {
    pub fn new(
        registry: Arc<RoomRegistry>,
        event_bus: EventBus,
        game_service: Arc<GameSessionService>,
        scheduler: Arc<TurnScheduler>,
        subscribers: Vec<Arc<dyn RoomEventHandler>>,
    ) -> Self {
        Self {
            registry,
            event_bus,
            game_service,
            scheduler,
            subscribers,
        }
    }

    /// Creates a room with the caller as creator and sole member.
    #[instrument(skip(self, creator), fields(creator_id = %creator.id))]
    pub async fn create_room(
        &self,
        creator: Player,
        topic: &str,
        requested_id: Option<String>,
    ) -> Result<RoomSummary, AppError> {
        if topic.trim().is_empty() {
            return Err(AppError::InvalidTopic);
        }

        let cell = self
            .registry
            .create_room(creator, topic.to_string(), requested_id)?;

        // Wire this room's event channel to the standing subscribers
        // (broadcast fan-out, turn-expiry resolution). The tasks end when
        // the room is evicted and its channel dropped.
        for handler in &self.subscribers {
            RoomSubscription::new(
                cell.room_id.clone(),
                Arc::clone(handler),
                self.event_bus.clone(),
            )
            .start()
            .await;
        }

        let state = cell.state.lock().await;
        info!(
            room_id = %cell.room_id,
            topic = %state.model.topic,
            "Room created"
        );
        Ok(RoomSummary::from_model(&state.model))
    }

    /// Adds a player to the room.
    ///
    /// Calling again as an existing member is an idempotent success, so
    /// client retries and reconnects are harmless.
    #[instrument(skip(self, player), fields(player_id = %player.id))]
    pub async fn join_room(&self, room_id: &str, player: Player) -> Result<RoomSummary, AppError> {
        let cell = self.registry.resolve(room_id)?;
        let mut state = cell.state.lock().await;

        if state.model.has_member(&player.id) {
            debug!(room_id = %room_id, player_id = %player.id, "Already a member, join is a no-op");
            return Ok(RoomSummary::from_model(&state.model));
        }
        if state.model.status == RoomStatus::Finished {
            return Err(AppError::GameAlreadyFinished);
        }
        if state.model.is_full() {
            return Err(AppError::RoomFull);
        }

        state.model.add_member(player.clone());
        state.model.touch();

        info!(
            room_id = %room_id,
            player_id = %player.id,
            members = state.model.member_count(),
            "Player joined room"
        );

        self.event_bus
            .emit_to_room(room_id, RoomEvent::PlayerJoined { player })
            .await;
        self.event_bus
            .emit_to_room(
                room_id,
                RoomEvent::StateChanged {
                    state: state.snapshot(),
                },
            )
            .await;

        Ok(RoomSummary::from_model(&state.model))
    }

    /// Removes a member. Last member out evicts the room; a departing
    /// creator promotes the earliest-joined remaining member; a departing
    /// turn-holder hands the turn off immediately.
    #[instrument(skip(self))]
    pub async fn leave_room(&self, room_id: &str, player_id: &str) -> Result<(), AppError> {
        let cell = self.registry.resolve(room_id)?;
        let mut state = cell.state.lock().await;

        let Some(player) = state.model.remove_member(player_id) else {
            return Err(AppError::NotAMember);
        };
        state.model.touch();

        info!(
            room_id = %room_id,
            player_id = %player_id,
            members = state.model.member_count(),
            "Player left room"
        );

        if state.model.members.is_empty() {
            drop(state);
            self.evict_room(room_id).await;
            return Ok(());
        }

        self.event_bus
            .emit_to_room(room_id, RoomEvent::PlayerLeft { player: player.clone() })
            .await;

        if state.model.creator_id == player_id {
            // Promotion policy: the earliest-joined remaining member
            // inherits start/end privileges.
            let new_creator = state.model.members[0].clone();
            state.model.creator_id = new_creator.id.clone();
            info!(
                room_id = %room_id,
                old_creator = %player_id,
                new_creator = %new_creator.id,
                "Creator left, promoting next member"
            );
            self.event_bus
                .emit_to_room(room_id, RoomEvent::CreatorChanged { creator: new_creator })
                .await;
        }

        let was_in_progress = state.model.status == RoomStatus::InProgress;
        let held_turn = state
            .session
            .as_ref()
            .map(|s| s.current_player().id == player_id)
            .unwrap_or(false);

        if was_in_progress && held_turn {
            self.game_service.hand_off_turn(room_id, &mut state).await;
        }

        // The hand-off may have finished the game, in which case the
        // canonical snapshot already went out.
        let finished_by_hand_off =
            was_in_progress && state.model.status == RoomStatus::Finished;
        if !finished_by_hand_off {
            self.event_bus
                .emit_to_room(
                    room_id,
                    RoomEvent::StateChanged {
                        state: state.snapshot(),
                    },
                )
                .await;
        }

        Ok(())
    }

    /// Lists all active rooms for the lobby.
    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        let mut summaries = Vec::new();
        for cell in self.registry.cells() {
            let state = cell.state.lock().await;
            summaries.push(RoomSummary::from_model(&state.model));
        }
        summaries
    }

    /// Canonical snapshot of one room, as sent to a freshly connected
    /// member.
    pub async fn snapshot(&self, room_id: &str) -> Result<GameStateSnapshot, AppError> {
        let cell = self.registry.resolve(room_id)?;
        let state = cell.state.lock().await;
        Ok(state.snapshot())
    }

    /// Room ids whose status and idle time make them eligible for
    /// eviction. In-progress rooms are never idle-evicted; the turn
    /// deadline keeps them moving instead.
    pub async fn idle_rooms(&self, grace: std::time::Duration) -> Vec<String> {
        let grace = chrono::Duration::from_std(grace).unwrap_or(chrono::Duration::seconds(300));
        let cutoff = chrono::Utc::now() - grace;

        let mut idle = Vec::new();
        for cell in self.registry.cells() {
            let state = cell.state.lock().await;
            let evictable = matches!(
                state.model.status,
                RoomStatus::Waiting | RoomStatus::Finished
            );
            if evictable && state.model.last_activity_at < cutoff {
                idle.push(cell.room_id.clone());
            }
        }
        idle
    }

    /// Tears a room down: registry entry, armed timer, event channel.
    pub async fn evict_room(&self, room_id: &str) {
        self.registry.remove(room_id);
        self.scheduler.cancel(room_id);
        self.event_bus.remove_room(room_id).await;
        info!(room_id = %room_id, "Room evicted");
    }
}
