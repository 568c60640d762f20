use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::event::{EventBus, RoomEvent};
use crate::quiz::{QuestionFeed, QuestionSource};
use crate::room::models::{RoomState, RoomStatus, MIN_PLAYERS};
use crate::room::registry::RoomRegistry;
use crate::shared::AppError;

use super::scheduler::TurnScheduler;
use super::scoring::{classify, Outcome};
use super::session::GameSession;

/// Orchestrates one room's game lifecycle: waiting -> in_progress ->
/// finished.
///
/// Every public entry point validates before mutating, holds the room's
/// lock for the whole transition, and emits the resulting domain events
/// while still under the lock so broadcasts observe a consistent order.
pub struct GameSessionService {
    registry: Arc<RoomRegistry>,
    question_source: Arc<dyn QuestionSource>,
    scheduler: Arc<TurnScheduler>,
    event_bus: EventBus,
}

impl GameSessionService {
    pub fn new(
        registry: Arc<RoomRegistry>,
        question_source: Arc<dyn QuestionSource>,
        scheduler: Arc<TurnScheduler>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            registry,
            question_source,
            scheduler,
            event_bus,
        }
    }

    /// Starts the game: draws the question run, freezes the turn order,
    /// and arms the first deadline.
    #[instrument(skip(self))]
    pub async fn start_game(&self, room_id: &str, requester_id: &str) -> Result<(), AppError> {
        let cell = self.registry.resolve(room_id)?;
        let mut state = cell.state.lock().await;

        if !state.model.has_member(requester_id) {
            return Err(AppError::NotAMember);
        }
        if state.model.creator_id != requester_id {
            return Err(AppError::NotCreator);
        }
        match state.model.status {
            RoomStatus::InProgress => return Err(AppError::GameAlreadyStarted),
            RoomStatus::Finished => return Err(AppError::GameAlreadyFinished),
            RoomStatus::Waiting => {}
        }
        if state.model.member_count() < MIN_PLAYERS {
            return Err(AppError::InsufficientPlayers(MIN_PLAYERS));
        }

        // The draw may take a while against a real source; members see a
        // loading indicator until the started state lands.
        self.event_bus
            .emit_to_room(room_id, RoomEvent::QuestionsLoading)
            .await;

        let feed = match QuestionFeed::draw(self.question_source.as_ref(), &state.model.topic).await
        {
            Ok(feed) => feed,
            Err(e) => {
                // Clear the loading indicator; the room stays waiting
                self.event_bus
                    .emit_to_room(
                        room_id,
                        RoomEvent::StateChanged {
                            state: state.snapshot(),
                        },
                    )
                    .await;
                return Err(e);
            }
        };

        let turn_order = state.model.members.clone();
        let mut session = GameSession::new(feed.into_questions(), turn_order);
        let deadline = self.scheduler.arm(room_id, session.turn_epoch());
        session.set_turn_deadline(Some(deadline));

        info!(
            room_id = %room_id,
            questions = session.question_count(),
            players = session.turn_order().len(),
            first_player = %session.current_player().id,
            "Game started"
        );

        state.model.status = RoomStatus::InProgress;
        state.session = Some(session);
        state.model.touch();

        let snapshot = state.snapshot();
        self.event_bus
            .emit_to_room(
                room_id,
                RoomEvent::GameStarted {
                    state: snapshot.clone(),
                },
            )
            .await;
        self.event_bus
            .emit_to_room(room_id, RoomEvent::StateChanged { state: snapshot })
            .await;

        Ok(())
    }

    /// Resolves the current turn with the submitted answer.
    ///
    /// Only the current turn-holder may submit; an absent answer counts
    /// as a deliberate no-answer.
    #[instrument(skip(self, answer))]
    pub async fn submit_answer(
        &self,
        room_id: &str,
        requester_id: &str,
        answer: Option<String>,
    ) -> Result<(), AppError> {
        let cell = self.registry.resolve(room_id)?;
        let mut state = cell.state.lock().await;

        if !state.model.has_member(requester_id) {
            return Err(AppError::NotAMember);
        }
        match state.model.status {
            RoomStatus::Waiting => return Err(AppError::GameNotStarted),
            RoomStatus::Finished => return Err(AppError::GameAlreadyFinished),
            RoomStatus::InProgress => {}
        }

        let session = state.session.as_ref().ok_or(AppError::Internal)?;
        if session.current_player().id != requester_id {
            return Err(AppError::NotYourTurn);
        }
        let correct_answer = session
            .current_question()
            .map(|q| q.correct_answer.clone())
            .ok_or(AppError::Internal)?;

        let outcome = classify(answer.as_deref(), &correct_answer);
        self.resolve_turn(room_id, &mut state, outcome).await;

        Ok(())
    }

    /// Creator-only: forces the transition to finished regardless of
    /// remaining questions.
    #[instrument(skip(self))]
    pub async fn end_game(&self, room_id: &str, requester_id: &str) -> Result<(), AppError> {
        let cell = self.registry.resolve(room_id)?;
        let mut state = cell.state.lock().await;

        if !state.model.has_member(requester_id) {
            return Err(AppError::NotAMember);
        }
        if state.model.creator_id != requester_id {
            return Err(AppError::NotCreator);
        }
        match state.model.status {
            RoomStatus::Waiting => return Err(AppError::GameNotStarted),
            RoomStatus::Finished => return Err(AppError::GameAlreadyFinished),
            RoomStatus::InProgress => {}
        }

        info!(room_id = %room_id, requester = %requester_id, "Game ended by creator");
        self.finish(room_id, &mut state).await;

        Ok(())
    }

    /// Resolves a fired turn deadline as a no-answer.
    ///
    /// A submit racing the expiry is decided by whoever takes the room
    /// lock first; the loser sees a bumped epoch here and no-ops.
    pub async fn resolve_expired(&self, room_id: &str, epoch: u64) {
        let Some(cell) = self.registry.get(room_id) else {
            return;
        };
        let mut state = cell.state.lock().await;

        if state.model.status != RoomStatus::InProgress {
            return;
        }
        let Some(session) = state.session.as_ref() else {
            return;
        };
        if session.turn_epoch() != epoch {
            debug!(
                room_id = %room_id,
                fired_epoch = epoch,
                current_epoch = session.turn_epoch(),
                "Stale turn expiry ignored"
            );
            return;
        }

        info!(
            room_id = %room_id,
            player = %session.current_player().id,
            "Turn deadline expired, resolving as no-answer"
        );
        self.resolve_turn(room_id, &mut state, Outcome::NoAnswer).await;
    }

    /// Called by the room service, under the room lock, when the current
    /// turn-holder leaves mid-game. The turn passes to the next rotation
    /// player still on the roster without consuming a question; with no
    /// such player left, the session finishes.
    pub async fn hand_off_turn(&self, room_id: &str, state: &mut RoomState) {
        if state.model.status != RoomStatus::InProgress {
            return;
        }

        let handed = match state.session.as_mut() {
            Some(session) => session.hand_off_turn(&state.model.members),
            None => return,
        };

        if handed {
            if let Some(session) = state.session.as_mut() {
                let deadline = self.scheduler.arm(room_id, session.turn_epoch());
                session.set_turn_deadline(Some(deadline));
                debug!(
                    room_id = %room_id,
                    next_player = %session.current_player().id,
                    "Turn handed off after departure"
                );
            }
        } else {
            info!(room_id = %room_id, "No rotation player left, finishing game");
            self.finish(room_id, state).await;
        }
    }

    /// Applies one turn resolution: score delta, outcome broadcast,
    /// advance, re-arm, score broadcast, canonical snapshot.
    async fn resolve_turn(&self, room_id: &str, state: &mut RoomState, outcome: Outcome) {
        let player = match state.session.as_ref() {
            Some(session) => session.current_player().clone(),
            None => return,
        };

        *state.model.scores.entry(player.id.clone()).or_insert(0) += outcome.delta();

        info!(
            room_id = %room_id,
            player = %player.id,
            outcome = ?outcome,
            score = state.model.scores[&player.id],
            "Turn resolved"
        );

        self.event_bus
            .emit_to_room(
                room_id,
                RoomEvent::AnswerResolved {
                    player: player.clone(),
                    outcome,
                },
            )
            .await;

        let exhausted = match state.session.as_mut() {
            Some(session) => session.advance_turn(),
            None => return,
        };
        state.model.touch();

        if exhausted {
            self.event_bus
                .emit_to_room(
                    room_id,
                    RoomEvent::ScoresUpdated {
                        scores: state.model.scores.clone(),
                    },
                )
                .await;
            self.finish(room_id, state).await;
        } else {
            if let Some(session) = state.session.as_mut() {
                let deadline = self.scheduler.arm(room_id, session.turn_epoch());
                session.set_turn_deadline(Some(deadline));
            }
            self.event_bus
                .emit_to_room(
                    room_id,
                    RoomEvent::ScoresUpdated {
                        scores: state.model.scores.clone(),
                    },
                )
                .await;
            self.event_bus
                .emit_to_room(
                    room_id,
                    RoomEvent::StateChanged {
                        state: state.snapshot(),
                    },
                )
                .await;
        }
    }

    /// Terminal transition. After this no submit/start/end is accepted.
    async fn finish(&self, room_id: &str, state: &mut RoomState) {
        self.scheduler.cancel(room_id);

        state.model.status = RoomStatus::Finished;
        if let Some(session) = state.session.as_mut() {
            session.set_turn_deadline(None);
        }
        state.model.touch();

        let scoreboard = state
            .session
            .as_ref()
            .map(|s| s.final_scoreboard(&state.model.scores, &state.model.members))
            .unwrap_or_default();

        info!(
            room_id = %room_id,
            entries = scoreboard.len(),
            "Final scoreboard computed"
        );

        self.event_bus
            .emit_to_room(room_id, RoomEvent::GameEnded { scoreboard })
            .await;
        self.event_bus
            .emit_to_room(
                room_id,
                RoomEvent::StateChanged {
                    state: state.snapshot(),
                },
            )
            .await;
    }
}
