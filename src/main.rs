use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relayquiz::config::EngineConfig;
use relayquiz::event::{EventBus, RoomEventHandler};
use relayquiz::game::{GameSessionService, GameSessionSubscriber, TurnScheduler};
use relayquiz::quiz::InMemoryQuestionSource;
use relayquiz::room::registry::RoomRegistry;
use relayquiz::room::service::RoomService;
use relayquiz::room::{self, CleanupConfig};
use relayquiz::session::service::SessionService;
use relayquiz::session::token::TokenConfig;
use relayquiz::shared::AppState;
use relayquiz::websockets::{
    self, ConnectionManager, InMemoryConnectionManager, WebSocketRoomSubscriber,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relayquiz=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env();
    info!(bind_addr = %config.bind_addr, "Starting relayquiz room engine");

    // Wire up shared application state
    let registry = Arc::new(RoomRegistry::new());
    let event_bus = EventBus::new();
    let scheduler = Arc::new(TurnScheduler::new(event_bus.clone(), config.turn_timeout));
    let connection_manager = Arc::new(InMemoryConnectionManager::new());

    // Stand-in for the external question generator; swap for the real
    // QuestionSource implementation in production.
    let question_source = Arc::new(InMemoryQuestionSource::with_demo_set());

    let game_service = Arc::new(GameSessionService::new(
        Arc::clone(&registry),
        question_source,
        Arc::clone(&scheduler),
        event_bus.clone(),
    ));

    let subscribers: Vec<Arc<dyn RoomEventHandler>> = vec![
        Arc::new(WebSocketRoomSubscriber::new(
            Arc::clone(&registry),
            connection_manager.clone() as Arc<dyn ConnectionManager>,
        )),
        Arc::new(GameSessionSubscriber::new(Arc::clone(&game_service))),
    ];

    let room_service = Arc::new(RoomService::new(
        Arc::clone(&registry),
        event_bus.clone(),
        Arc::clone(&game_service),
        Arc::clone(&scheduler),
        subscribers,
    ));

    let app_state = AppState {
        config: config.clone(),
        session_service: Arc::new(SessionService::new(TokenConfig::new())),
        room_service: Arc::clone(&room_service),
        game_service,
        registry,
        connection_manager,
        event_bus,
    };

    // Idle rooms are evicted in the background
    tokio::spawn(room::start_cleanup_task(
        room_service,
        CleanupConfig {
            cleanup_interval: config.cleanup_interval,
            idle_grace: config.idle_grace,
        },
    ));

    let app = Router::new()
        .route("/session", post(relayquiz::session::create_session))
        .route("/room", post(room::create_room))
        .route("/room/:room_id/join", post(room::join_room))
        .route("/rooms", get(room::list_rooms))
        .route("/ws/:room_id", get(websockets::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap();
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.unwrap();
}
