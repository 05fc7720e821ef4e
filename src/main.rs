use axum::{routing::get, Router};
use gamelobby::{
    room, websockets::websocket_handler, AppState, GameRegistry, InMemoryConnectionManager,
    InMemoryRoomRepository, InMemoryUserMappingService, RoomService, ServerConfig,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_filter)?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting game lobby server");

    // Create shared application state with dependency injection
    let game_registry = Arc::new(GameRegistry::new());
    let room_service = Arc::new(RoomService::new(
        Arc::new(InMemoryRoomRepository::new()),
        game_registry.clone(),
    ));
    let app_state = AppState::new(
        game_registry,
        room_service,
        Arc::new(InMemoryUserMappingService::new()),
        Arc::new(InMemoryConnectionManager::new()),
    );

    let app = Router::new()
        .route("/", get(|| async { "Game lobby server" }))
        .route("/health", get(|| async { "OK" }))
        .route("/games", get(room::list_games))
        .route("/rooms", get(room::list_rooms))
        .route("/rooms/:room_id", get(room::get_room))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    info!(addr = %config.listen_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
