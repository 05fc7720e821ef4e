use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::game::{GameError, GameRegistry};
use crate::room::service::RoomService;
use crate::user::UserMappingService;
use crate::websockets::{ConnectionManager, EventDispatcher};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub game_registry: Arc<GameRegistry>,
    pub room_service: Arc<RoomService>,
    pub user_mapping: Arc<dyn UserMappingService>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub dispatcher: Arc<EventDispatcher>,
}

impl AppState {
    pub fn new(
        game_registry: Arc<GameRegistry>,
        room_service: Arc<RoomService>,
        user_mapping: Arc<dyn UserMappingService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        let dispatcher = Arc::new(EventDispatcher::new(
            room_service.clone(),
            user_mapping.clone(),
            connection_manager.clone(),
        ));

        Self {
            game_registry,
            room_service,
            user_mapping,
            connection_manager,
            dispatcher,
        }
    }
}

/// Errors surfaced at the lobby boundary.
///
/// The `Display` text of every variant is what the originating connection sees
/// in its `error` event.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Please login first")]
    AuthRequired,

    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is full")]
    RoomFull,

    #[error("Only host can start the game")]
    NotHost,

    #[error("Need at least {min} players to start")]
    InsufficientPlayers { min: usize },

    #[error("Unknown game: {0}")]
    UnknownGame(String),

    #[error("Game already started")]
    GameAlreadyStarted,

    #[error("Game is not in progress")]
    GameNotInProgress,

    #[error("{0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::AuthRequired => StatusCode::UNAUTHORIZED,
            AppError::RoomNotFound => StatusCode::NOT_FOUND,
            AppError::NotHost => StatusCode::FORBIDDEN,
            AppError::RoomFull | AppError::GameAlreadyStarted | AppError::GameNotInProgress => {
                StatusCode::CONFLICT
            }
            AppError::InsufficientPlayers { .. }
            | AppError::UnknownGame(_)
            | AppError::InvalidPayload(_)
            | AppError::Game(_) => StatusCode::BAD_REQUEST,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
