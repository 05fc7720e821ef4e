use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::{models::Room, types::RoomSummary};
use crate::game::GameInfo;
use crate::shared::{AppError, AppState};

/// HTTP handler for the static game catalog
///
/// GET /games
pub async fn list_games(State(state): State<AppState>) -> Json<Vec<GameInfo>> {
    Json(state.game_registry.catalog())
}

/// HTTP handler for listing all rooms
///
/// GET /rooms
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<RoomSummary>>, AppError> {
    let rooms = state.room_service.list_rooms().await?;
    info!(room_count = rooms.len(), "Rooms listed successfully");

    Ok(Json(rooms.iter().map(RoomSummary::from).collect()))
}

/// HTTP handler for a single room snapshot
///
/// GET /rooms/:room_id
#[instrument(name = "get_room", skip(state))]
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, AppError> {
    state
        .room_service
        .get_room(&room_id)
        .await?
        .map(Json)
        .ok_or(AppError::RoomNotFound)
}
