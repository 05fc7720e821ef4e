use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use super::models::{Room, RoomStatus};
use crate::shared::AppError;
use crate::user::User;

/// Result of attempting to create a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateRoomResult {
    Created,
    /// Another room already uses this id
    IdTaken,
}

/// Result of attempting to join a room
#[derive(Debug, Clone)]
pub enum JoinRoomResult {
    /// Player was appended, returns updated room data
    Joined(Room),
    /// Player was already a member; the room is unchanged
    AlreadyMember(Room),
    /// Room is at capacity for its game type
    RoomFull,
    /// Room has seats left but has left the waiting state
    GameAlreadyStarted,
    /// Room does not exist
    RoomNotFound,
}

/// Trait for room repository operations
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create_room(&self, room: &Room) -> Result<CreateRoomResult, AppError>;
    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, AppError>;
    async fn list_rooms(&self) -> Result<Vec<Room>, AppError>;

    /// Replaces a stored room with `room`. Fails with `RoomNotFound` if no room
    /// with that id exists.
    async fn save_room(&self, room: &Room) -> Result<(), AppError>;

    /// Atomically checks membership and capacity and appends the player
    async fn try_join_room(
        &self,
        room_id: &str,
        user: &User,
        max_players: usize,
    ) -> Result<JoinRoomResult, AppError>;
}

/// In-memory implementation of RoomRepository. Rooms live for the lifetime of
/// the process.
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<String, Room>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    fn rooms(&self) -> Result<MutexGuard<'_, HashMap<String, Room>>, AppError> {
        self.rooms.lock().map_err(|_| {
            warn!("Room map lock poisoned");
            AppError::Internal
        })
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self, room), fields(room_id = %room.id))]
    async fn create_room(&self, room: &Room) -> Result<CreateRoomResult, AppError> {
        let mut rooms = self.rooms()?;
        if rooms.contains_key(&room.id) {
            warn!(room_id = %room.id, "Room id already taken");
            return Ok(CreateRoomResult::IdTaken);
        }
        rooms.insert(room.id.clone(), room.clone());

        debug!(room_id = %room.id, "Room stored in memory");
        Ok(CreateRoomResult::Created)
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: &str) -> Result<Option<Room>, AppError> {
        let room = self.rooms()?.get(room_id).cloned();

        match &room {
            Some(r) => debug!(room_id = %room_id, status = %r.status, "Room found in memory"),
            None => debug!(room_id = %room_id, "Room not found in memory"),
        }

        Ok(room)
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<Room>, AppError> {
        let mut rooms: Vec<Room> = self.rooms()?.values().cloned().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rooms)
    }

    #[instrument(skip(self, room), fields(room_id = %room.id))]
    async fn save_room(&self, room: &Room) -> Result<(), AppError> {
        let mut rooms = self.rooms()?;
        match rooms.get_mut(&room.id) {
            Some(stored) => {
                *stored = room.clone();
                debug!(room_id = %room.id, status = %room.status, "Room saved");
                Ok(())
            }
            None => Err(AppError::RoomNotFound),
        }
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn try_join_room(
        &self,
        room_id: &str,
        user: &User,
        max_players: usize,
    ) -> Result<JoinRoomResult, AppError> {
        let mut rooms = self.rooms()?;

        let room = match rooms.get_mut(room_id) {
            Some(room) => room,
            None => {
                debug!(room_id = %room_id, "Room not found");
                return Ok(JoinRoomResult::RoomNotFound);
            }
        };

        // Members may always re-join, even once the game is running
        if room.has_player(&user.id) {
            debug!(room_id = %room_id, user_id = %user.id, "Player already in room");
            return Ok(JoinRoomResult::AlreadyMember(room.clone()));
        }

        // Capacity wins over status: a full room reports full even mid-game
        if room.player_count() >= max_players {
            debug!(room_id = %room_id, current_count = room.player_count(), "Room is full");
            return Ok(JoinRoomResult::RoomFull);
        }

        if room.status != RoomStatus::Waiting {
            debug!(room_id = %room_id, status = %room.status, "Room no longer accepts players");
            return Ok(JoinRoomResult::GameAlreadyStarted);
        }

        room.add_player(user.clone());

        info!(
            room_id = %room_id,
            user_id = %user.id,
            new_player_count = room.player_count(),
            "Player joined room"
        );

        Ok(JoinRoomResult::Joined(room.clone()))
    }
}
