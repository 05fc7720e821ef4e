use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{Room, RoomStatus},
    repository::{CreateRoomResult, JoinRoomResult, RoomRepository},
};
use crate::game::{GameRegistry, GameResult, GameRules, Seat};
use crate::shared::AppError;
use crate::user::User;

/// Role labels handed out by join order. The pool wraps around, so games
/// seating more than six players will see repeated labels.
pub const ROLE_SYMBOLS: [&str; 6] = ["X", "O", "A", "B", "C", "D"];

const MAX_ID_ATTEMPTS: usize = 16;

pub fn role_symbol(index: usize) -> &'static str {
    ROLE_SYMBOLS[index % ROLE_SYMBOLS.len()]
}

/// A move that was accepted and committed
#[derive(Debug, Clone)]
pub struct AppliedMove {
    pub room: Room,
    /// Present when the move ended the game
    pub game_over: Option<GameResult>,
}

/// Session manager: owns room lifecycle and membership and hands moves to the
/// rules engine registered for each room's game type.
///
/// Every operation is a read-modify-write on the repository. Callers must not
/// run two operations concurrently; the websocket dispatcher serialises them.
pub struct RoomService {
    repository: Arc<dyn RoomRepository>,
    game_registry: Arc<GameRegistry>,
}

impl RoomService {
    pub fn new(repository: Arc<dyn RoomRepository>, game_registry: Arc<GameRegistry>) -> Self {
        Self {
            repository,
            game_registry,
        }
    }

    /// Creates a waiting room hosted by `host` with a freshly generated id
    #[instrument(skip(self, host), fields(host_id = %host.id))]
    pub async fn create_room(&self, host: User, game_type: &str) -> Result<Room, AppError> {
        if self.game_registry.info(game_type).is_none() {
            warn!(game_type = %game_type, "Room requested for unknown game");
            return Err(AppError::UnknownGame(game_type.to_string()));
        }

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let room = Room::new(Room::generate_id(), host.clone(), game_type.to_string());
            debug!(room_id = %room.id, attempt, "Generated room ID");

            if self.repository.create_room(&room).await? == CreateRoomResult::Created {
                info!(
                    room_id = %room.id,
                    host_name = %host.name,
                    game_type = %game_type,
                    "Room created successfully"
                );
                return Ok(room);
            }
        }

        warn!(attempts = MAX_ID_ATTEMPTS, "Could not find a free room id");
        Err(AppError::Internal)
    }

    /// Adds `user` to the room. Joining a room one already belongs to returns
    /// the room unchanged.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn join_room(&self, user: User, room_id: &str) -> Result<Room, AppError> {
        let room = self.get_room_or_error(room_id).await?;
        let max_players = self
            .game_registry
            .info(&room.game_type)
            .map(|info| info.max_players)
            .ok_or_else(|| AppError::UnknownGame(room.game_type.clone()))?;

        match self
            .repository
            .try_join_room(room_id, &user, max_players)
            .await?
        {
            JoinRoomResult::Joined(room) | JoinRoomResult::AlreadyMember(room) => Ok(room),
            JoinRoomResult::RoomFull => Err(AppError::RoomFull),
            JoinRoomResult::GameAlreadyStarted => Err(AppError::GameAlreadyStarted),
            JoinRoomResult::RoomNotFound => Err(AppError::RoomNotFound),
        }
    }

    /// Moves a waiting room to `playing`: builds the initial game state and
    /// seats every player in join order.
    #[instrument(skip(self))]
    pub async fn start_game(&self, requester_id: &str, room_id: &str) -> Result<Room, AppError> {
        let mut room = self.get_room_or_error(room_id).await?;

        if !room.is_host(requester_id) {
            return Err(AppError::NotHost);
        }
        if room.status != RoomStatus::Waiting {
            return Err(AppError::GameAlreadyStarted);
        }

        let info = self
            .game_registry
            .info(&room.game_type)
            .ok_or_else(|| AppError::UnknownGame(room.game_type.clone()))?;
        if room.player_count() < info.min_players {
            return Err(AppError::InsufficientPlayers {
                min: info.min_players,
            });
        }

        let rules = self.rules_for(&room)?;
        let seats: Vec<Seat> = room
            .players
            .iter()
            .enumerate()
            .map(|(index, player)| Seat {
                player_id: player.id.clone(),
                symbol: role_symbol(index).to_string(),
            })
            .collect();
        let state = rules.seat_players(rules.initial_state(), &seats)?;

        room.game_state = Some(state);
        room.status = RoomStatus::Playing;
        self.repository.save_room(&room).await?;

        info!(
            room_id = %room.id,
            game_type = %room.game_type,
            players = room.player_count(),
            "Game started"
        );

        Ok(room)
    }

    /// Validates and applies a move through the room's rules engine. A move
    /// that ends the game also moves the room to `finished`.
    #[instrument(skip(self, mv))]
    pub async fn make_move(
        &self,
        user_id: &str,
        room_id: &str,
        mv: &serde_json::Value,
    ) -> Result<AppliedMove, AppError> {
        let mut room = self.get_room_or_error(room_id).await?;
        if room.status != RoomStatus::Playing {
            return Err(AppError::GameNotInProgress);
        }

        let rules = self.rules_for(&room)?;
        let state = room
            .game_state
            .as_ref()
            .ok_or(AppError::GameNotInProgress)?;

        let outcome = rules.process_move(state, mv, user_id).map_err(|e| {
            debug!(room_id = %room_id, user_id = %user_id, error = %e, "Move rejected");
            AppError::from(e)
        })?;

        room.game_state = Some(outcome.new_state);
        let game_over = outcome.result.filter(|result| result.is_game_over);
        if let Some(result) = &game_over {
            room.status = RoomStatus::Finished;
            info!(
                room_id = %room.id,
                winner = ?result.winner_id,
                "Game finished"
            );
        }
        self.repository.save_room(&room).await?;

        Ok(AppliedMove { room, game_over })
    }

    pub async fn get_room(&self, room_id: &str) -> Result<Option<Room>, AppError> {
        self.repository.get_room(room_id).await
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>, AppError> {
        self.repository.list_rooms().await
    }

    async fn get_room_or_error(&self, room_id: &str) -> Result<Room, AppError> {
        self.repository
            .get_room(room_id)
            .await?
            .ok_or(AppError::RoomNotFound)
    }

    fn rules_for(&self, room: &Room) -> Result<Box<dyn GameRules>, AppError> {
        self.game_registry
            .lookup(&room.game_type)
            .ok_or_else(|| AppError::UnknownGame(room.game_type.clone()))
    }
}
