use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::game::GameState;
use crate::user::User;

/// Room lifecycle. Only ever moves forward: waiting → playing → finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

/// A game session container, broadcast to clients as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    /// Creator of the room; the only user allowed to start the game.
    pub host_id: String,
    /// Join order, which is also turn order once the game starts.
    pub players: Vec<User>,
    pub game_type: String,
    pub status: RoomStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameState>,
}

impl Room {
    /// Creates a waiting room with the host as its only player.
    pub fn new(id: String, host: User, game_type: String) -> Self {
        Self {
            id,
            host_id: host.id.clone(),
            players: vec![host],
            game_type,
            status: RoomStatus::Waiting,
            game_state: None,
        }
    }

    /// Generates a short, human-friendly room id
    pub fn generate_id() -> String {
        petname::Petnames::default().generate_one(2, "-")
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn has_player(&self, user_id: &str) -> bool {
        self.players.iter().any(|p| p.id == user_id)
    }

    pub fn is_host(&self, user_id: &str) -> bool {
        self.host_id == user_id
    }

    pub fn player_ids(&self) -> Vec<String> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    /// Appends the user unless already present. Returns whether it was added.
    pub fn add_player(&mut self, user: User) -> bool {
        if self.has_player(&user.id) {
            return false;
        }
        self.players.push(user);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new("alice-id", "Alice")
    }

    #[test]
    fn test_new_room_is_waiting_with_host_seated() {
        let room = Room::new("room-1".to_string(), alice(), "tictactoe".to_string());
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.host_id, "alice-id");
        assert_eq!(room.players, vec![alice()]);
        assert!(room.game_state.is_none());
    }

    #[test]
    fn test_add_player_is_idempotent() {
        let mut room = Room::new("room-1".to_string(), alice(), "tictactoe".to_string());
        assert!(room.add_player(User::new("bob-id", "Bob")));
        assert!(!room.add_player(User::new("bob-id", "Bob")));
        assert_eq!(room.player_count(), 2);
        assert_eq!(room.player_ids(), vec!["alice-id", "bob-id"]);
    }

    #[test]
    fn test_generated_ids_are_not_empty() {
        assert!(!Room::generate_id().is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let room = Room::new("room-1".to_string(), alice(), "mahjong".to_string());
        let value = serde_json::to_value(&room).unwrap();
        assert_eq!(value["hostId"], "alice-id");
        assert_eq!(value["gameType"], "mahjong");
        assert_eq!(value["status"], "waiting");
        assert_eq!(value["players"][0]["name"], "Alice");
        assert!(value.get("gameState").is_none());
        assert_eq!(RoomStatus::Playing.to_string(), "playing");
    }
}
