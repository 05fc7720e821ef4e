use serde::{Deserialize, Serialize};

use super::models::{Room, RoomStatus};

/// Lobby listing entry; leaves out members and game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: String,
    pub host_id: String,
    pub game_type: String,
    pub status: RoomStatus,
    pub player_count: usize,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            host_id: room.host_id.clone(),
            game_type: room.game_type.clone(),
            status: room.status,
            player_count: room.player_count(),
        }
    }
}
