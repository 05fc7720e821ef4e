use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::game::GameResult;
use crate::room::Room;
use crate::shared::AppError;
use crate::user::User;

/// Message types for WebSocket communication
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MessageType {
    // Client -> Server
    Login,
    CreateRoom,
    JoinRoom,
    StartGame,
    MakeMove,

    // Server -> Client
    LoginSuccess,
    RoomCreated,
    RoomJoined,
    RoomUpdated,
    GameOver,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
    pub player_id: Option<String>,
}

/// Envelope for every frame in both directions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub meta: Option<WebSocketMessageMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeMovePayload {
    pub room_id: String,
    /// Opaque to everything but the room's rules engine
    #[serde(rename = "move")]
    pub mv: serde_json::Value,
}

/// Inbound events, decoded from the envelope
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Login { name: String },
    CreateRoom { game_id: String },
    JoinRoom { room_id: String },
    StartGame { room_id: String },
    MakeMove { room_id: String, mv: serde_json::Value },
}

impl ClientEvent {
    pub fn from_message(message: WebSocketMessage) -> Result<Self, AppError> {
        let text_payload = |field: &str| {
            message
                .payload
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::InvalidPayload(format!(
                        "{} requires a {}",
                        message.message_type, field
                    ))
                })
        };

        match message.message_type {
            MessageType::Login => Ok(ClientEvent::Login {
                name: text_payload("name")?,
            }),
            MessageType::CreateRoom => Ok(ClientEvent::CreateRoom {
                game_id: text_payload("game id")?,
            }),
            MessageType::JoinRoom => Ok(ClientEvent::JoinRoom {
                room_id: text_payload("room id")?,
            }),
            MessageType::StartGame => Ok(ClientEvent::StartGame {
                room_id: text_payload("room id")?,
            }),
            MessageType::MakeMove => {
                let MakeMovePayload { room_id, mv } =
                    serde_json::from_value(message.payload.clone()).map_err(|_| {
                        AppError::InvalidPayload(
                            "make-move requires a room id and a move".to_string(),
                        )
                    })?;
                Ok(ClientEvent::MakeMove { room_id, mv })
            }
            other => Err(AppError::InvalidPayload(format!(
                "Unsupported event: {}",
                other
            ))),
        }
    }
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                player_id: None,
            }),
        }
    }

    fn with_payload<T: Serialize>(
        message_type: MessageType,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(message_type, serde_json::to_value(payload)?))
    }

    /// Create a login-success message
    pub fn login_success(user: &User) -> Result<Self, serde_json::Error> {
        Self::with_payload(MessageType::LoginSuccess, user)
    }

    /// Create a room-created message
    pub fn room_created(room: &Room) -> Result<Self, serde_json::Error> {
        Self::with_payload(MessageType::RoomCreated, room)
    }

    /// Create a room-joined message
    pub fn room_joined(room: &Room) -> Result<Self, serde_json::Error> {
        Self::with_payload(MessageType::RoomJoined, room)
    }

    /// Create a room-updated message
    pub fn room_updated(room: &Room) -> Result<Self, serde_json::Error> {
        Self::with_payload(MessageType::RoomUpdated, room)
    }

    /// Create a game-over message
    pub fn game_over(result: &GameResult) -> Result<Self, serde_json::Error> {
        Self::with_payload(MessageType::GameOver, result)
    }

    /// Create an error message; the payload is the bare message string
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(MessageType::Error, serde_json::Value::String(message.into()))
    }
}
