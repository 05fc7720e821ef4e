// Library crate for the game lobby server
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod game;
pub mod room;
pub mod shared;
pub mod user;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use game::{GameRegistry, GameResult, GameRules, GameState};
pub use room::{repository::InMemoryRoomRepository, Room, RoomService, RoomStatus};
pub use shared::{AppError, AppState};
pub use user::{InMemoryUserMappingService, User, UserMappingService};
pub use websockets::{
    ClientEvent, ConnectionManager, EventDispatcher, InMemoryConnectionManager, MessageHandler,
    MessageType, WebSocketMessage,
};
