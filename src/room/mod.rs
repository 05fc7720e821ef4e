// Public API - what other modules can use
pub use handlers::{get_room, list_games, list_rooms};
pub use models::{Room, RoomStatus};
pub use service::{AppliedMove, RoomService};
pub use types::RoomSummary;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod types;
