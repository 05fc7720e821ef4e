// Public API
pub use engine::{GameError, GameResult, GameRules, GameState, MoveOutcome, Seat};
pub use mahjong::{Mahjong, MahjongState, Phase};
pub use registry::{GameInfo, GameRegistry};
pub use tictactoe::{Mark, TicTacToe, TicTacToeState};
pub use tiles::{Tile, TileSuit};

// Internal modules
mod engine;
pub mod mahjong;
mod registry;
pub mod tictactoe;
pub mod tiles;
