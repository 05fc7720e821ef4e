use serde::{Deserialize, Serialize};

use super::{mahjong::MahjongState, tictactoe::TicTacToeState};

/// Errors raised by a rules engine while validating a move.
///
/// The `Display` text is what ends up in the `error` event sent back to the
/// player, so keep it short and human readable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Not your turn")]
    NotYourTurn,
    #[error("You are not a player in this game")]
    PlayerNotInGame,
    #[error("{0}")]
    IllegalMove(String),
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Game state does not belong to this game")]
    StateMismatch,
    #[error("Seat symbol {0} is not supported by this game")]
    UnsupportedSeat(String),
}

impl GameError {
    pub fn illegal(msg: impl Into<String>) -> Self {
        GameError::IllegalMove(msg.into())
    }
}

/// Terminal check outcome. A finished game with no winner is a draw.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub is_game_over: bool,
    pub winner_id: Option<String>,
}

impl GameResult {
    pub fn in_progress() -> Self {
        Self::default()
    }

    pub fn draw() -> Self {
        Self {
            is_game_over: true,
            winner_id: None,
        }
    }

    pub fn won_by(winner: impl Into<String>) -> Self {
        Self {
            is_game_over: true,
            winner_id: Some(winner.into()),
        }
    }
}

/// Authoritative state of a running game.
///
/// Only the rules engine of the matching game interprets the inner value; the
/// room layer stores and broadcasts it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameState {
    TicTacToe(TicTacToeState),
    Mahjong(MahjongState),
}

/// A role binding handed to the rules engine when the game starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub player_id: String,
    pub symbol: String,
}

/// Result of applying a valid move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub new_state: GameState,
    pub result: Option<GameResult>,
}

impl MoveOutcome {
    pub fn continues(new_state: GameState) -> Self {
        Self {
            new_state,
            result: None,
        }
    }
}

/// Turn-based rules for one game type.
///
/// Implementations are pure: no I/O and no knowledge of rooms or sockets.
/// Every call returns a fresh state value, the input state is never mutated.
pub trait GameRules: Send + Sync {
    /// Fresh state with no players bound yet.
    fn initial_state(&self) -> GameState;

    /// Binds players to their seats, in turn order, right after `initial_state`.
    /// Game-specific setup such as dealing happens here.
    fn seat_players(&self, state: GameState, seats: &[Seat]) -> Result<GameState, GameError>;

    /// Validates `mv` for `player_id` and applies it.
    ///
    /// `mv` is the raw move payload from the client; each game decodes its own
    /// move shape and rejects anything it does not understand.
    fn process_move(
        &self,
        state: &GameState,
        mv: &serde_json::Value,
        player_id: &str,
    ) -> Result<MoveOutcome, GameError>;

    fn check_win_condition(&self, state: &GameState) -> GameResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_wire_shape() {
        let value = serde_json::to_value(GameResult::won_by("X")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "isGameOver": true, "winnerId": "X" })
        );

        let value = serde_json::to_value(GameResult::draw()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "isGameOver": true, "winnerId": null })
        );
        assert!(!GameResult::in_progress().is_game_over);
    }

    #[test]
    fn test_game_error_messages() {
        assert_eq!(GameError::NotYourTurn.to_string(), "Not your turn");
        assert_eq!(
            GameError::illegal("Cell already taken").to_string(),
            "Cell already taken"
        );
        assert_eq!(
            GameError::UnknownAction("fly".to_string()).to_string(),
            "Unknown action: fly"
        );
    }
}
