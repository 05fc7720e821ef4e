use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::engine::{GameError, GameResult, GameRules, GameState, MoveOutcome, Seat};

pub const BOARD_SIZE: usize = 9;

const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicTacToeState {
    pub board: [Option<Mark>; BOARD_SIZE],
    pub current_player: Mark,
    /// player id -> mark
    pub players: HashMap<String, Mark>,
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self {
            board: [None; BOARD_SIZE],
            current_player: Mark::X,
            players: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TicTacToeMove {
    index: i64,
}

/// Classic 3x3 tic-tac-toe. X always opens.
#[derive(Debug, Default)]
pub struct TicTacToe;

impl TicTacToe {
    pub fn new() -> Self {
        Self
    }

    fn state_of(state: &GameState) -> Result<&TicTacToeState, GameError> {
        match state {
            GameState::TicTacToe(inner) => Ok(inner),
            _ => Err(GameError::StateMismatch),
        }
    }

    pub fn evaluate(board: &[Option<Mark>; BOARD_SIZE]) -> GameResult {
        for [a, b, c] in LINES {
            if let Some(mark) = board[a] {
                if board[b] == Some(mark) && board[c] == Some(mark) {
                    return GameResult::won_by(mark.to_string());
                }
            }
        }

        if board.iter().all(Option::is_some) {
            return GameResult::draw();
        }

        GameResult::in_progress()
    }
}

impl GameRules for TicTacToe {
    fn initial_state(&self) -> GameState {
        GameState::TicTacToe(TicTacToeState::default())
    }

    fn seat_players(&self, state: GameState, seats: &[Seat]) -> Result<GameState, GameError> {
        let mut inner = Self::state_of(&state)?.clone();
        inner.players = seats
            .iter()
            .map(|seat| {
                Mark::from_str(&seat.symbol)
                    .map(|mark| (seat.player_id.clone(), mark))
                    .map_err(|_| GameError::UnsupportedSeat(seat.symbol.clone()))
            })
            .collect::<Result<_, _>>()?;
        Ok(GameState::TicTacToe(inner))
    }

    fn process_move(
        &self,
        state: &GameState,
        mv: &serde_json::Value,
        player_id: &str,
    ) -> Result<MoveOutcome, GameError> {
        let current = Self::state_of(state)?;

        let mark = *current
            .players
            .get(player_id)
            .ok_or(GameError::PlayerNotInGame)?;
        if mark != current.current_player {
            return Err(GameError::NotYourTurn);
        }
        if Self::evaluate(&current.board).is_game_over {
            return Err(GameError::illegal("Game is already over"));
        }

        let TicTacToeMove { index } = serde_json::from_value(mv.clone())
            .map_err(|_| GameError::illegal("Move must contain a cell index"))?;
        let cell = usize::try_from(index)
            .ok()
            .filter(|cell| *cell < BOARD_SIZE)
            .ok_or_else(|| GameError::illegal(format!("Invalid cell: {}", index)))?;
        if current.board[cell].is_some() {
            return Err(GameError::illegal("Cell already taken"));
        }

        let mut next = current.clone();
        next.board[cell] = Some(mark);
        next.current_player = mark.opponent();

        let result = Self::evaluate(&next.board);
        Ok(MoveOutcome {
            new_state: GameState::TicTacToe(next),
            result: Some(result),
        })
    }

    fn check_win_condition(&self, state: &GameState) -> GameResult {
        match state {
            GameState::TicTacToe(inner) => Self::evaluate(&inner.board),
            _ => GameResult::in_progress(),
        }
    }
}
