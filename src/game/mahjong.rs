use std::collections::HashMap;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::engine::{GameError, GameResult, GameRules, GameState, MoveOutcome, Seat};
use super::tiles::Tile;

pub const HAND_SIZE: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Draw,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MahjongState {
    /// Wall of undrawn tiles; draws and deals pop from the tail.
    pub deck: Vec<Tile>,
    pub hands: HashMap<String, Vec<Tile>>,
    pub discards: Vec<Tile>,
    /// Index into `turn_order`
    pub current_player_index: usize,
    pub last_drawn_tile: Option<Tile>,
    pub phase: Phase,
    /// player id -> seat index
    pub players: HashMap<String, usize>,
    pub turn_order: Vec<String>,
}

impl MahjongState {
    pub fn with_deck(deck: Vec<Tile>) -> Self {
        Self {
            deck,
            hands: HashMap::new(),
            discards: Vec::new(),
            current_player_index: 0,
            last_drawn_tile: None,
            phase: Phase::Draw,
            players: HashMap::new(),
            turn_order: Vec::new(),
        }
    }

    pub fn current_player(&self) -> Option<&str> {
        self.turn_order
            .get(self.current_player_index)
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MahjongMove {
    Draw,
    Discard { tile_index: i64 },
    Reorder { new_hand: Vec<Tile> },
}

impl MahjongMove {
    fn parse(mv: &serde_json::Value) -> Result<Self, GameError> {
        let action = mv
            .get("action")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GameError::UnknownAction("missing action".to_string()))?;

        match action {
            "draw" => Ok(MahjongMove::Draw),
            "discard" => mv
                .get("tileIndex")
                .and_then(|v| v.as_i64())
                .map(|tile_index| MahjongMove::Discard { tile_index })
                .ok_or_else(|| GameError::illegal("Invalid tile")),
            "reorder" => mv
                .get("newHand")
                .cloned()
                .and_then(|v| serde_json::from_value::<Vec<Tile>>(v).ok())
                .map(|new_hand| MahjongMove::Reorder { new_hand })
                .ok_or_else(|| GameError::illegal("Invalid hand")),
            other => Err(GameError::UnknownAction(other.to_string())),
        }
    }
}

/// Simplified mahjong: draw one, discard one, pass the turn. The game ends in
/// a draw when the wall runs out; winning hands are not detected.
#[derive(Debug, Default)]
pub struct Mahjong;

impl Mahjong {
    pub fn new() -> Self {
        Self
    }

    fn state_of(state: &GameState) -> Result<&MahjongState, GameError> {
        match state {
            GameState::Mahjong(inner) => Ok(inner),
            _ => Err(GameError::StateMismatch),
        }
    }

    /// Deals `HAND_SIZE` tiles to each player in order, popping from the tail of
    /// `deck`. Hands come back sorted by glyph code point: winds, dragons,
    /// characters, bamboo, dots.
    pub fn deal_hands(
        deck: &mut Vec<Tile>,
        player_ids: &[String],
    ) -> Result<HashMap<String, Vec<Tile>>, GameError> {
        if deck.len() < HAND_SIZE * player_ids.len() {
            return Err(GameError::illegal("Not enough tiles to deal"));
        }

        let mut hands = HashMap::with_capacity(player_ids.len());
        for id in player_ids {
            let split_at = deck.len() - HAND_SIZE;
            let mut hand: Vec<Tile> = deck.drain(split_at..).rev().collect();
            hand.sort_by_key(|tile| tile.glyph());
            hands.insert(id.clone(), hand);
        }
        Ok(hands)
    }

    fn draw(state: &MahjongState, player_id: &str) -> Result<MoveOutcome, GameError> {
        if state.phase != Phase::Draw {
            return Err(GameError::illegal("Already drawn, please discard"));
        }

        let mut next = state.clone();
        let Some(tile) = next.deck.pop() else {
            return Ok(MoveOutcome {
                new_state: GameState::Mahjong(next),
                result: Some(GameResult::draw()),
            });
        };

        next.hands.entry(player_id.to_string()).or_default().push(tile);
        next.last_drawn_tile = Some(tile);
        next.phase = Phase::Discard;
        Ok(MoveOutcome::continues(GameState::Mahjong(next)))
    }

    fn discard(
        state: &MahjongState,
        player_id: &str,
        tile_index: i64,
    ) -> Result<MoveOutcome, GameError> {
        if state.phase != Phase::Discard {
            return Err(GameError::illegal("Please draw a tile first"));
        }

        let mut next = state.clone();
        let hand = next
            .hands
            .get_mut(player_id)
            .ok_or_else(|| GameError::illegal("Invalid tile"))?;
        let index = usize::try_from(tile_index)
            .ok()
            .filter(|index| *index < hand.len())
            .ok_or_else(|| GameError::illegal("Invalid tile"))?;

        let tile = hand.remove(index);
        next.discards.push(tile);
        next.current_player_index = (next.current_player_index + 1) % next.turn_order.len().max(1);
        next.last_drawn_tile = None;
        next.phase = Phase::Draw;
        Ok(MoveOutcome::continues(GameState::Mahjong(next)))
    }

    fn reorder(
        state: &MahjongState,
        player_id: &str,
        new_hand: Vec<Tile>,
    ) -> Result<MoveOutcome, GameError> {
        let current = state.hands.get(player_id).cloned().unwrap_or_default();
        if new_hand.len() != current.len() {
            return Err(GameError::illegal("Hand length mismatch"));
        }

        let mut proposed = new_hand.clone();
        let mut held = current;
        proposed.sort();
        held.sort();
        if proposed != held {
            return Err(GameError::illegal("Invalid reorder: tiles do not match"));
        }

        let mut next = state.clone();
        next.hands.insert(player_id.to_string(), new_hand);
        Ok(MoveOutcome::continues(GameState::Mahjong(next)))
    }
}

impl GameRules for Mahjong {
    fn initial_state(&self) -> GameState {
        let mut deck = Tile::full_set();
        deck.shuffle(&mut rand::rng());
        GameState::Mahjong(MahjongState::with_deck(deck))
    }

    fn seat_players(&self, state: GameState, seats: &[Seat]) -> Result<GameState, GameError> {
        let mut inner = Self::state_of(&state)?.clone();
        let turn_order: Vec<String> = seats.iter().map(|seat| seat.player_id.clone()).collect();

        inner.hands = Self::deal_hands(&mut inner.deck, &turn_order)?;
        inner.players = turn_order
            .iter()
            .enumerate()
            .map(|(seat, id)| (id.clone(), seat))
            .collect();
        inner.turn_order = turn_order;
        inner.current_player_index = 0;
        inner.phase = Phase::Draw;
        Ok(GameState::Mahjong(inner))
    }

    fn process_move(
        &self,
        state: &GameState,
        mv: &serde_json::Value,
        player_id: &str,
    ) -> Result<MoveOutcome, GameError> {
        let current = Self::state_of(state)?;
        if !current.players.contains_key(player_id) {
            return Err(GameError::PlayerNotInGame);
        }

        // Reordering only touches the mover's own hand, so it is allowed off-turn.
        // Everything else is turn-checked before its payload is looked at.
        let is_reorder = mv.get("action").and_then(|v| v.as_str()) == Some("reorder");
        if !is_reorder && current.current_player() != Some(player_id) {
            return Err(GameError::NotYourTurn);
        }

        match MahjongMove::parse(mv)? {
            MahjongMove::Reorder { new_hand } => Self::reorder(current, player_id, new_hand),
            MahjongMove::Draw => Self::draw(current, player_id),
            MahjongMove::Discard { tile_index } => Self::discard(current, player_id, tile_index),
        }
    }

    fn check_win_condition(&self, state: &GameState) -> GameResult {
        match state {
            GameState::Mahjong(inner) if inner.deck.is_empty() => GameResult::draw(),
            _ => GameResult::in_progress(),
        }
    }
}
