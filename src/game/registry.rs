use serde::{Deserialize, Serialize};

use super::{engine::GameRules, mahjong::Mahjong, tictactoe::TicTacToe};

/// Catalog entry served to clients; also drives room capacity checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub id: String,
    pub name: String,
    pub min_players: usize,
    pub max_players: usize,
}

impl GameInfo {
    pub fn new(id: &str, name: &str, min_players: usize, max_players: usize) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            min_players,
            max_players,
        }
    }
}

pub type RulesFactory = fn() -> Box<dyn GameRules>;

fn tictactoe_rules() -> Box<dyn GameRules> {
    Box::new(TicTacToe::new())
}

fn mahjong_rules() -> Box<dyn GameRules> {
    Box::new(Mahjong::new())
}

struct RegisteredGame {
    info: GameInfo,
    factory: RulesFactory,
}

/// Lookup from game type id to its rules engine.
///
/// Adding a game means one `register` call plus a `GameRules` implementation;
/// nothing in the room layer changes.
pub struct GameRegistry {
    games: Vec<RegisteredGame>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(
            GameInfo::new("tictactoe", "Tic Tac Toe", 2, 2),
            tictactoe_rules,
        );
        registry.register(
            GameInfo::new("mahjong", "Mahjong (Simplified)", 2, 4),
            mahjong_rules,
        );
        registry
    }
}

impl GameRegistry {
    /// Registry with the built-in games.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self { games: Vec::new() }
    }

    /// Registers a game, replacing any earlier entry with the same id.
    pub fn register(&mut self, info: GameInfo, factory: RulesFactory) {
        self.games.retain(|game| game.info.id != info.id);
        self.games.push(RegisteredGame { info, factory });
    }

    pub fn lookup(&self, game_type: &str) -> Option<Box<dyn GameRules>> {
        self.entry(game_type).map(|game| (game.factory)())
    }

    pub fn info(&self, game_type: &str) -> Option<&GameInfo> {
        self.entry(game_type).map(|game| &game.info)
    }

    /// All registered games in registration order.
    pub fn catalog(&self) -> Vec<GameInfo> {
        self.games.iter().map(|game| game.info.clone()).collect()
    }

    fn entry(&self, game_type: &str) -> Option<&RegisteredGame> {
        self.games.iter().find(|game| game.info.id == game_type)
    }
}
