use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Copies of every face in a full set.
pub const COPIES_PER_FACE: usize = 4;
pub const FACE_COUNT: usize = 34;
pub const FULL_SET_SIZE: usize = FACE_COUNT * COPIES_PER_FACE;

// Face order: dots 1-9, bamboo 1-9, characters 1-9, winds (E S W N), dragons (R G W)
const GLYPHS: [char; FACE_COUNT] = [
    '🀙', '🀚', '🀛', '🀜', '🀝', '🀞', '🀟', '🀠', '🀡', //
    '🀐', '🀑', '🀒', '🀓', '🀔', '🀕', '🀖', '🀗', '🀘', //
    '🀇', '🀈', '🀉', '🀊', '🀋', '🀌', '🀍', '🀎', '🀏', //
    '🀀', '🀁', '🀂', '🀃', //
    '🀄', '🀅', '🀆',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TileSuit {
    Dots,
    Bamboo,
    Characters,
    Winds,
    Dragons,
}

impl TileSuit {
    pub fn faces(self) -> u8 {
        match self {
            TileSuit::Dots | TileSuit::Bamboo | TileSuit::Characters => 9,
            TileSuit::Winds => 4,
            TileSuit::Dragons => 3,
        }
    }

    fn offset(self) -> u8 {
        TileSuit::iter()
            .take_while(|suit| *suit != self)
            .map(TileSuit::faces)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tile: {0}")]
pub struct TileParseError(String);

/// A single mahjong tile face. Travels on the wire as its Unicode glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tile(u8);

impl Tile {
    /// `rank` is 1-based within the suit.
    pub fn new(suit: TileSuit, rank: u8) -> Option<Self> {
        (1..=suit.faces())
            .contains(&rank)
            .then(|| Tile(suit.offset() + rank - 1))
    }

    pub fn suit(self) -> TileSuit {
        TileSuit::iter()
            .find(|suit| self.0 < suit.offset() + suit.faces())
            .unwrap_or(TileSuit::Dragons)
    }

    pub fn rank(self) -> u8 {
        self.0 - self.suit().offset() + 1
    }

    pub fn glyph(self) -> char {
        GLYPHS[usize::from(self.0)]
    }

    /// Every distinct face, in suit order.
    pub fn all_faces() -> Vec<Tile> {
        TileSuit::iter()
            .flat_map(|suit| (1..=suit.faces()).filter_map(move |rank| Tile::new(suit, rank)))
            .collect()
    }

    /// Unshuffled 136-tile set.
    pub fn full_set() -> Vec<Tile> {
        Self::all_faces()
            .into_iter()
            .flat_map(|tile| std::iter::repeat(tile).take(COPIES_PER_FACE))
            .collect()
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl FromStr for Tile {
    type Err = TileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => GLYPHS
                .iter()
                .position(|glyph| *glyph == c)
                .and_then(|index| u8::try_from(index).ok())
                .map(Tile)
                .ok_or_else(|| TileParseError(s.to_string())),
            _ => Err(TileParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Tile {
    type Error = TileParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tile> for String {
    fn from(tile: Tile) -> Self {
        tile.to_string()
    }
}
