//! Tile kinds and physical tile identities.
//!
//! Two encodings exist side by side:
//!
//! - [`Tile`] is the *kind* space (t34/t37). 0..=33 enumerate the 34 kinds in
//!   the order 1m–9m, 1p–9p, 1s–9s, east, south, west, north, white, green,
//!   red. 34/35/36 are synthetic kinds for the red fives of m/p/s, used by
//!   the wall for weighted selection and by histograms that must keep red
//!   fives apart.
//! - [`TileId`] is the *physical* space (t136). The four copies of kind `k`
//!   occupy `4k..4k+3`; copy 0 of the three five kinds is the red five when
//!   red fives are in play.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wire tokens, indexed by kind encoding.
const TOKENS: [&str; 37] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", //
    "1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p", //
    "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", //
    "ew", "sw", "ww", "nw", //
    "wd", "gd", "rd", //
    "5m", "5p", "5s", //
];

/// One of the 37 tile kinds (34 real kinds + 3 red-five kinds).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tile(u8);

impl Tile {
    pub const MIN_ENCODING: u8 = 0;
    pub const MAX_ENCODING: u8 = 36;

    pub const EAST: Tile = Tile(27);
    pub const SOUTH: Tile = Tile(28);
    pub const WEST: Tile = Tile(29);
    pub const NORTH: Tile = Tile(30);

    pub const fn from_encoding(encoding: u8) -> Option<Self> {
        if encoding <= Self::MAX_ENCODING { Some(Self(encoding)) } else { None }
    }

    pub const fn encoding(self) -> u8 { self.0 }

    /// Encoding with red fives folded into their normal kinds (the t34 space).
    pub const fn normal_encoding(self) -> u8 {
        match self.0 {
            34 => 4,
            35 => 13,
            36 => 22,
            x => x,
        }
    }

    pub const fn to_normal(self) -> Self { Self(self.normal_encoding()) }

    /// The red-five kind of the same suit; no-op for anything but a five.
    pub const fn to_red(self) -> Self {
        match self.0 {
            4 => Self(34),
            13 => Self(35),
            22 => Self(36),
            x => Self(x),
        }
    }

    pub const fn is_red(self) -> bool { self.0 >= 34 }

    /// Numbered suits (characters, dots, bamboos), red fives included.
    pub const fn is_numeral(self) -> bool { self.0 <= 26 || self.0 >= 34 }

    pub const fn is_wind(self) -> bool { 27 <= self.0 && self.0 <= 30 }
    pub const fn is_dragon(self) -> bool { 31 <= self.0 && self.0 <= 33 }
    pub const fn is_honor(self) -> bool { 27 <= self.0 && self.0 <= 33 }

    /// 1 or 9 of a numbered suit.
    pub const fn is_pure_terminal(self) -> bool {
        self.0 <= 26 && (self.0 % 9 == 0 || self.0 % 9 == 8)
    }

    /// Terminal or honor (the "orphan" kinds).
    pub const fn is_terminal(self) -> bool { self.is_pure_terminal() || self.is_honor() }

    /// 1..=9 for numbered suits (reds count as 5), 0 for honors.
    pub const fn num(self) -> u8 {
        let e = self.normal_encoding();
        if e <= 26 { e % 9 + 1 } else { 0 }
    }

    /// 0, 1, 2 for m, p, s; 3 for honors.
    pub const fn suit(self) -> u8 {
        let e = self.normal_encoding();
        if e <= 26 { e / 9 } else { 3 }
    }

    /// The dora indicated when this kind shows as an indicator: successor
    /// within the suit (9 wraps to 1), wind cycle E→S→W→N→E, dragon cycle
    /// white→green→red→white. A red five indicates the 6 of its suit.
    pub const fn indicated_dora(self) -> Self {
        Self([
            1, 2, 3, 4, 5, 6, 7, 8, 0, // m
            10, 11, 12, 13, 14, 15, 16, 17, 9, // p
            19, 20, 21, 22, 23, 24, 25, 26, 18, // s
            28, 29, 30, 27, // winds
            32, 33, 31, // dragons
            5, 14, 23u8, // reds indicate 6
        ][self.0 as usize])
    }

    pub const fn as_str(self) -> &'static str { TOKENS[self.0 as usize] }
}

impl Display for Tile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tile {
    type Err = ParseTileError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TOKENS[..34]
            .iter()
            .position(|&t| t == s)
            .map(|i| Tile(i as u8))
            .ok_or_else(|| ParseTileError(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("not a tile token: {0:?}")]
pub struct ParseTileError(pub String);

/// One physical tile out of the 136-tile set.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(u8);

impl TileId {
    pub const fn new(id: u8) -> Option<Self> {
        if id < 136 { Some(Self(id)) } else { None }
    }

    pub const fn from_kind_copy(kind: Tile, copy: u8) -> Self {
        Self(kind.normal_encoding() * 4 + (copy & 3))
    }

    pub const fn id(self) -> u8 { self.0 }
    pub const fn copy(self) -> u8 { self.0 % 4 }

    /// The t34 kind, red fives folded in.
    pub const fn normal_kind(self) -> Tile {
        match Tile::from_encoding(self.0 / 4) {
            Some(t) => t,
            None => unreachable!(),
        }
    }

    /// Copy 0 of a five is the red copy.
    pub const fn is_red(self) -> bool {
        matches!(self.0 / 4, 4 | 13 | 22) && self.0 % 4 == 0
    }

    /// The t37 kind: red copies map to the synthetic red kinds.
    pub const fn kind(self) -> Tile {
        if self.is_red() { self.normal_kind().to_red() } else { self.normal_kind() }
    }
}

impl Display for TileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.normal_kind(), self.copy())
    }
}

impl FromStr for TileId {
    type Err = ParseTileError;

    /// Accepts a kind token with an optional copy digit: `"3p"`, `"ew2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind_str, copy) = match s.len() {
            2 => (s, 0u8),
            3 => {
                let copy = s[2..]
                    .parse::<u8>()
                    .map_err(|_| ParseTileError(s.to_string()))?;
                if copy > 3 { return Err(ParseTileError(s.to_string())); }
                (&s[..2], copy)
            }
            _ => return Err(ParseTileError(s.to_string())),
        };
        let kind: Tile = kind_str.parse()?;
        Ok(TileId::from_kind_copy(kind, copy))
    }
}

/// Parse a whitespace-tolerant run of two-char kind tokens.
/// Example: `"1m1m2p ew"` => `[1m, 1m, 2p, ew]`.
pub fn tiles_from_str(s: &str) -> Result<Vec<Tile>, ParseTileError> {
    s.split_whitespace()
        .flat_map(|run| {
            run.as_bytes()
                .chunks(2)
                .map(|pair| std::str::from_utf8(pair).unwrap_or(""))
                .collect::<Vec<_>>()
        })
        .map(|token| token.parse())
        .collect()
}

/// Parse kind tokens into physical ids, handing out copy indices per kind in
/// order of appearance. The first five of each suit therefore becomes the red
/// copy, matching the wall's red accounting.
pub fn tile_ids_from_str(s: &str) -> Result<Vec<TileId>, ParseTileError> {
    let mut pool = [0u8; 34];
    let mut ids = vec![];
    for kind in tiles_from_str(s)? {
        let k = kind.normal_encoding() as usize;
        ids.push(TileId::from_kind_copy(kind, pool[k]));
        pool[k] += 1;
    }
    Ok(ids)
}
