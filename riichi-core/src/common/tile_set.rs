//! Unordered multisets of tiles, represented as histograms.
//!
//! - [`TileSet37`] keeps red fives in their own slots (wall accounting).
//! - [`TileSet34`] folds red fives into the normal five kinds (shanten and
//!   yaku work on this space).
//!
//! Both can be indexed directly with a [`Tile`]. [`TileMask34`] is the
//! 1-bit-per-kind variant used for wait/discard intersection tests.

use std::ops::{Index, IndexMut};

use derive_more::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Constructor, From, Into,
};

use super::tile::{Tile, TileId};

/// Histogram over all 37 kinds (red fives counted apart).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Constructor, From, Into)]
pub struct TileSet37(pub [u8; 37]);

impl Default for TileSet37 {
    fn default() -> Self { TileSet37([0; 37]) }
}

impl Index<Tile> for TileSet37 {
    type Output = u8;
    fn index(&self, tile: Tile) -> &u8 { &self.0[tile.encoding() as usize] }
}

impl IndexMut<Tile> for TileSet37 {
    fn index_mut(&mut self, tile: Tile) -> &mut u8 { &mut self.0[tile.encoding() as usize] }
}

impl FromIterator<TileId> for TileSet37 {
    fn from_iter<T: IntoIterator<Item = TileId>>(ids: T) -> Self {
        let mut set = Self::default();
        for id in ids {
            set[id.kind()] += 1;
        }
        set
    }
}

impl TileSet37 {
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }
}

/// Histogram over the 34 normal kinds (red fives folded in).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Constructor, From, Into)]
pub struct TileSet34(pub [u8; 34]);

impl Default for TileSet34 {
    fn default() -> Self { TileSet34([0; 34]) }
}

impl Index<Tile> for TileSet34 {
    type Output = u8;
    fn index(&self, tile: Tile) -> &u8 { &self.0[tile.normal_encoding() as usize] }
}

impl IndexMut<Tile> for TileSet34 {
    fn index_mut(&mut self, tile: Tile) -> &mut u8 {
        &mut self.0[tile.normal_encoding() as usize]
    }
}

impl FromIterator<TileId> for TileSet34 {
    fn from_iter<T: IntoIterator<Item = TileId>>(ids: T) -> Self {
        let mut set = Self::default();
        for id in ids {
            set[id.normal_kind()] += 1;
        }
        set
    }
}

impl From<TileSet37> for TileSet34 {
    fn from(original: TileSet37) -> Self {
        let mut result: [u8; 34] = original.0[..34].try_into().unwrap();
        result[4] += original.0[34];
        result[13] += original.0[35];
        result[22] += original.0[36];
        Self(result)
    }
}

impl TileSet34 {
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }

    /// Number of distinct terminal/honor kinds present.
    pub fn terminal_kinds(&self) -> u8 {
        (0..34u8)
            .filter(|&k| {
                let tile = Tile::from_encoding(k).unwrap();
                tile.is_terminal() && self.0[k as usize] > 0
            })
            .count() as u8
    }
}

/// 1-bit-per-kind set over the 34 normal kinds.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq,
    Constructor, From, Into,
    BitAnd, BitOr, BitXor,
    BitAndAssign, BitOrAssign, BitXorAssign,
)]
pub struct TileMask34(pub u64);

impl TileMask34 {
    pub fn has(self, tile: Tile) -> bool {
        (self.0 >> tile.normal_encoding()) & 1 == 1
    }

    pub fn insert(&mut self, tile: Tile) {
        self.0 |= 1 << tile.normal_encoding();
    }

    pub fn any(self) -> bool { self.0 != 0 }
}

impl FromIterator<Tile> for TileMask34 {
    fn from_iter<T: IntoIterator<Item = Tile>>(tiles: T) -> Self {
        let mut mask = Self::default();
        for tile in tiles {
            mask.insert(tile);
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tile::{tile_ids_from_str, tiles_from_str};
    use assert2::check;

    #[test]
    fn histogram_can_be_indexed_with_tile() {
        let ids = tile_ids_from_str("1m1m1m2m ew ew rd").unwrap();
        let mut h = TileSet34::from_iter(ids);
        check!(h["1m".parse().unwrap()] == 3);
        check!(h["ew".parse().unwrap()] == 2);
        h["rd".parse().unwrap()] -= 1;
        check!(h.total() == 6);
    }

    #[test]
    fn reds_fold_into_34() {
        let ids = tile_ids_from_str("5p5p5p").unwrap();
        let h37 = TileSet37::from_iter(ids.iter().copied());
        check!(h37.0[35] == 1); // first copy is the red
        check!(h37.0[13] == 2);
        let h34 = TileSet34::from(h37);
        check!(h34.0[13] == 3);
    }

    #[test]
    fn mask_intersection() {
        let waits = TileMask34::from_iter(tiles_from_str("3p6p").unwrap());
        let discards = TileMask34::from_iter(tiles_from_str("1m6p").unwrap());
        check!((waits & discards).any());
        check!(!(waits & TileMask34::default()).any());
    }
}
