//! The wall of tiles.
//!
//! Unlike a table-top wall there is no physical ordering here: the wall is a
//! histogram of remaining counts per t37 kind, and every draw samples from it
//! (optionally biased by weight sets). The id handed out for a drawn kind is
//! deterministic given the remaining counts — `kind*4 + (3 − remaining)` —
//! so repeated draws of one kind always yield distinct physical copies, and
//! the red five is always copy 0 of its kind.
//!
//! [`Wall::take`]/[`Wall::replace`] consume/restore specific ids; preset
//! decks and preset starting hands are built on them.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use thiserror::Error;

use super::tile::{Tile, TileId};

/// Red-five slots: normal kind encoding -> t37 slot.
const RED_SLOTS: [(u8, u8); 3] = [(4, 34), (13, 35), (22, 36)];

#[derive(Debug, Error, Eq, PartialEq)]
pub enum WallError {
    /// Every candidate kind is exhausted (or zero-weighted).
    #[error("no valid tiles left in the wall")]
    NoValidTiles,
}

/// Remaining tile counts per t37 kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Wall {
    red_fives: bool,
    available: [u8; 37],
}

impl Wall {
    pub fn new(red_fives: bool) -> Self {
        let mut wall = Wall { red_fives, available: [0; 37] };
        wall.reset();
        wall
    }

    /// Back to the full 136-tile set: four per kind, with one copy of each
    /// five moved to its red slot when red fives are in play.
    pub fn reset(&mut self) {
        self.available = [0; 37];
        self.available[..34].fill(4);
        if self.red_fives {
            for (five, slot) in RED_SLOTS {
                self.available[five as usize] -= 1;
                self.available[slot as usize] = 1;
            }
        }
    }

    pub fn remaining(&self) -> u32 {
        self.available.iter().map(|&n| n as u32).sum()
    }

    pub fn available(&self, kind: Tile) -> u8 {
        self.available[kind.encoding() as usize]
    }

    /// t37 slot for a specific physical tile.
    fn slot_of(&self, id: TileId) -> usize {
        if self.red_fives && id.is_red() {
            RED_SLOTS
                .iter()
                .find(|&&(five, _)| five == id.normal_kind().normal_encoding())
                .map(|&(_, slot)| slot as usize)
                .expect("red id implies a five kind")
        } else {
            id.normal_kind().normal_encoding() as usize
        }
    }

    /// The deterministic id for a decremented slot.
    fn remap(&self, slot: usize) -> TileId {
        if slot >= 34 {
            let five = RED_SLOTS[slot - 34].0;
            TileId::from_kind_copy(Tile::from_encoding(five).unwrap(), 0)
        } else {
            let kind = Tile::from_encoding(slot as u8).unwrap();
            TileId::from_kind_copy(kind, 3 - self.available[slot])
        }
    }

    /// Weighted random draw. Per-kind weight is
    /// `available[k] * Π weight_sets[s][k]`; all-zero weights fail with
    /// [`WallError::NoValidTiles`].
    pub fn draw(
        &mut self,
        rng: &mut impl Rng,
        weight_sets: &[[f64; 37]],
    ) -> Result<TileId, WallError> {
        let mut weights = [0f64; 37];
        for (k, w) in weights.iter_mut().enumerate() {
            *w = self.available[k] as f64;
            for set in weight_sets {
                *w *= set[k];
            }
        }
        let dist = WeightedIndex::new(weights).map_err(|_| WallError::NoValidTiles)?;
        let slot = dist.sample(rng);
        debug_assert!(self.available[slot] > 0);
        self.available[slot] -= 1;
        Ok(self.remap(slot))
    }

    /// Consume a specific physical tile (preset decks).
    pub fn take(&mut self, id: TileId) -> Result<TileId, WallError> {
        let slot = self.slot_of(id);
        if self.available[slot] == 0 {
            return Err(WallError::NoValidTiles);
        }
        self.available[slot] -= 1;
        Ok(self.remap(slot))
    }

    /// Inverse of [`Wall::take`], for rollbacks.
    pub fn replace(&mut self, id: TileId) {
        let slot = self.slot_of(id);
        debug_assert!(self.available[slot] < 4);
        self.available[slot] += 1;
    }

    /// `n` draws, rolled back wholesale on the first failure.
    pub fn draw_many(
        &mut self,
        rng: &mut impl Rng,
        n: usize,
        weight_sets: &[[f64; 37]],
    ) -> Result<Vec<TileId>, WallError> {
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            match self.draw(rng, weight_sets) {
                Ok(id) => drawn.push(id),
                Err(e) => {
                    for id in drawn {
                        self.replace(id);
                    }
                    return Err(e);
                }
            }
        }
        Ok(drawn)
    }
}
