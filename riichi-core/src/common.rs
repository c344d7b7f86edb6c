//! Building blocks: tile encodings, tile multisets, melds, discards, waits,
//! seats and the wall. Everything here is game-logic-free data plus the pure
//! operations on it; the state machine lives in [`crate::engine`].

pub mod discard;
pub mod meld;
pub mod seat;
pub mod tile;
pub mod tile_set;
pub mod typedefs;
pub mod wait;
pub mod wall;

pub use self::{
    discard::*,
    meld::*,
    seat::*,
    tile::*,
    tile_set::*,
    typedefs::*,
    wait::*,
    wall::*,
};
