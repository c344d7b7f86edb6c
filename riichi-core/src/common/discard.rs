//! A discarded tile with extra info.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::seat::Seat;
use super::tile::TileId;

/// One entry in a seat's discard stream. Entries are never removed; a called
/// tile stays in place and is marked with the caller's seat.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Discard {
    pub tile: TileId,

    /// Discarded straight from the draw (ツモ切り).
    pub is_tsumogiri: bool,

    /// This discard declared riichi.
    pub is_riichi: bool,

    /// The seat that called this tile, if any.
    pub called_by: Option<Seat>,
}

impl Discard {
    pub fn new(tile: TileId, is_tsumogiri: bool, is_riichi: bool) -> Self {
        Discard { tile, is_tsumogiri, is_riichi, called_by: None }
    }
}

impl Display for Discard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}",
               self.tile,
               if self.is_tsumogiri { "*" } else { "" },
               if self.is_riichi { "!" } else { "" })?;
        if let Some(seat) = self.called_by {
            write!(f, ">{}", seat)?;
        }
        Ok(())
    }
}
