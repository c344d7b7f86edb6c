//! The record of one winning hand, as shipped to clients.

use serde::{Deserialize, Serialize};

use crate::common::*;
use crate::score::{ScoreLevel, Yaku};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinRecord {
    pub seat: Seat,
    /// Closed hand at the moment of the win (winning tile included for ron).
    pub hand: Vec<TileId>,
    /// `None` for tsumo.
    pub win_tile: Option<TileId>,
    /// Tile lists of the winner's melds.
    pub melds: Vec<Vec<TileId>>,
    pub dora_indicators: Vec<TileId>,
    pub ura_dora_indicators: Vec<TileId>,
    pub han: u8,
    pub fu: u8,
    pub yaku: Vec<(Yaku, u8)>,
    pub level: ScoreLevel,
    /// `main + 2 × additional`: the hand's own worth, bonuses excluded.
    pub total_from_hand: GamePoints,
    /// Points of all seats after settlement.
    pub points: [GamePoints; 4],
}
