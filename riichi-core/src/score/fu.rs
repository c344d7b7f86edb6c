//! Fu (minipoint) calculation.

use serde::{Deserialize, Serialize};

use crate::common::Tile;

use super::yaku::Groups;
use super::WinContext;

/// Shape of the wait the winning tile completed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum WaitKind {
    /// Two-sided run wait: no fu.
    Ryanmen,
    /// Middle-of-run wait.
    Kanchan,
    /// Edge run wait (12_3 / 7_89).
    Penchan,
    /// Pair-of-a-triplet wait.
    Shanpon,
    /// Lone pair wait.
    Tanki,
}

impl WaitKind {
    fn fu(self) -> u8 {
        match self {
            WaitKind::Ryanmen | WaitKind::Shanpon => 0,
            WaitKind::Kanchan | WaitKind::Penchan | WaitKind::Tanki => 2,
        }
    }
}

fn round_up_10(fu: u8) -> u8 {
    (fu + 9) / 10 * 10
}

/// Fu of a standard (4 sets + pair) hand. Seven pairs are a flat 25,
/// handled by the caller.
pub fn standard_fu(
    groups: &Groups,
    pair: Tile,
    wait: WaitKind,
    ctx: &WinContext,
    is_open: bool,
    pinfu: bool,
) -> u8 {
    if pinfu {
        // 20 on tsumo, 30 on a closed ron (the menzen bonus is all it gets)
        return if ctx.is_tsumo { 20 } else { 30 };
    }

    let mut fu = 20u8;
    if !is_open && !ctx.is_tsumo {
        fu += 10;
    }
    if ctx.is_tsumo {
        fu += 2;
    }

    for g in &groups.list {
        if g.is_run {
            continue;
        }
        let mut set_fu = if g.low.is_terminal() { 4 } else { 2 };
        if g.concealed {
            set_fu *= 2;
        }
        if g.is_kan {
            set_fu *= 4;
        }
        fu += set_fu;
    }

    if pair.is_dragon() {
        fu += 2;
    }
    if pair.is_wind() {
        if pair == ctx.seat_wind.tile() {
            fu += 2;
        }
        if pair == ctx.round_wind.tile() {
            fu += 2;
        }
    }

    fu += wait.fu();

    let total = round_up_10(fu);
    if is_open && total < 30 { 30 } else { total }
}
