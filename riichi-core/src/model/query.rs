//! Pending decisions offered to a seat.
//!
//! Queries ride in the same outbound buffer as events. All but the discard
//! query are optional: taking any mandatory action implicitly declines every
//! optional query still in flight, and [`crate::engine::Game::run_continuation`]
//! declines them all.

use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    Chi,
    Pon,
    Kan,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    /// Mandatory: pick one of `allowed` to discard. `waits[i]` describes the
    /// wait after discarding `allowed[i]`, if that leaves the hand tenpai.
    Discard {
        allowed: Vec<TileId>,
        waits: Vec<Option<WaitInfo>>,
    },

    /// Declare riichi by discarding one of `allowed`.
    Riichi {
        allowed: Vec<TileId>,
        waits: Vec<WaitInfo>,
    },

    /// Declare a nine-terminal abortive draw.
    #[serde(rename = "draw")]
    NineTerminals,

    /// Win by self-draw.
    Tsumo,

    /// Win on the discard (or added-kan tile) of `from_seat`.
    Ron { from_seat: Seat },

    /// Call a meld. `from_seat`/`discard_idx` are `None` for closed/added
    /// kans, which act on the caller's own tiles.
    Call {
        kind: CallKind,
        choices: Vec<Vec<TileId>>,
        from_seat: Option<Seat>,
        discard_idx: Option<usize>,
    },
}

impl Query {
    pub fn is_optional(&self) -> bool {
        !matches!(self, Query::Discard { .. })
    }
}
