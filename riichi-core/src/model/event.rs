//! Outbound events and their per-seat projection.
//!
//! Events are values: once pushed onto the buffer they are immutable, and
//! the room projects a copy per seat with [`Event::for_seat`] before sending
//! it out. Projection hides exactly what a seat must not see — other seats'
//! initial hands and draw identities.

use serde::{Deserialize, Serialize};

use crate::common::*;
use super::query::Query;
use super::win::WinRecord;

/// Reason a round ended without a winner.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DrawKind {
    /// Four identical wind discards on the uninterrupted first go-around.
    Wind,
    /// Nine-terminal hand declared on the first draw.
    Terminal,
    /// Four riichi declarations stand.
    Riichi,
    /// Four kans split across seats.
    Kan,
    /// The live wall ran out.
    Exhaustive,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    NewGame {
        player_names: Vec<String>,
        points: [GamePoints; 4],
    },

    /// Projection reveals only the receiving seat's hand.
    NewRound {
        wind: Wind,
        round: u8,
        bonus: u8,
        hands: [Option<Vec<TileId>>; 4],
    },

    /// A tile was drawn. Projection hides the tile from other seats.
    Tile {
        seat: Seat,
        tile: Option<TileId>,
    },

    Discard {
        seat: Seat,
        tile: TileId,
        is_tsumogiri: bool,
        is_riichi: bool,
    },

    Call {
        seat: Seat,
        meld: Meld,
    },

    /// A new dora indicator was revealed.
    Dora { tile: TileId },

    /// Seat-scoped furiten status change.
    Furiten { is_furiten: bool },

    Win { win: WinRecord },

    Draw {
        kind: DrawKind,
        /// Tenpai hands at an exhaustive draw (`None` per noten seat).
        hands: Option<[Option<Vec<TileId>>; 4]>,
        nagashi: Option<[bool; 4]>,
        points: Option<[GamePoints; 4]>,
    },

    GameOver { points: [GamePoints; 4] },

    Query(Query),
}

impl Event {
    /// The copy of this event that `seat` is allowed to see.
    pub fn for_seat(&self, seat: Seat) -> Event {
        match self {
            Event::NewRound { wind, round, bonus, hands } => {
                let mut projected: [Option<Vec<TileId>>; 4] = Default::default();
                projected[seat.index()] = hands[seat.index()].clone();
                Event::NewRound { wind: *wind, round: *round, bonus: *bonus, hands: projected }
            }
            Event::Tile { seat: drawer, tile: _ } if *drawer != seat => {
                Event::Tile { seat: *drawer, tile: None }
            }
            other => other.clone(),
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Event::Query(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tile_ids_from_str;
    use assert2::check;

    #[test]
    fn new_round_projects_own_hand_only() {
        let hand = tile_ids_from_str("1m2m3m").unwrap();
        let hands = [Some(hand.clone()), Some(hand.clone()), Some(hand.clone()), Some(hand)];
        let ev = Event::NewRound { wind: Wind::East, round: 1, bonus: 0, hands };
        if let Event::NewRound { hands, .. } = ev.for_seat(S2) {
            check!(hands[2].is_some());
            check!(hands[0].is_none());
            check!(hands[1].is_none());
            check!(hands[3].is_none());
        } else {
            panic!("projection changed the event kind");
        }
    }

    #[test]
    fn tile_event_hides_identity_from_others() {
        let tile = tile_ids_from_str("5p").unwrap()[0];
        let ev = Event::Tile { seat: S1, tile: Some(tile) };
        check!(matches!(ev.for_seat(S1), Event::Tile { tile: Some(_), .. }));
        check!(matches!(ev.for_seat(S0), Event::Tile { tile: None, .. }));
    }

    #[test]
    fn events_serialize_with_tags() {
        let ev = Event::Dora { tile: tile_ids_from_str("9s").unwrap()[0] };
        let json = serde_json::to_value(&ev).unwrap();
        check!(json["event"] == "dora");
    }
}
