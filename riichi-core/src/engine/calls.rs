//! Call execution: chi, pon, open kan, closed/added kan.

use itertools::Itertools;

use crate::common::*;
use crate::model::*;

use super::{ActionError, Continuation, Game};

impl Game {
    pub fn call_chi(
        &mut self,
        tiles: Vec<TileId>,
        caller: Seat,
        discarder: Seat,
    ) -> Result<(), ActionError> {
        if discarder.succ() != caller {
            return Err(ActionError::NotNextSeat);
        }
        if tiles.len() != 3 {
            return Err(ActionError::WrongCallSize {
                kind: MeldKind::Chi, expected: 3, got: tiles.len(),
            });
        }
        let kinds: Vec<Tile> = tiles.iter().map(|t| t.normal_kind()).sorted().collect();
        let same_suit = kinds.iter().all(|k| k.is_numeral() && k.suit() == kinds[0].suit());
        let consecutive = kinds[1].normal_encoding() == kinds[0].normal_encoding() + 1
            && kinds[2].normal_encoding() == kinds[1].normal_encoding() + 1;
        if !same_suit || !consecutive {
            return Err(ActionError::MalformedCall { kind: MeldKind::Chi });
        }
        let discard_tile = self.validate_called_discard(&tiles, caller, discarder)?;

        let meld = Meld::chi(tiles, discarder, discard_tile);
        let kuikae = chi_kuikae_kinds(&meld);
        self.execute_call(meld, caller, discarder, kuikae);
        Ok(())
    }

    pub fn call_pon(
        &mut self,
        tiles: Vec<TileId>,
        caller: Seat,
        discarder: Seat,
    ) -> Result<(), ActionError> {
        if caller == discarder {
            return Err(ActionError::CannotCallOwnDiscard { seat: caller });
        }
        if tiles.len() != 3 {
            return Err(ActionError::WrongCallSize {
                kind: MeldKind::Pon, expected: 3, got: tiles.len(),
            });
        }
        if !tiles.iter().map(|t| t.normal_kind()).all_equal() || !tiles.iter().all_unique() {
            return Err(ActionError::MalformedCall { kind: MeldKind::Pon });
        }
        let discard_tile = self.validate_called_discard(&tiles, caller, discarder)?;

        let meld = Meld::pon(tiles, discarder, discard_tile);
        let kuikae = vec![discard_tile.normal_kind()];
        self.execute_call(meld, caller, discarder, kuikae);
        Ok(())
    }

    pub fn call_open_kan(
        &mut self,
        tiles: Vec<TileId>,
        caller: Seat,
        discarder: Seat,
    ) -> Result<(), ActionError> {
        if caller == discarder {
            return Err(ActionError::CannotCallOwnDiscard { seat: caller });
        }
        if tiles.len() != 4 {
            return Err(ActionError::WrongCallSize {
                kind: MeldKind::OpenKan, expected: 4, got: tiles.len(),
            });
        }
        if !tiles.iter().map(|t| t.normal_kind()).all_equal() || !tiles.iter().all_unique() {
            return Err(ActionError::MalformedCall { kind: MeldKind::OpenKan });
        }
        let discard_tile = self.validate_called_discard(&tiles, caller, discarder)?;

        let meld = Meld::open_kan(tiles, discarder, discard_tile);
        self.continuation = None;
        self.remove_call_tiles_from_hand(&meld, caller, Some(discard_tile));
        self.mark_discard_called(discarder, caller);
        let event_meld = meld.clone();
        self.players[caller.index()].melds.push(meld);
        self.push_event(None, Event::Call { seat: caller, meld: event_meld });
        self.active_seat = caller;
        self.players[caller.index()].recalc_shanten();

        // No reaction window on an open kan; the tail runs immediately.
        self.wait_for_queries(Continuation::AfterOpenKan { caller })
    }

    pub fn call_closed_or_added_kan(
        &mut self,
        tiles: Vec<TileId>,
        seat: Seat,
    ) -> Result<(), ActionError> {
        if seat != self.active_seat {
            return Err(ActionError::NotActiveSeat { seat, active: self.active_seat });
        }
        if tiles.len() != 4 {
            return Err(ActionError::WrongCallSize {
                kind: MeldKind::ClosedKan, expected: 4, got: tiles.len(),
            });
        }
        if !tiles.iter().map(|t| t.normal_kind()).all_equal() || !tiles.iter().all_unique() {
            return Err(ActionError::MalformedCall { kind: MeldKind::ClosedKan });
        }
        let kind = tiles[0].normal_kind();

        let p = self.player(seat);
        let closed = tiles.iter().all(|t| p.hand.contains(t));
        if !closed {
            let has_pon = p
                .melds
                .iter()
                .any(|m| m.kind == MeldKind::Pon && m.base_kind() == kind);
            let in_hand = p.hand.iter().any(|t| t.normal_kind() == kind);
            if !has_pon || !in_hand {
                return Err(ActionError::NoPonToExtend { seat });
            }
        }

        self.continuation = None;
        let mut ron_passers = vec![];
        if closed {
            let kan_tile = tiles[0];
            for &t in &tiles {
                self.players[seat.index()].remove_from_hand(t);
            }
            let meld = Meld::closed_kan(tiles);
            let event_meld = meld.clone();
            self.players[seat.index()].melds.push(meld);
            self.push_event(None, Event::Call { seat, meld: event_meld });

            if self.rules.kokushi_chankan_on_ankan {
                ron_passers = self.chankan_ron_round(seat, kan_tile, true);
            }
        } else {
            let added = self.players[seat.index()]
                .hand
                .iter()
                .copied()
                .find(|t| t.normal_kind() == kind)
                .expect("validated above");
            self.players[seat.index()].remove_from_hand(added);
            let meld_idx = self.players[seat.index()]
                .melds
                .iter()
                .position(|m| m.kind == MeldKind::Pon && m.base_kind() == kind)
                .expect("validated above");
            self.players[seat.index()].melds[meld_idx].promote_to_added_kan(added);
            let event_meld = self.players[seat.index()].melds[meld_idx].clone();
            self.push_event(None, Event::Call { seat, meld: event_meld });

            ron_passers = self.chankan_ron_round(seat, added, false);
        }

        for p in &mut self.players {
            p.ippatsu = false;
        }
        self.players[seat.index()].recalc_shanten();

        self.wait_for_queries(Continuation::AfterKan { seat, closed, ron_passers })
    }

    /// Offer chankan rons on the kan tile. For a closed kan only a
    /// thirteen-orphans hand qualifies.
    fn chankan_ron_round(&mut self, seat: Seat, tile: TileId, closed_kan: bool) -> Vec<Seat> {
        let mut passers = vec![];
        for other in seats_after(seat) {
            if closed_kan {
                let mut counts = self.player(other).closed_counts();
                counts[tile.normal_kind()] += 1;
                if !crate::score::thirteen_orphans(&counts) {
                    continue;
                }
            }
            if self.check_ron_query_on(other, seat, tile, true) {
                passers.push(other);
            }
        }
        passers
    }

    pub(crate) fn resume_after_kan(&mut self, cont: Continuation) -> Result<(), ActionError> {
        let Continuation::AfterKan { seat, closed, ron_passers } = cont else {
            unreachable!()
        };
        for passer in ron_passers {
            let was_furiten = self.player(passer).is_furiten();
            self.players[passer.index()].temp_furiten = true;
            if !was_furiten {
                self.push_event(Some(passer), Event::Furiten { is_furiten: true });
            }
        }
        if closed {
            // a closed kan reveals its dora right away
            self.reveal_dora()?;
        } else {
            // an added kan defers the reveal until after the next discard
            self.players[seat.index()].has_pending_dora = true;
        }
        self.draw_tile(seat, true)
    }

    pub(crate) fn resume_after_open_kan(&mut self, caller: Seat) -> Result<(), ActionError> {
        for p in &mut self.players {
            p.ippatsu = false;
        }
        self.players[caller.index()].has_pending_dora = true;
        self.draw_tile(caller, true)
    }

    // ------------------------------------------------------------------

    /// The discarder's last discard must be part of the call, and every
    /// other tile must be in the caller's hand.
    fn validate_called_discard(
        &self,
        tiles: &[TileId],
        caller: Seat,
        discarder: Seat,
    ) -> Result<TileId, ActionError> {
        let discard = self
            .player(discarder)
            .discards
            .last()
            .ok_or(ActionError::NoDiscards { seat: discarder })?;
        if !tiles.contains(&discard.tile) {
            return Err(ActionError::DiscardNotInCall { seat: discarder });
        }
        for &t in tiles {
            if t == discard.tile {
                continue;
            }
            if !self.player(caller).hand.contains(&t) {
                return Err(ActionError::TileNotInHand { seat: caller, tile: t });
            }
        }
        Ok(discard.tile)
    }

    /// Shared tail of chi/pon: move tiles, mark the discard, emit, rotate
    /// the turn to the caller and ask for the (kuikae-restricted) discard.
    fn execute_call(&mut self, meld: Meld, caller: Seat, discarder: Seat, kuikae: Vec<Tile>) {
        self.continuation = None;
        let called = meld.called_tile;
        self.remove_call_tiles_from_hand(&meld, caller, called);
        self.mark_discard_called(discarder, caller);
        let event_meld = meld.clone();
        self.players[caller.index()].melds.push(meld);
        self.push_event(None, Event::Call { seat: caller, meld: event_meld });
        self.active_seat = caller;

        for p in &mut self.players {
            p.ippatsu = false;
        }

        self.kuikae = kuikae;
        self.ask_discard(caller);
    }

    fn remove_call_tiles_from_hand(
        &mut self,
        meld: &Meld,
        caller: Seat,
        called: Option<TileId>,
    ) {
        for &t in &meld.tiles {
            if Some(t) == called {
                continue;
            }
            self.players[caller.index()].remove_from_hand(t);
        }
    }

    fn mark_discard_called(&mut self, discarder: Seat, caller: Seat) {
        if let Some(d) = self.players[discarder.index()].discards.last_mut() {
            d.called_by = Some(caller);
        }
    }
}
