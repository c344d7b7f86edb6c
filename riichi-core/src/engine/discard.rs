//! The discard action: validation, mutation, abortive-draw checks, call
//! arbitration, and the post-arbitration continuation.

use crate::common::*;
use crate::model::*;
use crate::score::ScoreError;

use super::{ActionError, Continuation, Game, Transition, RIICHI_STICK};

impl Game {
    pub fn discard_tile(
        &mut self,
        seat: Seat,
        tile: TileId,
        riichi: bool,
    ) -> Result<(), ActionError> {
        // -- validation, no mutation past this block --------------------
        if seat != self.active_seat {
            return Err(ActionError::NotActiveSeat { seat, active: self.active_seat });
        }
        if !self.player(seat).hand.contains(&tile) {
            return Err(ActionError::TileNotInHand { seat, tile });
        }
        if self.kuikae.contains(&tile.normal_kind()) {
            return Err(ActionError::KuikaeForbidden { tile });
        }
        if riichi {
            let p = self.player(seat);
            if p.points < RIICHI_STICK {
                return Err(ActionError::RiichiWithoutPoints { seat, points: p.points });
            }
            if !p.is_closed() {
                return Err(ActionError::RiichiWithOpenMeld { seat });
            }
            let mut counts = p.closed_counts();
            counts[tile.normal_kind()] -= 1;
            if crate::analysis::shanten(&counts, p.melds.len() as u8) != 0 {
                return Err(ActionError::RiichiNotTenpai { seat, tile });
            }
        }

        // -- mutation ---------------------------------------------------
        let was_furiten = self.player(seat).is_furiten();
        let is_tsumogiri = self.player(seat).latest_draw == Some(tile);
        self.push_event(None, Event::Discard { seat, tile, is_tsumogiri, is_riichi: riichi });
        {
            let p = &mut self.players[seat.index()];
            p.discards.push(Discard::new(tile, is_tsumogiri, riichi));
            p.remove_from_hand(tile);
            if !p.riichi {
                p.temp_furiten = false;
            }
            p.ippatsu = false;
            p.recalc_shanten();
        }

        if riichi {
            let first_discard = self.player(seat).discards.len() == 1;
            let no_calls = self.players.iter().all(|q| q.melds.is_empty());
            let p = &mut self.players[seat.index()];
            p.riichi = true;
            p.ippatsu = true;
            // The stick goes out immediately; a ron on this very discard
            // refunds it before settling.
            p.points -= RIICHI_STICK;
            self.riichi_sticks += 1;
            if first_discard && no_calls {
                self.players[seat.index()].double_riichi = true;
            }
        }

        if self.check_four_wind_draw()? {
            return Ok(());
        }

        let riichi_count = self.players.iter().filter(|p| p.riichi).count();
        let kans_per_seat: Vec<usize> = self
            .players
            .iter()
            .map(|p| p.melds.iter().filter(|m| m.is_kan()).count())
            .collect();
        let total_kans: usize = kans_per_seat.iter().sum();
        let kans_same_seat = kans_per_seat.iter().any(|&n| n == 4);

        if was_furiten != self.player(seat).is_furiten() {
            let is_furiten = self.player(seat).is_furiten();
            self.push_event(Some(seat), Event::Furiten { is_furiten });
        }

        if self.player(seat).has_pending_dora {
            self.reveal_dora()?;
            self.players[seat.index()].has_pending_dora = false;
        }

        // -- call arbitration -------------------------------------------
        // Four standing riichi or four kans across seats suppress
        // everything but ron.
        let mut ron_passers = vec![];
        for other in seats_after(seat) {
            if riichi_count < 4 && (total_kans < 4 || kans_same_seat) {
                if total_kans < 4 {
                    self.check_open_kan_query(other, seat);
                }
                self.check_pon_query(other, seat);
                self.check_chi_query(other, seat);
            }
            if self.check_ron_query(other, seat) {
                ron_passers.push(other);
            }
        }

        self.wait_for_queries(Continuation::AfterDiscard {
            seat,
            riichi_count,
            total_kans,
            kans_same_seat,
            ron_passers,
        })
    }

    pub(crate) fn resume_after_discard(&mut self, cont: Continuation) -> Result<(), ActionError> {
        let Continuation::AfterDiscard {
            seat, riichi_count, total_kans, kans_same_seat, ron_passers,
        } = cont
        else {
            unreachable!()
        };

        if riichi_count == 4 {
            self.push_event(None, Event::Draw {
                kind: DrawKind::Riichi, hands: None, nagashi: None, points: None,
            });
            return self.start_round(Transition::Bonus);
        }
        if total_kans == 4 && !kans_same_seat {
            self.push_event(None, Event::Draw {
                kind: DrawKind::Kan, hands: None, nagashi: None, points: None,
            });
            return self.start_round(Transition::Bonus);
        }

        // Declining a ron is a missed win: temporary furiten.
        for passer in ron_passers {
            if !self.player(passer).is_furiten() {
                self.push_event(Some(passer), Event::Furiten { is_furiten: true });
            }
            self.players[passer.index()].temp_furiten = true;
        }

        self.draw_tile(seat.succ(), false)
    }

    /// Exactly four discards, all first discards, no calls, all the same
    /// wind kind.
    fn check_four_wind_draw(&mut self) -> Result<bool, ActionError> {
        if self.players.iter().any(|p| !p.melds.is_empty()) {
            return Ok(false);
        }
        if self.players.iter().map(|p| p.discards.len()).sum::<usize>() != 4 {
            return Ok(false);
        }
        if self.players.iter().any(|p| p.discards.len() != 1) {
            return Ok(false);
        }
        let kind = self.players[0].discards[0].tile.normal_kind();
        if !kind.is_wind() {
            return Ok(false);
        }
        if self
            .players
            .iter()
            .any(|p| p.discards[0].tile.normal_kind() != kind)
        {
            return Ok(false);
        }
        self.push_event(None, Event::Draw {
            kind: DrawKind::Wind, hands: None, nagashi: None, points: None,
        });
        self.start_round(Transition::Bonus)?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Per-seat call checks on the fresh discard

    fn last_discard(&self, seat: Seat) -> (TileId, usize) {
        let discards = &self.player(seat).discards;
        (discards.last().unwrap().tile, discards.len() - 1)
    }

    fn check_chi_query(&mut self, caller: Seat, discarder: Seat) {
        if discarder.succ() != caller {
            return;
        }
        if self.remaining_draws == 0 || self.player(caller).riichi {
            return;
        }
        let (tile, idx) = self.last_discard(discarder);
        let sets = chi_candidates(tile, &self.player(caller).hand);
        if sets.is_empty() {
            return;
        }
        let choices = sets
            .into_iter()
            .map(|mut s| {
                s.push(tile);
                s
            })
            .collect();
        self.push_event(Some(caller), Event::Query(Query::Call {
            kind: CallKind::Chi,
            choices,
            from_seat: Some(discarder),
            discard_idx: Some(idx),
        }));
    }

    fn check_pon_query(&mut self, caller: Seat, discarder: Seat) {
        if self.remaining_draws == 0 || self.player(caller).riichi {
            return;
        }
        let (tile, idx) = self.last_discard(discarder);
        let sets = pon_candidates(tile, &self.player(caller).hand);
        if sets.is_empty() {
            return;
        }
        let choices = sets
            .into_iter()
            .map(|mut s| {
                s.push(tile);
                s
            })
            .collect();
        self.push_event(Some(caller), Event::Query(Query::Call {
            kind: CallKind::Pon,
            choices,
            from_seat: Some(discarder),
            discard_idx: Some(idx),
        }));
    }

    fn check_open_kan_query(&mut self, caller: Seat, discarder: Seat) {
        if self.remaining_draws == 0 || self.player(caller).riichi {
            return;
        }
        let (tile, idx) = self.last_discard(discarder);
        let sets = open_kan_candidates(tile, &self.player(caller).hand);
        if sets.is_empty() {
            return;
        }
        let choices = sets
            .into_iter()
            .map(|mut s| {
                s.push(tile);
                s
            })
            .collect();
        self.push_event(Some(caller), Event::Query(Query::Call {
            kind: CallKind::Kan,
            choices,
            from_seat: Some(discarder),
            discard_idx: Some(idx),
        }));
    }

    /// Probe a ron for `caller` on the last discard (or a chankan tile).
    /// A `NoYaku` outcome counts as passing on a win: temporary furiten.
    /// Returns whether a ron query was issued.
    pub(crate) fn check_ron_query_on(
        &mut self,
        caller: Seat,
        discarder: Seat,
        tile: TileId,
        chankan: bool,
    ) -> bool {
        let ctx = self.ron_context(caller, chankan);
        match self.check_win(caller, Some(tile), &[], &ctx) {
            Ok(_) => {
                if self.player(caller).is_furiten() {
                    return false;
                }
                self.push_event(Some(caller), Event::Query(Query::Ron {
                    from_seat: discarder,
                }));
                true
            }
            Err(ScoreError::NoYaku) => {
                if !self.player(caller).is_furiten() {
                    self.push_event(Some(caller), Event::Furiten { is_furiten: true });
                }
                self.players[caller.index()].temp_furiten = true;
                false
            }
            Err(_) => false,
        }
    }

    fn check_ron_query(&mut self, caller: Seat, discarder: Seat) -> bool {
        let (tile, _) = self.last_discard(discarder);
        self.check_ron_query_on(caller, discarder, tile, false)
    }
}
