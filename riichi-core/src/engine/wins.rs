//! Win and draw resolutions: tsumo, (multi-)ron, the nine-terminal abort
//! and the exhaustive draw.

use log::debug;

use crate::common::*;
use crate::model::*;
use crate::score::{self, WinScore};

use super::{ActionError, DrawSource, Game, Transition, RIICHI_STICK};

impl Game {
    pub fn do_9tile_draw(&mut self, seat: Seat) -> Result<(), ActionError> {
        let p = self.player(seat);
        if !p.discards.is_empty() {
            return Err(ActionError::NineTerminalsUnavailable {
                seat, reason: "already discarded",
            });
        }
        if self.players.iter().any(|q| !q.melds.is_empty()) {
            return Err(ActionError::NineTerminalsUnavailable {
                seat, reason: "calls have been made",
            });
        }
        if p.closed_counts().terminal_kinds() < 9 {
            return Err(ActionError::NineTerminalsUnavailable {
                seat, reason: "fewer than nine orphan kinds",
            });
        }

        self.push_event(None, Event::Draw {
            kind: DrawKind::Terminal, hands: None, nagashi: None, points: None,
        });
        self.start_round(Transition::Bonus)
    }

    pub fn do_tsumo(&mut self, seat: Seat) -> Result<(), ActionError> {
        let dead_wall = self.player(seat).latest_draw_was_dead_wall;
        let ctx = self.tsumo_context(seat, dead_wall);
        self.check_win(seat, None, &[], &ctx)
            .map_err(|source| ActionError::CannotTsumo { seat, source })?;

        // Ura dora only exist for a riichi hand; the re-evaluation folds
        // them into the yaku list.
        let mut ura_indicators = vec![];
        if self.player(seat).riichi {
            for _ in 0..self.dora_indicators.len() {
                ura_indicators.push(self.draw_from(DrawSource::Indicator)?);
            }
        }
        let score = self
            .check_win(seat, None, &ura_indicators, &ctx)
            .expect("probe succeeded with identical shape");

        self.settle_win(seat, None, &score, &ura_indicators, None);
        self.riichi_sticks = 0;

        if seat == self.dealer() {
            self.start_round(Transition::Bonus)
        } else {
            self.start_round(Transition::Next)
        }
    }

    /// Resolve one or more rons on `discarder`'s freshest discard, or on a
    /// kan tile for chankan. Honba and riichi sticks go to the caller
    /// nearest clockwise from the discarder.
    pub fn do_ron(
        &mut self,
        callers: &[Seat],
        discarder: Seat,
        chankan: Option<TileId>,
    ) -> Result<(), ActionError> {
        let ron_tile = match chankan {
            Some(tile) => {
                let has_kan = self
                    .player(discarder)
                    .melds
                    .iter()
                    .any(|m| m.is_kan() && m.base_kind() == tile.normal_kind());
                if !has_kan {
                    return Err(ActionError::NoChankanTarget { seat: discarder, tile });
                }
                tile
            }
            None => {
                self.player(discarder)
                    .discards
                    .last()
                    .ok_or(ActionError::NoDiscards { seat: discarder })?
                    .tile
            }
        };

        // Validate every caller before any payment.
        for &caller in callers {
            if caller == discarder {
                return Err(ActionError::CannotCallOwnDiscard { seat: caller });
            }
            if self.player(caller).is_furiten() {
                return Err(ActionError::RonWhileFuriten { seat: caller });
            }
            let ctx = self.ron_context(caller, chankan.is_some());
            self.check_win(caller, Some(ron_tile), &[], &ctx)
                .map_err(|source| ActionError::CannotRon { seat: caller, source })?;
        }

        // A riichi declaration that gets ronned never stood: the stick
        // comes back before anyone is paid.
        if chankan.is_none() {
            let last_was_riichi = self
                .player(discarder)
                .discards
                .last()
                .is_some_and(|d| d.is_riichi);
            if last_was_riichi {
                self.players[discarder.index()].points += RIICHI_STICK;
                self.riichi_sticks -= 1;
            }
        }

        let bonus_seat = callers
            .iter()
            .copied()
            .min_by_key(|c| c.sub(discarder).to_u8())
            .expect("at least one caller");

        // One shared ura round for all callers.
        let mut ura_indicators = vec![];
        for _ in 0..self.dora_indicators.len() {
            ura_indicators.push(self.draw_from(DrawSource::Indicator)?);
        }

        for &caller in callers {
            let mut ctx = self.ron_context(caller, chankan.is_some());
            if caller != bonus_seat {
                ctx.honba = 0;
                ctx.kyoutaku = 0;
            }
            let score = self
                .check_win(caller, Some(ron_tile), &ura_indicators, &ctx)
                .expect("validated above");
            let ura: &[TileId] =
                if self.player(caller).riichi { &ura_indicators } else { &[] };
            self.settle_win(caller, Some(ron_tile), &score, ura, Some(discarder));
        }

        self.riichi_sticks = 0;
        if callers.contains(&self.dealer()) {
            self.start_round(Transition::Bonus)
        } else {
            self.start_round(Transition::Next)
        }
    }

    /// Pay out one win and emit its record.
    fn settle_win(
        &mut self,
        seat: Seat,
        win_tile: Option<TileId>,
        score: &WinScore,
        ura_indicators: &[TileId],
        ronned: Option<Seat>,
    ) {
        debug!("{} wins: {} han {} fu {:?}", seat, score.han, score.fu, score.cost.level);
        self.redistribute(seat, &score.cost, ronned);

        let p = self.player(seat);
        let win = WinRecord {
            seat,
            hand: p.hand.clone(),
            win_tile,
            melds: p.melds.iter().map(|m| m.tiles.clone()).collect(),
            dora_indicators: self.dora_indicators.clone(),
            ura_dora_indicators: ura_indicators.to_vec(),
            han: score.han,
            fu: score.fu,
            yaku: score.yaku.clone(),
            level: score.cost.level,
            total_from_hand: score.cost.main + 2 * score.cost.additional,
            points: self.points(),
        };
        self.push_event(None, Event::Win { win });
    }

    /// Settlement when the live wall runs out: nagashi mangan first, plain
    /// tenpai payments otherwise.
    pub(crate) fn exhaustive_draw(&mut self) -> Result<(), ActionError> {
        let hands: [Option<Vec<TileId>>; 4] = std::array::from_fn(|i| {
            (self.players[i].shanten == 0).then(|| self.players[i].hand.clone())
        });
        let nagashi: [bool; 4] =
            std::array::from_fn(|i| self.players[i].has_nagashi_mangan());
        let tenpai_count = hands.iter().filter(|h| h.is_some()).count() as GamePoints;

        if nagashi.iter().any(|&n| n) {
            for seat in ALL_SEATS {
                if !nagashi[seat.index()] {
                    continue;
                }
                let cost = score::mangan_cost(seat == self.dealer());
                self.redistribute(seat, &cost, None);
            }
        } else if (1..4).contains(&tenpai_count) {
            for p in &mut self.players {
                if p.shanten == 0 {
                    p.points += 3000 / tenpai_count;
                } else {
                    p.points -= 3000 / (4 - tenpai_count);
                }
            }
        }

        let dealer_tenpai = hands[self.dealer().index()].is_some();
        let points = self.points();
        self.push_event(None, Event::Draw {
            kind: DrawKind::Exhaustive,
            hands: Some(hands),
            nagashi: Some(nagashi),
            points: Some(points),
        });

        if dealer_tenpai {
            self.start_round(Transition::Bonus)
        } else {
            self.start_round(Transition::Next)
        }
    }
}
