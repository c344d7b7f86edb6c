//! The draw phase: pull a tile, then offer the seat its options in a fixed
//! order — nine-terminal abort, tsumo, kan, riichi, and finally the
//! mandatory discard query.

use log::warn;

use crate::common::*;
use crate::model::*;
use crate::score::ScoreError;

use super::{ActionError, DrawSource, Game, RIICHI_STICK};

impl Game {
    /// Draw for `seat` and issue its queries. Runs the exhaustive-draw
    /// settlement instead when the live wall is spent.
    pub(crate) fn draw_tile(&mut self, seat: Seat, dead_wall: bool) -> Result<(), ActionError> {
        if self.remaining_draws == 0 {
            return self.exhaustive_draw();
        }

        self.active_seat = seat;
        self.kuikae.clear();
        let source = if dead_wall { DrawSource::DeadWall } else { DrawSource::Live };
        let id = self.draw_from(source)?;
        {
            let p = &mut self.players[seat.index()];
            p.hand.push(id);
            p.latest_draw = Some(id);
            p.latest_draw_was_dead_wall = dead_wall;
        }
        self.push_event(None, Event::Tile { seat, tile: Some(id) });

        self.check_nine_terminal_query(seat);
        self.check_tsumo_query(seat, dead_wall);
        self.check_kan_query(seat);
        self.check_riichi_query(seat);
        self.ask_discard(seat);
        Ok(())
    }

    /// First draw, no calls anywhere, and nine or more distinct orphan
    /// kinds in the 14-tile hand.
    fn check_nine_terminal_query(&mut self, seat: Seat) {
        let p = self.player(seat);
        if !p.discards.is_empty() {
            return;
        }
        if self.players.iter().any(|q| !q.melds.is_empty()) {
            return;
        }
        if p.closed_counts().terminal_kinds() < 9 {
            return;
        }
        self.push_event(Some(seat), Event::Query(Query::NineTerminals));
    }

    fn check_tsumo_query(&mut self, seat: Seat, dead_wall: bool) {
        let ctx = self.tsumo_context(seat, dead_wall);
        match self.check_win(seat, None, &[], &ctx) {
            // Tsumo ignores furiten.
            Ok(_) => self.push_event(Some(seat), Event::Query(Query::Tsumo)),
            Err(ScoreError::NotWinning | ScoreError::NoYaku) => {}
            // a malformed hand mid-round is an engine bug, not a player state
            Err(e @ ScoreError::NotCorrect) => {
                warn!("tsumo probe failed for {}: {}", seat, e)
            }
        }
    }

    /// Closed kans for every four-of-a-kind in hand, added kans for every
    /// pon matched by a hand tile. Needs live draws left; under riichi only
    /// the wait-preserving closed kan of the drawn kind (if enabled at all).
    fn check_kan_query(&mut self, seat: Seat) {
        if self.remaining_draws == 0 {
            return;
        }
        let p = self.player(seat);
        let counts = p.closed_counts();
        let mut choices: Vec<Vec<TileId>> = vec![];

        for k in 0..34u8 {
            if counts.0[k as usize] != 4 {
                continue;
            }
            let kind = Tile::from_encoding(k).unwrap();
            if p.riichi && !self.riichi_ankan_allowed(seat, kind) {
                continue;
            }
            choices.push(
                p.hand
                    .iter()
                    .copied()
                    .filter(|id| id.normal_kind() == kind)
                    .collect(),
            );
        }

        if !p.riichi {
            for meld in &p.melds {
                if meld.kind != MeldKind::Pon {
                    continue;
                }
                let kind = meld.base_kind();
                if let Some(&added) =
                    p.hand.iter().find(|id| id.normal_kind() == kind)
                {
                    let mut tiles = meld.tiles.clone();
                    tiles.push(added);
                    choices.push(tiles);
                }
            }
        }

        if choices.is_empty() {
            return;
        }
        self.push_event(Some(seat), Event::Query(Query::Call {
            kind: CallKind::Kan,
            choices,
            from_seat: None,
            discard_idx: None,
        }));
    }

    /// Under riichi a closed kan may only use the freshly drawn kind, and
    /// only if the wait set is unchanged by setting the four tiles aside.
    fn riichi_ankan_allowed(&self, seat: Seat, kind: Tile) -> bool {
        if !self.rules.riichi_ankan {
            return false;
        }
        let p = self.player(seat);
        if p.latest_draw.map(|id| id.normal_kind()) != Some(kind) {
            return false;
        }
        let mut without = p.closed_counts();
        without[kind] -= 4;
        let (shanten, ukeire) =
            crate::analysis::shanten_and_ukeire(&without, p.melds.len() as u8 + 1);
        shanten == 0 && ukeire == p.ukeire
    }

    /// Closed hand, 1000 points to stake, four live draws left, and some
    /// discard that leaves the hand tenpai.
    fn check_riichi_query(&mut self, seat: Seat) {
        let p = self.player(seat);
        if p.riichi
            || p.points < RIICHI_STICK
            || self.remaining_draws < 4
            || !p.is_closed()
        {
            return;
        }

        let mut allowed = vec![];
        let mut waits = vec![];
        for (i, &id) in p.hand.iter().enumerate() {
            let Some(wait) = self.wait_after_discard(p, i) else { continue };
            allowed.push(id);
            waits.push(wait);
        }
        if allowed.is_empty() {
            return;
        }
        self.push_event(Some(seat), Event::Query(Query::Riichi { allowed, waits }));
    }

    /// The mandatory discard query. Under riichi only the drawn tile may
    /// go; post-call kuikae kinds are withheld.
    pub(crate) fn ask_discard(&mut self, seat: Seat) {
        let p = self.player(seat);
        let mut allowed = vec![];
        let mut waits = vec![];
        for (i, &id) in p.hand.iter().enumerate() {
            if p.riichi && p.latest_draw != Some(id) {
                continue;
            }
            if self.kuikae.contains(&id.normal_kind()) {
                continue;
            }
            allowed.push(id);
            waits.push(self.wait_after_discard(p, i));
        }
        self.push_event(Some(seat), Event::Query(Query::Discard { allowed, waits }));
    }

    /// The wait left by discarding the `i`-th hand tile, if it is tenpai.
    fn wait_after_discard(&self, p: &PlayerState, i: usize) -> Option<WaitInfo> {
        let dropped = p.hand[i];
        let mut counts = p.closed_counts();
        counts[dropped.normal_kind()] -= 1;
        let (shanten, ukeire) =
            crate::analysis::shanten_and_ukeire(&counts, p.melds.len() as u8);
        if shanten != 0 {
            return None;
        }
        let is_furiten = p.furiten_for_waits(&ukeire, &[dropped.normal_kind()]);
        let has_yaku = ukeire
            .iter()
            .map(|&wait| self.wait_has_yaku(p, &counts, wait))
            .collect();
        Some(WaitInfo { tiles: ukeire, has_yaku, is_furiten })
    }

    /// Whether winning on `wait` would carry a yaku (probed with a bare ron
    /// context; riichi and situational yaku can only add to it).
    fn wait_has_yaku(&self, p: &PlayerState, counts: &TileSet34, wait: Tile) -> bool {
        let mut closed: Vec<TileId> = vec![];
        for k in 0..34u8 {
            let kind = Tile::from_encoding(k).unwrap();
            for copy in 0..counts.0[k as usize] {
                closed.push(TileId::from_kind_copy(kind, copy));
            }
        }
        closed.push(TileId::from_kind_copy(wait, 3));
        let ctx = crate::score::WinContext {
            seat_wind: self.seat_wind(p.seat),
            is_dealer: p.seat == self.dealer(),
            is_riichi: p.riichi,
            is_double_riichi: p.double_riichi,
            ..self.base_context()
        };
        crate::score::evaluate(
            &closed,
            &p.melds,
            *closed.last().unwrap(),
            &[],
            &[],
            &ctx,
        )
        .is_ok()
    }
}
