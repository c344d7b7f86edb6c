//! Per-seat mutable state. A [`PlayerState`] survives across rounds; the
//! per-round fields reset at every deal. Game logic that needs the whole
//! table (other seats, the wall, the event bus) lives in [`crate::engine`],
//! which passes itself around explicitly instead of storing back-references.

use crate::analysis;
use crate::common::*;

#[derive(Clone, Debug)]
pub struct PlayerState {
    pub name: String,
    pub seat: Seat,
    pub points: GamePoints,

    /// Concealed tiles, in draw order; the latest draw sits at the end.
    pub hand: Vec<TileId>,
    pub melds: Vec<Meld>,
    pub discards: Vec<Discard>,

    pub shanten: i8,
    pub ukeire: Vec<Tile>,

    pub latest_draw: Option<TileId>,
    pub latest_draw_was_dead_wall: bool,

    pub riichi: bool,
    pub double_riichi: bool,
    pub ippatsu: bool,
    pub temp_furiten: bool,
    pub has_pending_dora: bool,

    /// Preset starting hand for the next deal (tests and scripted games).
    pub preset_hand: Option<String>,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, preset_hand: Option<String>) -> Self {
        PlayerState {
            name: name.into(),
            seat: S0,
            points: 0,
            hand: vec![],
            melds: vec![],
            discards: vec![],
            shanten: 0,
            ukeire: vec![],
            latest_draw: None,
            latest_draw_was_dead_wall: false,
            riichi: false,
            double_riichi: false,
            ippatsu: false,
            temp_furiten: false,
            has_pending_dora: false,
            preset_hand,
        }
    }

    pub fn reset_round(&mut self) {
        self.hand.clear();
        self.melds.clear();
        self.discards.clear();
        self.shanten = 0;
        self.ukeire.clear();
        self.latest_draw = None;
        self.latest_draw_was_dead_wall = false;
        self.riichi = false;
        self.double_riichi = false;
        self.ippatsu = false;
        self.temp_furiten = false;
        self.has_pending_dora = false;
    }

    pub fn closed_counts(&self) -> TileSet34 {
        TileSet34::from_iter(self.hand.iter().copied())
    }

    /// Recompute the shanten/ukeire cache from the closed hand. Call only
    /// when the hand is back to 3n+1 form.
    pub fn recalc_shanten(&mut self) {
        let (shanten, ukeire) =
            analysis::shanten_and_ukeire(&self.closed_counts(), self.melds.len() as u8);
        self.shanten = shanten;
        self.ukeire = ukeire;
    }

    /// Only closed kans keep the hand closed.
    pub fn is_closed(&self) -> bool {
        !self.melds.iter().any(Meld::opens_hand)
    }

    /// Would this wait set be dead for ron, given own discards (plus any
    /// hypothetical extra discard kinds)?
    pub fn furiten_for_waits(&self, waits: &[Tile], extra_discards: &[Tile]) -> bool {
        let mut seen = TileMask34::from_iter(
            self.discards.iter().map(|d| d.tile.normal_kind()));
        for &t in extra_discards {
            seen.insert(t);
        }
        waits.iter().any(|&w| seen.has(w))
    }

    /// Furiten: temporarily after passing on a win, or whenever a tenpai
    /// hand waits on a kind sitting in its own discards.
    pub fn is_furiten(&self) -> bool {
        self.temp_furiten
            || (self.shanten == 0 && self.furiten_for_waits(&self.ukeire, &[]))
    }

    /// All discards are uncalled terminals/honors.
    pub fn has_nagashi_mangan(&self) -> bool {
        self.discards
            .iter()
            .all(|d| d.tile.normal_kind().is_terminal() && d.called_by.is_none())
    }

    pub fn remove_from_hand(&mut self, tile: TileId) -> bool {
        match self.hand.iter().position(|&t| t == tile) {
            Some(i) => {
                self.hand.remove(i);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tile_ids_from_str;
    use assert2::check;

    fn tenpai_player() -> PlayerState {
        let mut p = PlayerState::new("test", None);
        p.hand = tile_ids_from_str("2m3m4m5m6m2p3p4p9s9s wd wd wd").unwrap();
        p.recalc_shanten();
        p
    }

    #[test]
    fn shanten_cache_tracks_hand() {
        let p = tenpai_player();
        check!(p.shanten == 0);
        check!(!p.ukeire.is_empty());
    }

    #[test]
    fn discard_furiten_on_own_wait() {
        let mut p = tenpai_player();
        check!(!p.is_furiten());
        // waits are 1m/4m/7m; discarding a 7m earlier kills ron
        p.discards.push(Discard::new("7m3".parse().unwrap(), false, false));
        check!(p.is_furiten());
    }

    #[test]
    fn temp_furiten_overrides_everything() {
        let mut p = tenpai_player();
        p.temp_furiten = true;
        check!(p.is_furiten());
    }

    #[test]
    fn nagashi_needs_uncalled_orphans() {
        let mut p = PlayerState::new("test", None);
        p.discards.push(Discard::new("9s0".parse().unwrap(), false, false));
        p.discards.push(Discard::new("ew0".parse().unwrap(), true, false));
        check!(p.has_nagashi_mangan());
        p.discards[1].called_by = Some(S2);
        check!(!p.has_nagashi_mangan());
        p.discards[1].called_by = None;
        p.discards.push(Discard::new("5p1".parse().unwrap(), false, false));
        check!(!p.has_nagashi_mangan());
    }

    #[test]
    fn closed_kan_keeps_hand_closed() {
        let mut p = PlayerState::new("test", None);
        p.melds.push(Meld::closed_kan(tile_ids_from_str("ew ew ew ew").unwrap()));
        check!(p.is_closed());
        p.melds.push(Meld::pon(tile_ids_from_str("wd wd wd").unwrap(), S1,
                               "wd0".parse().unwrap()));
        check!(!p.is_closed());
    }
}
