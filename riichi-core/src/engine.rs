//! The round state machine and game controller.
//!
//! [`Game`] is strictly single-threaded and cooperative: every mutation
//! happens inside one driver call, and the engine suspends by returning
//! after pushing events (queries included) onto the outbound buffer. The
//! post-arbitration tail of a discard or kan is parked as an explicit
//! [`Continuation`] value and resumed either inline (no queries issued) or
//! by the driver through [`Game::run_continuation`].

mod calls;
mod discard;
mod errors;
mod turn;
mod wins;

use std::collections::VecDeque;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::common::*;
use crate::model::*;
use crate::rules::Ruleset;
use crate::score::WinContext;

pub use self::errors::ActionError;

/// Cost of a riichi declaration.
pub(crate) const RIICHI_STICK: GamePoints = 1000;

/// One seat's configuration at game start.
#[derive(Clone, Debug)]
pub struct SeatConfig {
    pub name: String,
    /// Wire-format tile string pre-seeding this seat's next deal.
    pub preset_hand: Option<String>,
}

impl SeatConfig {
    pub fn new(name: impl Into<String>) -> Self {
        SeatConfig { name: name.into(), preset_hand: None }
    }

    pub fn with_hand(name: impl Into<String>, hand: impl Into<String>) -> Self {
        SeatConfig { name: name.into(), preset_hand: Some(hand.into()) }
    }
}

/// Inter-round transition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Transition {
    /// Replay the same round.
    Same,
    /// Advance the round number, rotating the wind after the fourth round.
    Next,
    /// Same round, bonus counter incremented.
    Bonus,
    /// Jump to an explicit (wind, round, bonus).
    To(Wind, u8, u8),
}

/// The deferred tail of an action, run once the pending queries drain.
#[derive(Clone, Debug)]
pub(crate) enum Continuation {
    AfterDiscard {
        seat: Seat,
        riichi_count: usize,
        total_kans: usize,
        kans_same_seat: bool,
        ron_passers: Vec<Seat>,
    },
    AfterKan {
        seat: Seat,
        closed: bool,
        ron_passers: Vec<Seat>,
    },
    AfterOpenKan {
        caller: Seat,
    },
}

/// Where a tile is drawn from; decides preset-queue use and draw accounting.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum DrawSource {
    /// Initial deal. Never consumes the preset queue or the draw counter.
    Deal,
    /// A normal turn draw.
    Live,
    /// A replacement draw after a kan.
    DeadWall,
    /// A dora/ura indicator flip. Does not consume the draw counter.
    Indicator,
}

/// One full game of four players. Owns the wall, the players, the RNG and
/// the outbound event buffer.
pub struct Game {
    pub(crate) rules: Ruleset,
    pub(crate) rng: StdRng,

    pub(crate) wind: Wind,
    pub(crate) round: u8,
    pub(crate) bonus: u8,
    pub(crate) active_seat: Seat,
    pub(crate) players: Vec<PlayerState>,
    pub(crate) wall: Wall,
    pub(crate) dora_indicators: Vec<TileId>,
    pub(crate) remaining_draws: u8,
    pub(crate) riichi_sticks: u8,

    pub(crate) preset_tiles: VecDeque<TileId>,
    pub(crate) pending_events: Vec<(Option<Seat>, Event)>,
    pub(crate) continuation: Option<Continuation>,
    /// Kinds the active seat may not discard (post-call kuikae).
    pub(crate) kuikae: Vec<Tile>,
}

impl Game {
    pub fn new(rules: Ruleset) -> Self {
        Self::with_rng(rules, StdRng::from_entropy())
    }

    /// Deterministic game for tests and replays.
    pub fn with_seed(rules: Ruleset, seed: u64) -> Self {
        Self::with_rng(rules, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rules: Ruleset, rng: StdRng) -> Self {
        let wall = Wall::new(rules.red_fives);
        Game {
            rules,
            rng,
            wind: Wind::East,
            round: 1,
            bonus: 0,
            active_seat: S0,
            players: vec![],
            wall,
            dora_indicators: vec![],
            remaining_draws: 0,
            riichi_sticks: 0,
            preset_tiles: VecDeque::new(),
            pending_events: vec![],
            continuation: None,
            kuikae: vec![],
        }
    }

    // ------------------------------------------------------------------
    // Observers

    pub fn wind(&self) -> Wind { self.wind }
    pub fn round(&self) -> u8 { self.round }
    pub fn bonus(&self) -> u8 { self.bonus }
    pub fn active_seat(&self) -> Seat { self.active_seat }
    pub fn remaining_draws(&self) -> u8 { self.remaining_draws }
    pub fn riichi_sticks(&self) -> u8 { self.riichi_sticks }
    pub fn dora_indicators(&self) -> &[TileId] { &self.dora_indicators }
    pub fn wall(&self) -> &Wall { &self.wall }

    pub fn player(&self, seat: Seat) -> &PlayerState {
        &self.players[seat.index()]
    }

    pub fn points(&self) -> [GamePoints; 4] {
        let mut points = [0; 4];
        for (i, p) in self.players.iter().enumerate() {
            points[i] = p.points;
        }
        points
    }

    /// The dealer of the current round.
    pub fn dealer(&self) -> Seat {
        Seat::new(self.round - 1)
    }

    pub fn seat_wind(&self, seat: Seat) -> Wind {
        Wind::from_index(seat.sub(self.dealer()).to_u8())
    }

    // ------------------------------------------------------------------
    // Event bus

    pub(crate) fn push_event(&mut self, seat: Option<Seat>, event: Event) {
        self.pending_events.push((seat, event));
    }

    /// Drain the outbound buffer. `(None, event)` entries are broadcast;
    /// `(Some(seat), event)` entries are addressed to one seat.
    pub fn pop_events(&mut self) -> Vec<(Option<Seat>, Event)> {
        std::mem::take(&mut self.pending_events)
    }

    pub(crate) fn has_pending_queries(&self) -> bool {
        self.pending_events.iter().any(|(_, ev)| ev.is_query())
    }

    /// Park `cont` if queries are in flight, otherwise run it now.
    pub(crate) fn wait_for_queries(&mut self, cont: Continuation) -> Result<(), ActionError> {
        if self.has_pending_queries() {
            self.continuation = Some(cont);
            Ok(())
        } else {
            self.resume(cont)
        }
    }

    /// Decline all optional queries and resume the parked continuation.
    pub fn run_continuation(&mut self) -> Result<(), ActionError> {
        match self.continuation.take() {
            Some(cont) => self.resume(cont),
            None => Ok(()),
        }
    }

    fn resume(&mut self, cont: Continuation) -> Result<(), ActionError> {
        match cont {
            Continuation::AfterDiscard { .. } => self.resume_after_discard(cont),
            Continuation::AfterKan { .. } => self.resume_after_kan(cont),
            Continuation::AfterOpenKan { caller } => self.resume_after_open_kan(caller),
        }
    }

    // ------------------------------------------------------------------
    // Game lifecycle

    /// Seed the preset draw queue: these physical tiles are served, in
    /// order, for every non-deal draw (turn draws, dead-wall draws and
    /// indicator flips).
    pub fn set_tile_preset(&mut self, tiles: &str) -> Result<(), ParseTileError> {
        self.preset_tiles = tile_ids_from_str(tiles)?.into();
        Ok(())
    }

    pub fn start_game(
        &mut self,
        seats: Vec<SeatConfig>,
        shuffle: bool,
    ) -> Result<(), ActionError> {
        if seats.len() != 4 {
            return Err(ActionError::WrongSeatCount(seats.len()));
        }
        let mut players: Vec<PlayerState> = seats
            .into_iter()
            .map(|s| PlayerState::new(s.name, s.preset_hand))
            .collect();
        if shuffle {
            players.shuffle(&mut self.rng);
        }
        for (i, p) in players.iter_mut().enumerate() {
            p.seat = Seat::new(i as u8);
            p.points = self.rules.starting_points;
        }
        self.players = players;

        self.push_event(None, Event::NewGame {
            player_names: self.players.iter().map(|p| p.name.clone()).collect(),
            points: self.points(),
        });
        self.start_round(Transition::To(Wind::East, 1, 0))
    }

    pub fn start_round(&mut self, transition: Transition) -> Result<(), ActionError> {
        match transition {
            Transition::Same => {}
            Transition::Next => {
                self.round = self.round % 4 + 1;
                if self.round == 1 {
                    self.wind = self.wind.next();
                }
                self.bonus = 0;
            }
            Transition::Bonus => {
                self.bonus += 1;
            }
            Transition::To(wind, round, bonus) => {
                debug_assert!((1..=4).contains(&round));
                self.wind = wind;
                self.round = round;
                self.bonus = bonus;
            }
        }
        debug!("starting round {}{}-{}", self.wind, self.round, self.bonus);

        if self.check_game_over() {
            return Ok(());
        }

        self.dora_indicators.clear();
        self.remaining_draws = 70;
        self.wall.reset();
        self.continuation = None;
        self.kuikae.clear();
        for p in &mut self.players {
            p.reset_round();
        }

        self.deal_hands()?;
        let hands = std::array::from_fn(|i| Some(self.players[i].hand.clone()));
        self.push_event(None, Event::NewRound {
            wind: self.wind,
            round: self.round,
            bonus: self.bonus,
            hands,
        });

        self.reveal_dora()?;
        self.draw_tile(self.dealer(), false)
    }

    fn deal_hands(&mut self) -> Result<(), ActionError> {
        // Preset hands are taken from the wall first, then everyone is
        // topped up to 13 with random draws.
        for i in 0..4 {
            if let Some(hand_str) = self.players[i].preset_hand.clone() {
                for id in tile_ids_from_str(&hand_str)? {
                    let taken = self.wall.take(id)?;
                    self.players[i].hand.push(taken);
                }
            }
        }
        for i in 0..4 {
            while self.players[i].hand.len() < 13 {
                let id = self.draw_from(DrawSource::Deal)?;
                self.players[i].hand.push(id);
            }
            self.players[i].recalc_shanten();
        }
        Ok(())
    }

    /// Pull one tile. The preset queue feeds every source but the deal;
    /// live and dead-wall draws consume the draw counter (the latter per
    /// [`Ruleset::dead_wall_draw_consumes_live`]).
    pub(crate) fn draw_from(&mut self, source: DrawSource) -> Result<TileId, ActionError> {
        match source {
            DrawSource::Live => self.remaining_draws -= 1,
            DrawSource::DeadWall => {
                if self.rules.dead_wall_draw_consumes_live {
                    self.remaining_draws -= 1;
                }
            }
            DrawSource::Deal | DrawSource::Indicator => {}
        }
        if source != DrawSource::Deal {
            if let Some(id) = self.preset_tiles.pop_front() {
                return Ok(self.wall.take(id)?);
            }
        }
        Ok(self.wall.draw(&mut self.rng, &[])?)
    }

    pub(crate) fn reveal_dora(&mut self) -> Result<(), ActionError> {
        let id = self.draw_from(DrawSource::Indicator)?;
        self.dora_indicators.push(id);
        self.push_event(None, Event::Dora { tile: id });
        Ok(())
    }

    fn round_ordinal(&self, wind: Wind, round: u8) -> u8 {
        wind.ordinal() * 10 + round
    }

    /// Emits `GameOver` and reports true when the game cannot continue.
    pub(crate) fn check_game_over(&mut self) -> bool {
        let last = self.round_ordinal(self.rules.final_wind, self.rules.final_round);
        let now = self.round_ordinal(self.wind, self.round);
        let dealer_points = self.players[self.dealer().index()].points;

        let bankrupt = self.players.iter().any(|p| p.points < 0);
        let past_last = now > last
            && self.players.iter().any(|p| p.points >= self.rules.min_win_points);
        let dealer_leads = now >= last
            && self.bonus > 0
            && self
                .players
                .iter()
                .all(|p| p.seat == self.dealer() || p.points < dealer_points);

        if !(bankrupt || past_last || dealer_leads) {
            return false;
        }
        let points = self.points();
        self.push_event(None, Event::GameOver { points });
        true
    }

    // ------------------------------------------------------------------
    // Evaluation contexts

    pub(crate) fn base_context(&self) -> WinContext {
        WinContext {
            round_wind: self.wind,
            honba: self.bonus,
            kyoutaku: self.riichi_sticks,
            aka_dora: self.rules.aka_dora,
            open_tanyao: self.rules.open_tanyao,
            ..WinContext::default()
        }
    }

    pub(crate) fn tsumo_context(&self, seat: Seat, dead_wall: bool) -> WinContext {
        let p = self.player(seat);
        let first_draw = p.discards.is_empty();
        let no_calls = self.players.iter().all(|q| q.melds.is_empty());
        let complete = crate::analysis::is_complete(&p.closed_counts(), p.melds.len() as u8);
        WinContext {
            is_tsumo: true,
            seat_wind: self.seat_wind(seat),
            is_dealer: seat == self.dealer(),
            is_riichi: p.riichi,
            is_double_riichi: p.double_riichi,
            is_ippatsu: p.ippatsu,
            is_rinshan: dead_wall,
            is_haitei: self.remaining_draws == 0,
            is_tenhou: seat == self.dealer() && first_draw && complete,
            is_chiihou: seat != self.dealer() && first_draw && no_calls && complete,
            ..self.base_context()
        }
    }

    pub(crate) fn ron_context(&self, seat: Seat, chankan: bool) -> WinContext {
        let p = self.player(seat);
        WinContext {
            is_tsumo: false,
            seat_wind: self.seat_wind(seat),
            is_dealer: seat == self.dealer(),
            is_riichi: p.riichi,
            is_double_riichi: p.double_riichi,
            is_ippatsu: p.ippatsu,
            is_chankan: chankan,
            is_houtei: self.remaining_draws == 0 && !chankan,
            ..self.base_context()
        }
    }

    /// Probe or finalize a win for `seat`. For ron, `win_tile` is appended
    /// to the closed hand; for tsumo it must already be there.
    pub(crate) fn check_win(
        &self,
        seat: Seat,
        win_tile: Option<TileId>,
        ura_indicators: &[TileId],
        ctx: &WinContext,
    ) -> Result<crate::score::WinScore, crate::score::ScoreError> {
        let p = self.player(seat);
        let mut closed = p.hand.clone();
        let win = match win_tile {
            Some(id) => {
                closed.push(id);
                id
            }
            None => *closed.last().ok_or(crate::score::ScoreError::NotCorrect)?,
        };
        crate::score::evaluate(
            &closed,
            &p.melds,
            win,
            &self.dora_indicators,
            ura_indicators,
            ctx,
        )
    }

    // ------------------------------------------------------------------
    // Settlement

    /// Apply a win's payments: the winner collects `total`; on ron the
    /// discarder covers `main`, on tsumo the dealer covers `main` and the
    /// other seats `additional`.
    pub(crate) fn redistribute(
        &mut self,
        winner: Seat,
        cost: &crate::score::Cost,
        ronned: Option<Seat>,
    ) {
        let dealer = self.dealer();
        self.players[winner.index()].points += cost.total;
        for i in 0..4 {
            let seat = Seat::new(i as u8);
            if seat == winner {
                continue;
            }
            match ronned {
                Some(discarder) => {
                    if seat == discarder {
                        self.players[i].points -= cost.main + cost.main_bonus;
                    }
                }
                None => {
                    if seat == dealer {
                        self.players[i].points -= cost.main + cost.main_bonus;
                    } else {
                        self.players[i].points -= cost.additional + cost.additional_bonus;
                    }
                }
            }
        }
    }
}
