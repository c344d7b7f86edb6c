//! Configurable rules, bundled as [`Ruleset`].

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::common::{GamePoints, Wind};

/// Bundle of configurable rule variations.
///
/// Defaults: East-only game, red fives and open tanyao on, dead-wall draws
/// consuming the live-wall counter, no kan under riichi.
#[derive(Derivative)]
#[derive(Clone, Debug)]
#[derivative(Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
#[non_exhaustive]
pub struct Ruleset {
    /// Starting points per seat.
    #[derivative(Default(value = "25000"))]
    pub starting_points: GamePoints,

    /// One red five per numbered suit.
    #[derivative(Default(value = "true"))]
    pub red_fives: bool,

    /// Aka dora count toward han.
    #[derivative(Default(value = "true"))]
    pub aka_dora: bool,

    /// Award tanyao to open hands (kuitan).
    #[derivative(Default(value = "true"))]
    pub open_tanyao: bool,

    /// Wind/round of the final scheduled round ("all last").
    #[derivative(Default(value = "Wind::East"))]
    pub final_wind: Wind,
    #[derivative(Default(value = "4"))]
    pub final_round: u8,

    /// Points some seat must reach for the game to end at "all last".
    #[derivative(Default(value = "30000"))]
    pub min_win_points: GamePoints,

    /// Dead-wall (rinshan) draws decrement `remaining_draws`.
    /// The standard rule keeps the live count untouched.
    #[derivative(Default(value = "true"))]
    pub dead_wall_draw_consumes_live: bool,

    /// Offer a closed kan while under riichi, restricted to the freshly
    /// drawn kind and only when the wait set is unchanged.
    #[derivative(Default(value = "false"))]
    pub riichi_ankan: bool,

    /// Allow chankan on a *closed* kan for a thirteen-orphans hand.
    #[derivative(Default(value = "false"))]
    pub kokushi_chankan_on_ankan: bool,
}
