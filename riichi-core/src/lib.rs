//! Deterministic, event-driven core of a four-player Riichi Mahjong game.
//!
//! One [`engine::Game`] drives a full game from deal to game over: the wall
//! feeds tiles into per-seat hands, the round state machine validates driver
//! actions, mutates state and pushes facts ([`model::Event`]) and pending
//! decisions ([`model::Query`]) onto the outbound buffer. The external lobby
//! owns transport and player identity; it talks to the core exclusively via
//! the driver API on [`engine::Game`].

pub mod analysis;
pub mod common;
pub mod engine;
pub mod model;
pub mod rules;
pub mod score;

pub mod prelude {
    //! Convenient re-exports of commonly imported items.
    pub use super::{
        common::*,
        engine::{ActionError, Game, SeatConfig, Transition},
        model::*,
        rules::Ruleset,
        score::{ScoreError, ScoreLevel, WinContext, Yaku},
    };
}
