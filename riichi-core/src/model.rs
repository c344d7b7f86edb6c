//! Outbound data model: events (facts), queries (pending decisions), win
//! records and per-seat player state.

pub mod event;
pub mod player;
pub mod query;
pub mod win;

pub use self::{event::*, player::*, query::*, win::*};
