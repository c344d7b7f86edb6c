//! Hand analysis: shanten distance and ukeire (tile acceptance).

pub mod shanten;

pub use shanten::{is_complete, shanten, shanten_and_ukeire};
