//! Wait description attached to discard/riichi query options.

use serde::{Deserialize, Serialize};

use super::tile::Tile;

/// The waiting set a hand would have after some discard.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct WaitInfo {
    /// Waited-on kinds.
    pub tiles: Vec<Tile>,
    /// Per kind: winning on it would score at least one yaku.
    pub has_yaku: Vec<bool>,
    /// The wait is dead for ron (a waited kind sits in own discards).
    pub is_furiten: bool,
}
