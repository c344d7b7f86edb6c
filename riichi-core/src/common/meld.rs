//! Melds (called tile groups) and call-candidate enumeration.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::seat::Seat;
use super::tile::{Tile, TileId};
use super::tile_set::TileSet37;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MeldKind {
    Chi,
    Pon,
    ClosedKan,
    OpenKan,
    AddedKan,
}

/// A called group. Append-only once created, except for the in-place
/// promotion of a pon to an added kan.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Meld {
    pub kind: MeldKind,
    /// All tiles of the group, called tile included.
    pub tiles: Vec<TileId>,
    /// The seat that discarded the called tile; `None` for a closed kan.
    pub called_from: Option<Seat>,
    /// The called tile; `None` for a closed kan.
    pub called_tile: Option<TileId>,
}

impl Meld {
    pub fn chi(tiles: Vec<TileId>, from: Seat, called: TileId) -> Self {
        Meld { kind: MeldKind::Chi, tiles, called_from: Some(from), called_tile: Some(called) }
    }

    pub fn pon(tiles: Vec<TileId>, from: Seat, called: TileId) -> Self {
        Meld { kind: MeldKind::Pon, tiles, called_from: Some(from), called_tile: Some(called) }
    }

    pub fn open_kan(tiles: Vec<TileId>, from: Seat, called: TileId) -> Self {
        Meld { kind: MeldKind::OpenKan, tiles, called_from: Some(from), called_tile: Some(called) }
    }

    pub fn closed_kan(tiles: Vec<TileId>) -> Self {
        Meld { kind: MeldKind::ClosedKan, tiles, called_from: None, called_tile: None }
    }

    /// Promote this pon to an added kan with the fourth tile.
    pub fn promote_to_added_kan(&mut self, added: TileId) {
        debug_assert!(self.kind == MeldKind::Pon);
        debug_assert!(self.tiles[0].normal_kind() == added.normal_kind());
        self.kind = MeldKind::AddedKan;
        self.tiles.push(added);
    }

    pub fn is_kan(&self) -> bool {
        matches!(self.kind, MeldKind::ClosedKan | MeldKind::OpenKan | MeldKind::AddedKan)
    }

    /// Closed kans do not open the hand.
    pub fn opens_hand(&self) -> bool { self.kind != MeldKind::ClosedKan }

    /// The t34 kind of a triplet/quad meld, or the lowest kind of a chi.
    pub fn base_kind(&self) -> Tile {
        self.tiles
            .iter()
            .map(|id| id.normal_kind())
            .min()
            .expect("meld holds at least 3 tiles")
    }
}

impl Display for Meld {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.kind)?;
        for t in &self.tiles {
            write!(f, "{}", t.normal_kind())?;
        }
        write!(f, ")")?;
        if let (Some(from), Some(called)) = (self.called_from, self.called_tile) {
            write!(f, "<{}:{}", from, called.normal_kind())?;
        }
        Ok(())
    }
}

/// Pop the first tile matching the t37 kind out of `avail`.
fn pop_kind(avail: &mut Vec<TileId>, kind: Tile) -> Option<TileId> {
    let pos = avail.iter().position(|id| id.kind() == kind)?;
    Some(avail.remove(pos))
}

/// Map kind-level candidate groups onto the concrete tiles in `hand`,
/// dropping candidates the hand cannot cover. Red-five variants of each
/// candidate are enumerated separately so a caller may choose to spend (or
/// keep) the red copy.
fn materialize(candidates: Vec<Vec<Tile>>, hand: &[TileId]) -> Vec<Vec<TileId>> {
    let counts = TileSet37::from_iter(hand.iter().copied());
    candidates
        .into_iter()
        .filter(|kinds| {
            let want = kinds.iter().fold(TileSet37::default(), |mut acc, &k| {
                acc[k] += 1;
                acc
            });
            (0..37).all(|i| counts.0[i] >= want.0[i])
        })
        .map(|kinds| {
            let mut avail = hand.to_vec();
            kinds
                .iter()
                .map(|&k| pop_kind(&mut avail, k).expect("filtered above"))
                .collect()
        })
        .collect()
}

/// Expand a kind-level group into its red-five variants: the plain form plus,
/// for each five in the group, a form using the red copy instead.
fn red_variants(kinds: &[Tile]) -> Vec<Vec<Tile>> {
    let mut out = vec![kinds.to_vec()];
    for (i, k) in kinds.iter().enumerate() {
        if k.to_red() != *k {
            let mut red = kinds.to_vec();
            red[i] = k.to_red();
            red.sort();
            out.push(red);
        }
    }
    out.sort();
    out.dedup();
    out
}

/// All pon sets in `hand` completing the discarded tile: pairs of the same
/// kind, red fives enumerated.
pub fn pon_candidates(discard: TileId, hand: &[TileId]) -> Vec<Vec<TileId>> {
    let k = discard.normal_kind();
    materialize(red_variants(&[k, k]), hand)
}

/// All open-kan sets (three matching tiles in hand).
pub fn open_kan_candidates(discard: TileId, hand: &[TileId]) -> Vec<Vec<TileId>> {
    let k = discard.normal_kind();
    let counts = TileSet37::from_iter(hand.iter().copied());
    let have =
        counts[k] + if k.to_red() != k { counts[k.to_red()] } else { 0 };
    if have < 3 {
        return vec![];
    }
    let mut avail = hand.to_vec();
    let mut set = vec![];
    for _ in 0..3 {
        let id = pop_kind(&mut avail, k)
            .or_else(|| pop_kind(&mut avail, k.to_red()))
            .expect("counted above");
        set.push(id);
    }
    vec![set]
}

/// All chi sets in `hand` completing the discarded tile (numbered suits
/// only), red fives enumerated.
pub fn chi_candidates(discard: TileId, hand: &[TileId]) -> Vec<Vec<TileId>> {
    let k = discard.normal_kind();
    if !k.is_numeral() {
        return vec![];
    }
    let e = k.normal_encoding();
    let idx = e % 9;
    let kind = |delta: i8| Tile::from_encoding((e as i8 + delta) as u8).unwrap();

    let mut candidates = vec![];
    if idx >= 2 {
        candidates.extend(red_variants(&[kind(-2), kind(-1)]));
    }
    if (1..=7).contains(&idx) {
        candidates.extend(red_variants(&[kind(-1), kind(1)]));
    }
    if idx <= 6 {
        candidates.extend(red_variants(&[kind(1), kind(2)]));
    }
    materialize(candidates, hand)
}

/// Kinds forbidden from the discard immediately after a chi: always the
/// called kind, plus — for an edge chi — the single kind one past the far
/// end of the run (the other tile of the two-sided wait the call used up).
pub fn chi_kuikae_kinds(meld: &Meld) -> Vec<Tile> {
    let called = meld.called_tile.expect("chi is always called").normal_kind();
    let mut kinds: Vec<Tile> = meld.tiles.iter().map(|id| id.normal_kind()).collect();
    kinds.sort();
    let mut forbidden = vec![called];
    let idx = called.normal_encoding() % 9;
    if called == kinds[0] {
        // left chi: called tile at the low end, e.g. 3m completing 4m5m
        if idx <= 5 {
            forbidden.push(Tile::from_encoding(called.normal_encoding() + 3).unwrap());
        }
    } else if called == kinds[2] {
        // right chi: called tile at the high end, e.g. 6m completing 4m5m
        if idx >= 3 {
            forbidden.push(Tile::from_encoding(called.normal_encoding() - 3).unwrap());
        }
    }
    forbidden
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tile::tile_ids_from_str;
    use assert2::check;

    fn ids(s: &str) -> Vec<TileId> { tile_ids_from_str(s).unwrap() }

    #[test]
    fn pon_enumerates_red_variants() {
        // hand holds red 5p (copy 0) and two plain 5p
        let hand = ids("5p5p5p1m");
        let discard = TileId::from_kind_copy("5p".parse().unwrap(), 3);
        let sets = pon_candidates(discard, &hand);
        // plain+plain and red+plain
        check!(sets.len() == 2);
        check!(sets.iter().any(|s| s.iter().any(|t| t.is_red())));
        check!(sets.iter().any(|s| s.iter().all(|t| !t.is_red())));
    }

    #[test]
    fn chi_covers_all_three_shapes() {
        let hand = ids("1m2m4m5m7m8m");
        let discard = TileId::from_kind_copy("3m".parse().unwrap(), 0);
        let sets = chi_candidates(discard, &hand);
        // 12+3, 24+3, 45+3
        check!(sets.len() == 3);
    }

    #[test]
    fn chi_rejects_honors() {
        let hand = ids("ew ew");
        let discard = TileId::from_kind_copy(Tile::EAST, 2);
        check!(chi_candidates(discard, &hand).is_empty());
    }

    #[test]
    fn pon_promotes_to_added_kan() {
        let tiles = ids("ww ww ww");
        let called = tiles[0];
        let mut meld = Meld::pon(tiles, crate::common::seat::S2, called);
        meld.promote_to_added_kan(TileId::from_kind_copy("ww".parse().unwrap(), 3));
        check!(meld.kind == MeldKind::AddedKan);
        check!(meld.tiles.len() == 4);
        check!(meld.is_kan());
        check!(meld.opens_hand());
    }

    #[test]
    fn kuikae_for_left_chi_includes_far_end_kind() {
        // called 3m completing 4m5m: forbidden 3m and 6m
        let tiles = ids("3m4m5m");
        let meld = Meld::chi(tiles.clone(), crate::common::seat::S0, tiles[0]);
        let kinds = chi_kuikae_kinds(&meld);
        check!(kinds.contains(&"3m".parse().unwrap()));
        check!(kinds.contains(&"6m".parse().unwrap()));
        check!(kinds.len() == 2);
    }

    #[test]
    fn kuikae_for_right_chi_with_no_far_end_is_called_kind_only() {
        // called 3m completing 1m2m: nothing exists below 1m, so only the
        // called kind is withheld
        let tiles = ids("1m2m3m");
        let meld = Meld::chi(tiles.clone(), crate::common::seat::S0, tiles[2]);
        check!(chi_kuikae_kinds(&meld) == vec!["3m".parse().unwrap()]);
    }

    #[test]
    fn kuikae_for_right_chi_includes_far_end_kind() {
        // called 6m completing 4m5m: forbidden 6m and 3m
        let tiles = ids("4m5m6m");
        let meld = Meld::chi(tiles.clone(), crate::common::seat::S0, tiles[2]);
        let kinds = chi_kuikae_kinds(&meld);
        check!(kinds.contains(&"6m".parse().unwrap()));
        check!(kinds.contains(&"3m".parse().unwrap()));
        check!(kinds.len() == 2);
    }

    #[test]
    fn kuikae_for_middle_chi_is_called_kind_only() {
        let tiles = ids("4s5s6s");
        let meld = Meld::chi(tiles.clone(), crate::common::seat::S0, tiles[1]);
        check!(chi_kuikae_kinds(&meld) == vec!["5s".parse().unwrap()]);
    }
}
