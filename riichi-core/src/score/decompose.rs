//! Decomposition of the closed part of a complete hand into sets and pair.

use crate::common::{Tile, TileSet34};

use super::fu::WaitKind;

/// One concealed set in a decomposition.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ClosedSet {
    /// Lowest kind of the run.
    Run(Tile),
    Triplet(Tile),
}

/// A full decomposition of the closed part: `4 − melds` sets plus the pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decomposition {
    pub sets: Vec<ClosedSet>,
    pub pair: Tile,
}

/// Where the winning tile is taken to sit within a decomposition.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Placement {
    Set(usize),
    Pair,
}

/// All decompositions of `counts` into exactly `needed_sets` sets + 1 pair.
pub fn decompose(counts: &TileSet34, needed_sets: u8) -> Vec<Decomposition> {
    let mut hist = counts.0;
    let mut out = vec![];
    let mut sets = vec![];
    // pick the pair first, then peel sets
    for k in 0..34u8 {
        if hist[k as usize] < 2 {
            continue;
        }
        hist[k as usize] -= 2;
        let pair = Tile::from_encoding(k).unwrap();
        peel_sets(&mut hist, 0, needed_sets, pair, &mut sets, &mut out);
        hist[k as usize] += 2;
    }
    out.dedup();
    out
}

fn peel_sets(
    hist: &mut [u8; 34],
    mut idx: usize,
    remaining: u8,
    pair: Tile,
    sets: &mut Vec<ClosedSet>,
    out: &mut Vec<Decomposition>,
) {
    while idx < 34 && hist[idx] == 0 {
        idx += 1;
    }
    if idx == 34 {
        if remaining == 0 {
            out.push(Decomposition { sets: sets.clone(), pair });
        }
        return;
    }
    if remaining == 0 {
        return;
    }

    // Tiles at `idx` must be consumed here, by a triplet and/or runs.
    if hist[idx] >= 3 {
        hist[idx] -= 3;
        sets.push(ClosedSet::Triplet(Tile::from_encoding(idx as u8).unwrap()));
        peel_sets(hist, idx, remaining - 1, pair, sets, out);
        sets.pop();
        hist[idx] += 3;
    }
    if idx < 27 && idx % 9 <= 6 && hist[idx + 1] > 0 && hist[idx + 2] > 0 {
        hist[idx] -= 1;
        hist[idx + 1] -= 1;
        hist[idx + 2] -= 1;
        sets.push(ClosedSet::Run(Tile::from_encoding(idx as u8).unwrap()));
        peel_sets(hist, idx, remaining - 1, pair, sets, out);
        sets.pop();
        hist[idx] += 1;
        hist[idx + 1] += 1;
        hist[idx + 2] += 1;
    }
}

/// Seven distinct pairs, or nothing.
pub fn seven_pairs(counts: &TileSet34) -> Option<Vec<Tile>> {
    let mut pairs = vec![];
    for k in 0..34u8 {
        match counts.0[k as usize] {
            0 => {}
            2 => pairs.push(Tile::from_encoding(k).unwrap()),
            _ => return None,
        }
    }
    (pairs.len() == 7).then_some(pairs)
}

/// All thirteen orphan kinds present, one of them doubled.
pub fn thirteen_orphans(counts: &TileSet34) -> bool {
    let mut kinds = 0;
    let mut pair = 0;
    for k in 0..34u8 {
        let tile = Tile::from_encoding(k).unwrap();
        let n = counts.0[k as usize];
        if n == 0 {
            continue;
        }
        if !tile.is_terminal() || n > 2 {
            return false;
        }
        kinds += 1;
        if n == 2 {
            pair += 1;
        }
    }
    kinds == 13 && pair == 1
}

/// Every way the winning kind completes this decomposition, with the wait
/// shape it implies.
pub fn win_placements(
    decomp: &Decomposition,
    win: Tile,
    _is_tsumo: bool,
) -> Vec<(Placement, WaitKind)> {
    let mut out = vec![];
    for (i, set) in decomp.sets.iter().enumerate() {
        match *set {
            ClosedSet::Triplet(t) if t == win => {
                out.push((Placement::Set(i), WaitKind::Shanpon));
            }
            ClosedSet::Run(low) => {
                let l = low.normal_encoding();
                let w = win.normal_encoding();
                if w < l || w > l + 2 || win.suit() != low.suit() {
                    continue;
                }
                let wait = if w == l + 1 {
                    WaitKind::Kanchan
                } else if (l % 9 == 0 && w == l + 2) || (l % 9 == 6 && w == l) {
                    // 12_+3 or _89+7
                    WaitKind::Penchan
                } else {
                    WaitKind::Ryanmen
                };
                out.push((Placement::Set(i), wait));
            }
            _ => {}
        }
    }
    if decomp.pair == win {
        out.push((Placement::Pair, WaitKind::Tanki));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tile_ids_from_str;
    use assert2::check;

    fn counts(s: &str) -> TileSet34 {
        TileSet34::from_iter(tile_ids_from_str(s).unwrap())
    }

    #[test]
    fn ryanpeikou_shape_decomposes_both_ways() {
        // 223344m 667788p + 99s: runs-only and... actually only runs work,
        // but two distinct orderings collapse to one decomposition.
        let d = decompose(&counts("2m2m3m3m4m4m6p6p7p7p8p8p9s9s"), 4);
        check!(d.len() == 1);
        check!(d[0].pair.as_str() == "9s");
    }

    #[test]
    fn triplet_run_ambiguity_is_enumerated() {
        // 111222333m 99s + 456p: triplets or three identical runs
        let d = decompose(&counts("1m1m1m2m2m2m3m3m3m4p5p6p9s9s"), 4);
        check!(d.len() >= 2);
    }

    #[test]
    fn melded_hand_needs_fewer_sets() {
        let d = decompose(&counts("4p5p6p9s9s"), 1);
        check!(d.len() == 1);
        check!(d[0].sets == vec![ClosedSet::Run("4p".parse().unwrap())]);
    }

    #[test]
    fn incomplete_hand_has_no_decomposition() {
        check!(decompose(&counts("1m2m4m5m7p8p3s4s6s7s9s ew ew sw"), 4).is_empty());
    }

    #[test]
    fn wait_kinds() {
        let d = decompose(&counts("1m2m3m5p5p7s8s9s ww ww ww gd gd gd"), 4);
        check!(!d.is_empty());
        let win: Tile = "3m".parse().unwrap();
        let placements = win_placements(&d[0], win, false);
        // 3m completes 12_ as a penchan
        check!(placements
            .iter()
            .any(|(_, w)| *w == WaitKind::Penchan));
    }
}
