//! Shanten calculation by exhaustive set/pair decomposition.
//!
//! Shanten is the minimum number of tile swaps to reach a complete hand:
//! -1 = complete, 0 = tenpai. The standard form needs `4 − melds` sets plus
//! a pair from the closed part; seven pairs and thirteen orphans only apply
//! to hands without calls. The search enumerates every decomposition of the
//! 34-kind histogram into sets, then partial sets, and scores each leaf with
//! the classic formula `8 − 2·sets − partials − pair`.

use crate::common::{Tile, TileSet34};

/// Shanten of a closed part (1/4/7/10/13 tiles, or one more during a turn)
/// with `melds` calls already made.
pub fn shanten(counts: &TileSet34, melds: u8) -> i8 {
    let mut hist = counts.0;
    let mut best = standard_shanten(&mut hist, melds);
    if melds == 0 {
        best = best.min(seven_pairs_shanten(&hist));
        best = best.min(orphans_shanten(&hist));
    }
    best
}

/// A 14-tile hand (closed part plus the incoming tile) is complete iff its
/// shanten is −1.
pub fn is_complete(counts: &TileSet34, melds: u8) -> bool {
    shanten(counts, melds) == -1
}

/// Shanten plus the kinds whose addition strictly lowers it.
pub fn shanten_and_ukeire(counts: &TileSet34, melds: u8) -> (i8, Vec<Tile>) {
    let base = shanten(counts, melds);
    let mut ukeire = vec![];
    for k in 0..34u8 {
        let tile = Tile::from_encoding(k).unwrap();
        if counts.0[k as usize] >= 4 {
            continue;
        }
        let mut with = *counts;
        with.0[k as usize] += 1;
        if shanten(&with, melds) < base {
            ukeire.push(tile);
        }
    }
    (base, ukeire)
}

fn standard_shanten(hist: &mut [u8; 34], melds: u8) -> i8 {
    let mut best = 8;
    extract_sets(hist, 0, melds, &mut best);
    best
}

/// Phase 1: peel off complete sets in every possible way.
fn extract_sets(hist: &mut [u8; 34], mut idx: usize, sets: u8, best: &mut i8) {
    while idx < 34 && hist[idx] == 0 {
        idx += 1;
    }
    if idx == 34 || sets >= 4 {
        extract_partials(hist, 0, sets, 0, false, best);
        return;
    }

    if hist[idx] >= 3 {
        hist[idx] -= 3;
        extract_sets(hist, idx, sets + 1, best);
        hist[idx] += 3;
    }
    if idx < 27 && idx % 9 <= 6 && hist[idx + 1] > 0 && hist[idx + 2] > 0 {
        hist[idx] -= 1;
        hist[idx + 1] -= 1;
        hist[idx + 2] -= 1;
        extract_sets(hist, idx, sets + 1, best);
        hist[idx] += 1;
        hist[idx + 1] += 1;
        hist[idx + 2] += 1;
    }
    extract_sets(hist, idx + 1, sets, best);
}

/// Phase 2: peel off partial sets (pairs, adjacent and gapped protoruns),
/// capped at the number of sets still missing; a pair may instead claim the
/// pair slot.
fn extract_partials(
    hist: &mut [u8; 34],
    mut idx: usize,
    sets: u8,
    partials: u8,
    has_pair: bool,
    best: &mut i8,
) {
    let cap = 4u8.saturating_sub(sets);
    while idx < 34 && hist[idx] == 0 {
        idx += 1;
    }
    if idx == 34 {
        let score = 8 - 2 * sets as i8 - partials as i8 - has_pair as i8;
        *best = (*best).min(score);
        return;
    }

    if hist[idx] >= 2 {
        hist[idx] -= 2;
        if !has_pair {
            extract_partials(hist, idx, sets, partials, true, best);
        }
        if partials < cap {
            extract_partials(hist, idx, sets, partials + 1, has_pair, best);
        }
        hist[idx] += 2;
    }
    if partials < cap && idx < 27 {
        if idx % 9 <= 7 && hist[idx + 1] > 0 {
            hist[idx] -= 1;
            hist[idx + 1] -= 1;
            extract_partials(hist, idx, sets, partials + 1, has_pair, best);
            hist[idx] += 1;
            hist[idx + 1] += 1;
        }
        if idx % 9 <= 6 && hist[idx + 2] > 0 {
            hist[idx] -= 1;
            hist[idx + 2] -= 1;
            extract_partials(hist, idx, sets, partials + 1, has_pair, best);
            hist[idx] += 1;
            hist[idx + 2] += 1;
        }
    }
    extract_partials(hist, idx + 1, sets, partials, has_pair, best);
}

fn seven_pairs_shanten(hist: &[u8; 34]) -> i8 {
    let mut pairs = 0i8;
    let mut kinds = 0i8;
    for &n in hist {
        if n >= 1 {
            kinds += 1;
        }
        if n >= 2 {
            pairs += 1;
        }
    }
    6 - pairs + (7 - kinds).max(0)
}

fn orphans_shanten(hist: &[u8; 34]) -> i8 {
    let mut kinds = 0i8;
    let mut has_pair = false;
    for k in 0..34u8 {
        let tile = Tile::from_encoding(k).unwrap();
        if !tile.is_terminal() {
            continue;
        }
        let n = hist[k as usize];
        if n >= 1 {
            kinds += 1;
        }
        if n >= 2 {
            has_pair = true;
        }
    }
    13 - kinds - has_pair as i8
}
