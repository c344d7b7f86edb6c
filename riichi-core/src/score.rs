//! The hand evaluator: from a complete hand, melds, dora indicators and a
//! win context to `(han, fu, yaku list, cost breakdown)` — or an error kind.
//!
//! The round engine consumes this as a black box: it probes with
//! [`evaluate`] to decide whether tsumo/ron queries may be issued, and calls
//! it again with the final context (ura dora revealed) to build the win
//! record.

mod decompose;
mod fu;
mod yaku;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::*;

pub use self::decompose::{thirteen_orphans, ClosedSet, Decomposition};
pub use self::fu::WaitKind;
pub use self::yaku::{Groups, Yaku};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum ScoreError {
    /// The tiles do not form a complete hand.
    #[error("hand is not in a winning shape")]
    NotWinning,

    /// The tile multiset itself is impossible (wrong total, five of a kind).
    #[error("hand composition is not valid")]
    NotCorrect,

    /// Complete shape, but nothing but dora to its name.
    #[error("winning hand has no yaku")]
    NoYaku,
}

/// Everything about the table needed to value a hand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WinContext {
    pub round_wind: Wind,
    pub seat_wind: Wind,
    pub is_tsumo: bool,
    pub is_riichi: bool,
    pub is_double_riichi: bool,
    pub is_ippatsu: bool,
    pub is_dealer: bool,
    pub is_rinshan: bool,
    pub is_haitei: bool,
    pub is_houtei: bool,
    pub is_chankan: bool,
    pub is_tenhou: bool,
    pub is_chiihou: bool,
    pub aka_dora: bool,
    pub open_tanyao: bool,
    pub honba: u8,
    pub kyoutaku: u8,
}

/// Score bracket of a winning hand.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
#[derive(Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreLevel {
    #[default]
    Normal,
    Mangan,
    Haneman,
    Baiman,
    Sanbaiman,
    Yakuman,
    DoubleYakuman,
}

/// Payment breakdown of a win.
///
/// - Ron: the discarder owes `main + main_bonus`.
/// - Tsumo: the dealer owes `main + main_bonus`, every other seat
///   `additional + additional_bonus` (for a dealer win, `main == additional`).
/// - `total` is what the winner collects, riichi sticks included.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub main: GamePoints,
    pub main_bonus: GamePoints,
    pub additional: GamePoints,
    pub additional_bonus: GamePoints,
    pub total: GamePoints,
    pub level: ScoreLevel,
}

/// A priced winning hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinScore {
    pub han: u8,
    pub fu: u8,
    /// `(yaku, han)` pairs, dora entries appended last.
    pub yaku: Vec<(Yaku, u8)>,
    pub cost: Cost,
    pub is_open: bool,
}

/// Value a complete hand.
///
/// `closed` is the concealed part *including* the winning tile (the engine
/// appends the ron tile before calling); meld tiles live in `melds` only.
pub fn evaluate(
    closed: &[TileId],
    melds: &[Meld],
    win_tile: TileId,
    dora_indicators: &[TileId],
    ura_indicators: &[TileId],
    ctx: &WinContext,
) -> Result<WinScore, ScoreError> {
    let is_open = melds.iter().any(Meld::opens_hand);
    let closed34 = TileSet34::from_iter(closed.iter().copied());

    check_composition(&closed34, closed, melds)?;

    let candidates = enumerate_candidates(&closed34, melds, win_tile, ctx, is_open);
    if candidates.is_empty() {
        return Err(ScoreError::NotWinning);
    }

    // Highest-value interpretation wins: yakuman count, then han, then fu.
    let best = candidates
        .into_iter()
        .max_by_key(|c| (c.yakuman, c.han, c.fu))
        .unwrap();
    if best.yaku.is_empty() {
        return Err(ScoreError::NoYaku);
    }

    let mut yaku = best.yaku;
    let mut han = best.han;
    if best.yakuman == 0 {
        // Dora never stands on its own but does feed the han total.
        let all_tiles: Vec<TileId> = closed
            .iter()
            .copied()
            .chain(melds.iter().flat_map(|m| m.tiles.iter().copied()))
            .collect();
        for (kind, count) in dora_hits(&all_tiles, dora_indicators, ura_indicators, ctx) {
            yaku.push((kind, count));
            han += count;
        }
    }

    let basic = basic_points(best.yakuman, han, best.fu);
    let cost = cost_of(basic, level_of(best.yakuman, han, best.fu), ctx);

    Ok(WinScore { han, fu: best.fu, yaku, cost, is_open })
}

/// Mangan cost used by nagashi-mangan settlement (no honba, no sticks).
pub fn mangan_cost(is_dealer: bool) -> Cost {
    let ctx = WinContext { is_dealer, is_tsumo: true, ..WinContext::default() };
    cost_of(2000, ScoreLevel::Mangan, &ctx)
}

struct Candidate {
    yakuman: u8,
    han: u8,
    fu: u8,
    yaku: Vec<(Yaku, u8)>,
}

fn check_composition(
    closed34: &TileSet34,
    closed: &[TileId],
    melds: &[Meld],
) -> Result<(), ScoreError> {
    if melds.len() > 4 || closed.len() != 14 - 3 * melds.len() {
        return Err(ScoreError::NotCorrect);
    }
    let mut all = *closed34;
    for meld in melds {
        for id in &meld.tiles {
            all[id.normal_kind()] += 1;
        }
    }
    if all.0.iter().any(|&n| n > 4) {
        return Err(ScoreError::NotCorrect);
    }
    Ok(())
}

fn enumerate_candidates(
    closed34: &TileSet34,
    melds: &[Meld],
    win_tile: TileId,
    ctx: &WinContext,
    is_open: bool,
) -> Vec<Candidate> {
    let win_kind = win_tile.normal_kind();
    let mut out = vec![];

    for decomp in decompose::decompose(closed34, 4 - melds.len() as u8) {
        for (placement, wait) in decompose::win_placements(&decomp, win_kind, ctx.is_tsumo) {
            let groups = Groups::build(&decomp, melds, placement, ctx.is_tsumo);
            let detected = yaku::detect_standard(&groups, decomp.pair, wait, ctx, is_open);
            let fu = fu::standard_fu(&groups, decomp.pair, wait, ctx, is_open, detected.pinfu);
            out.push(Candidate {
                yakuman: detected.yakuman,
                han: detected.han,
                fu,
                yaku: detected.yaku,
            });
        }
    }

    if melds.is_empty() {
        if let Some(pairs) = decompose::seven_pairs(closed34) {
            let detected = yaku::detect_seven_pairs(&pairs, ctx);
            out.push(Candidate {
                yakuman: detected.yakuman,
                han: detected.han,
                fu: 25,
                yaku: detected.yaku,
            });
        }
        if decompose::thirteen_orphans(closed34) {
            let detected = yaku::detect_orphans(ctx);
            out.push(Candidate {
                yakuman: detected.yakuman,
                han: detected.han,
                fu: 0,
                yaku: detected.yaku,
            });
        }
    }
    out
}

fn dora_hits(
    all_tiles: &[TileId],
    dora_indicators: &[TileId],
    ura_indicators: &[TileId],
    ctx: &WinContext,
) -> Vec<(Yaku, u8)> {
    let count_for = |indicators: &[TileId]| -> u8 {
        indicators
            .iter()
            .map(|ind| {
                let dora = ind.kind().indicated_dora();
                all_tiles.iter().filter(|t| t.normal_kind() == dora).count() as u8
            })
            .sum()
    };

    let mut hits = vec![];
    let dora = count_for(dora_indicators);
    if dora > 0 {
        hits.push((Yaku::Dora, dora));
    }
    if ctx.aka_dora {
        let aka = all_tiles.iter().filter(|t| t.is_red()).count() as u8;
        if aka > 0 {
            hits.push((Yaku::AkaDora, aka));
        }
    }
    if ctx.is_riichi {
        let ura = count_for(ura_indicators);
        if ura > 0 {
            hits.push((Yaku::UraDora, ura));
        }
    }
    hits
}

fn level_of(yakuman: u8, han: u8, fu: u8) -> ScoreLevel {
    if yakuman >= 2 {
        ScoreLevel::DoubleYakuman
    } else if yakuman == 1 || han >= 13 {
        ScoreLevel::Yakuman
    } else if han >= 11 {
        ScoreLevel::Sanbaiman
    } else if han >= 8 {
        ScoreLevel::Baiman
    } else if han >= 6 {
        ScoreLevel::Haneman
    } else if han >= 5 || (han == 4 && fu >= 40) || (han == 3 && fu >= 70) {
        ScoreLevel::Mangan
    } else {
        ScoreLevel::Normal
    }
}

fn basic_points(yakuman: u8, han: u8, fu: u8) -> GamePoints {
    match level_of(yakuman, han, fu) {
        ScoreLevel::Normal => (fu as GamePoints) << (2 + han),
        ScoreLevel::Mangan => 2000,
        ScoreLevel::Haneman => 3000,
        ScoreLevel::Baiman => 4000,
        ScoreLevel::Sanbaiman => 6000,
        ScoreLevel::Yakuman => 8000 * (yakuman.max(1) as GamePoints),
        ScoreLevel::DoubleYakuman => 8000 * (yakuman as GamePoints),
    }
}

fn round_up_100(points: GamePoints) -> GamePoints {
    (points + 99) / 100 * 100
}

fn cost_of(basic: GamePoints, level: ScoreLevel, ctx: &WinContext) -> Cost {
    let honba = ctx.honba as GamePoints;
    let sticks = ctx.kyoutaku as GamePoints * 1000;
    let (main, main_bonus, additional, additional_bonus, total);
    if ctx.is_tsumo {
        main_bonus = 100 * honba;
        additional_bonus = 100 * honba;
        if ctx.is_dealer {
            main = round_up_100(2 * basic);
            additional = main;
            total = 3 * (additional + additional_bonus) + sticks;
        } else {
            main = round_up_100(2 * basic);
            additional = round_up_100(basic);
            total = main + main_bonus + 2 * (additional + additional_bonus) + sticks;
        }
    } else {
        main = round_up_100(basic * if ctx.is_dealer { 6 } else { 4 });
        main_bonus = 300 * honba;
        additional = 0;
        additional_bonus = 0;
        total = main + main_bonus + sticks;
    }
    Cost { main, main_bonus, additional, additional_bonus, total, level }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tile_ids_from_str;
    use assert2::check;

    fn ids(s: &str) -> Vec<TileId> { tile_ids_from_str(s).unwrap() }

    fn plain_ids(s: &str) -> Vec<TileId> {
        // avoid handing out red copies in tests that don't want aka dora
        tile_ids_from_str(s)
            .unwrap()
            .into_iter()
            .map(|id| if id.is_red() { TileId::from_kind_copy(id.normal_kind(), 1) } else { id })
            .collect()
    }

    fn ctx() -> WinContext {
        WinContext { open_tanyao: true, aka_dora: true, ..WinContext::default() }
    }

    #[test]
    fn closed_tsumo_scores_menzen_tsumo() {
        let closed = ids("2m3m4m6m7m8m2p3p4p6p7p8p ww ww");
        let win = *closed.last().unwrap();
        let score = evaluate(
            &closed, &[], win, &[], &[],
            &WinContext { is_tsumo: true, ..ctx() },
        )
        .unwrap();
        check!(score.yaku.iter().any(|(y, _)| *y == Yaku::MenzenTsumo));
        check!(score.han >= 1);
        check!(!score.is_open);
    }

    #[test]
    fn no_yaku_ron_is_rejected() {
        // open hand, nothing but shapes: chi 123m called, rest plain
        let melds = vec![Meld::chi(ids("1m2m3m"), S3, ids("1m")[0])];
        let closed = plain_ids("4m5m6m2p3p4p7s8s ww ww");
        let mut closed = closed;
        closed.push(TileId::from_kind_copy("9s".parse().unwrap(), 0));
        let win = *closed.last().unwrap();
        let err = evaluate(&closed, &melds, win, &[], &[], &ctx()).unwrap_err();
        check!(err == ScoreError::NoYaku);
    }

    #[test]
    fn not_winning_shape() {
        let closed = plain_ids("1m2m3m5m6m7m9m9p2s5s8s ew gd rd");
        let win = *closed.last().unwrap();
        let err = evaluate(&closed, &[], win, &[], &[], &ctx()).unwrap_err();
        check!(err == ScoreError::NotWinning);
    }

    #[test]
    fn wrong_tile_count_is_not_correct() {
        let closed = plain_ids("1m2m3m4p5p6p ww ww");
        let err = evaluate(&closed, &[], closed[0], &[], &[], &ctx()).unwrap_err();
        check!(err == ScoreError::NotCorrect);
    }

    #[test]
    fn dora_feeds_han_but_not_yaku() {
        // tanyao hand with two dora
        let closed = plain_ids("2m3m4m5m6m7m3p4p5p6p6p7s7s7s");
        let win = *closed.last().unwrap();
        let indicator = TileId::from_kind_copy("5p".parse().unwrap(), 1);
        let score = evaluate(
            &closed, &[], win, &[indicator], &[],
            &WinContext { is_tsumo: true, ..ctx() },
        )
        .unwrap();
        check!(score.yaku.iter().any(|(y, n)| *y == Yaku::Dora && *n == 2));
        // menzen tsumo + tanyao + 2 dora
        check!(score.han == 4);
    }

    #[test]
    fn ura_dora_needs_riichi() {
        let closed = plain_ids("2m3m4m6m7m8m2p3p4p6p7p8p3s3s");
        let win = *closed.last().unwrap();
        let ura = TileId::from_kind_copy("2s".parse().unwrap(), 0);
        let without = evaluate(
            &closed, &[], win, &[], &[ura],
            &WinContext { is_tsumo: true, ..ctx() },
        )
        .unwrap();
        check!(!without.yaku.iter().any(|(y, _)| *y == Yaku::UraDora));
        let with = evaluate(
            &closed, &[], win, &[], &[ura],
            &WinContext { is_tsumo: true, is_riichi: true, ..ctx() },
        )
        .unwrap();
        check!(with.yaku.iter().any(|(y, n)| *y == Yaku::UraDora && *n == 2));
    }

    #[test]
    fn dealer_ron_cost() {
        let cost = cost_of(240, ScoreLevel::Normal,
                           &WinContext { is_dealer: true, honba: 1, kyoutaku: 1, ..ctx() });
        check!(cost.main == 1500);
        check!(cost.main_bonus == 300);
        check!(cost.total == 1500 + 300 + 1000);
    }

    #[test]
    fn non_dealer_tsumo_cost() {
        let cost = cost_of(240, ScoreLevel::Normal,
                           &WinContext { is_tsumo: true, ..ctx() });
        check!(cost.main == 500);
        check!(cost.additional == 300);
        check!(cost.total == 1100);
    }

    #[test]
    fn mangan_brackets() {
        check!(level_of(0, 5, 30) == ScoreLevel::Mangan);
        check!(level_of(0, 4, 40) == ScoreLevel::Mangan);
        check!(level_of(0, 6, 30) == ScoreLevel::Haneman);
        check!(level_of(0, 13, 30) == ScoreLevel::Yakuman);
        check!(level_of(1, 0, 0) == ScoreLevel::Yakuman);
        check!(basic_points(0, 8, 30) == 4000);
        check!(basic_points(2, 26, 0) == 16000);
    }

    #[test]
    fn seven_pairs_scores_25_fu() {
        let closed = plain_ids("1m1m3m3m7p7p9p9p2s2s4s4s ew ew");
        let win = *closed.last().unwrap();
        let score = evaluate(
            &closed, &[], win, &[], &[],
            &WinContext { is_tsumo: true, ..ctx() },
        )
        .unwrap();
        check!(score.fu == 25);
        check!(score.yaku.iter().any(|(y, _)| *y == Yaku::Chiitoitsu));
    }

    #[test]
    fn kokushi_is_yakuman() {
        let closed = plain_ids("1m9m1p9p1s9s ew sw ww nw wd gd rd rd");
        let win = *closed.last().unwrap();
        let score = evaluate(&closed, &[], win, &[], &[], &ctx()).unwrap();
        check!(score.cost.level == ScoreLevel::Yakuman);
        check!(score.yaku.iter().any(|(y, _)| *y == Yaku::KokushiMusou));
    }
}
