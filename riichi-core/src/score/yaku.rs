//! Yaku detection over a decomposed hand.

use serde::{Deserialize, Serialize};

use crate::common::{Meld, MeldKind, Tile, TileSet34};

use super::decompose::{ClosedSet, Decomposition, Placement};
use super::fu::WaitKind;
use super::WinContext;

/// Every yaku this engine can award. Dora entries ride along in the same
/// list on win records but never satisfy the yaku requirement.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, strum::Display, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Yaku {
    #[strum(serialize = "Menzen Tsumo")]
    MenzenTsumo,
    Riichi,
    #[strum(serialize = "Double Riichi")]
    DoubleRiichi,
    Ippatsu,
    Pinfu,
    Tanyao,
    Iipeikou,
    #[strum(serialize = "Seat Wind")]
    SeatWind,
    #[strum(serialize = "Round Wind")]
    RoundWind,
    Haku,
    Hatsu,
    Chun,
    Chankan,
    #[strum(serialize = "Rinshan Kaihou")]
    RinshanKaihou,
    #[strum(serialize = "Haitei Raoyue")]
    HaiteiRaoyue,
    #[strum(serialize = "Houtei Raoyui")]
    HouteiRaoyui,
    #[strum(serialize = "Sanshoku Doujun")]
    SanshokuDoujun,
    #[strum(serialize = "Sanshoku Doukou")]
    SanshokuDoukou,
    Ittsuu,
    Chanta,
    Junchan,
    Chiitoitsu,
    Toitoi,
    Sanankou,
    Sankantsu,
    Shousangen,
    Honroutou,
    Honitsu,
    Chinitsu,
    Ryanpeikou,
    // yakuman
    Tenhou,
    Chiihou,
    Daisangen,
    Suuankou,
    Tsuuiisou,
    Ryuuiisou,
    Chinroutou,
    #[strum(serialize = "Chuuren Poutou")]
    ChuurenPoutou,
    Suukantsu,
    Shousuushii,
    Daisuushii,
    #[strum(serialize = "Kokushi Musou")]
    KokushiMusou,
    // dora pseudo-yaku
    Dora,
    #[strum(serialize = "Aka Dora")]
    AkaDora,
    #[strum(serialize = "Ura Dora")]
    UraDora,
}

impl Yaku {
    /// Han value, `None` when the yaku does not apply to an open hand.
    pub fn han(self, is_open: bool) -> Option<u8> {
        use Yaku::*;
        let closed_only = |v: u8| if is_open { None } else { Some(v) };
        let reduced = |v: u8| Some(if is_open { v - 1 } else { v });
        match self {
            MenzenTsumo | Riichi | Ippatsu | Pinfu | Iipeikou => closed_only(1),
            DoubleRiichi => closed_only(2),
            Ryanpeikou => closed_only(3),
            Tanyao | SeatWind | RoundWind | Haku | Hatsu | Chun
            | Chankan | RinshanKaihou | HaiteiRaoyue | HouteiRaoyui => Some(1),
            Chiitoitsu | Toitoi | Sanankou | Sankantsu | Shousangen
            | Honroutou | SanshokuDoukou => Some(2),
            SanshokuDoujun | Ittsuu | Chanta => reduced(2),
            Junchan | Honitsu => reduced(3),
            Chinitsu => reduced(6),
            Tenhou | Chiihou | Daisangen | Suuankou | Tsuuiisou | Ryuuiisou
            | Chinroutou | ChuurenPoutou | Suukantsu | Shousuushii
            | Daisuushii | KokushiMusou => Some(13),
            Dora | AkaDora | UraDora => None,
        }
    }

    pub fn is_yakuman(self) -> bool {
        self.han(false) == Some(13)
    }
}

/// Unified view of the four tile groups of a standard hand, closed sets and
/// melds alike.
#[derive(Clone, Debug)]
pub struct Groups {
    pub list: Vec<Group>,
    pub has_melds: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Group {
    pub is_run: bool,
    /// The triplet kind, or the lowest kind of a run.
    pub low: Tile,
    /// Part of an open meld.
    pub open: bool,
    /// Counts as a concealed triplet (sanankou/suuankou, closed-triplet fu).
    pub concealed: bool,
    pub is_kan: bool,
}

impl Groups {
    pub fn build(
        decomp: &Decomposition,
        melds: &[Meld],
        placement: Placement,
        is_tsumo: bool,
    ) -> Self {
        let mut list = vec![];
        for (i, set) in decomp.sets.iter().enumerate() {
            let group = match *set {
                ClosedSet::Run(low) => Group {
                    is_run: true, low, open: false, concealed: false, is_kan: false,
                },
                ClosedSet::Triplet(t) => Group {
                    is_run: false,
                    low: t,
                    open: false,
                    // a triplet completed by ron is not concealed
                    concealed: is_tsumo || placement != Placement::Set(i),
                    is_kan: false,
                },
            };
            list.push(group);
        }
        for meld in melds {
            let closed = meld.kind == MeldKind::ClosedKan;
            list.push(Group {
                is_run: meld.kind == MeldKind::Chi,
                low: meld.base_kind(),
                open: !closed,
                concealed: closed,
                is_kan: meld.is_kan(),
            });
        }
        Groups { list, has_melds: !melds.is_empty() }
    }

    /// 34-histogram of all group tiles plus the pair.
    fn counts(&self, pair: Tile) -> TileSet34 {
        let mut counts = TileSet34::default();
        counts[pair] += 2;
        for g in &self.list {
            if g.is_run {
                let e = g.low.normal_encoding();
                for d in 0..3 {
                    counts.0[(e + d) as usize] += 1;
                }
            } else {
                counts[g.low] += if g.is_kan { 4 } else { 3 };
            }
        }
        counts
    }

    fn runs(&self) -> impl Iterator<Item = Tile> + '_ {
        self.list.iter().filter(|g| g.is_run).map(|g| g.low)
    }

    fn triplets(&self) -> impl Iterator<Item = Tile> + '_ {
        self.list.iter().filter(|g| !g.is_run).map(|g| g.low)
    }
}

pub struct Detected {
    pub yakuman: u8,
    pub han: u8,
    pub yaku: Vec<(Yaku, u8)>,
    pub pinfu: bool,
}

/// Push every applicable context-only yaku (they apply to all hand shapes).
fn situational(ctx: &WinContext, is_open: bool, out: &mut Vec<Yaku>) {
    if ctx.is_tenhou {
        out.push(Yaku::Tenhou);
    }
    if ctx.is_chiihou {
        out.push(Yaku::Chiihou);
    }
    if ctx.is_tsumo && !is_open {
        out.push(Yaku::MenzenTsumo);
    }
    if ctx.is_riichi {
        out.push(if ctx.is_double_riichi { Yaku::DoubleRiichi } else { Yaku::Riichi });
        if ctx.is_ippatsu {
            out.push(Yaku::Ippatsu);
        }
    }
    if ctx.is_rinshan && ctx.is_tsumo {
        out.push(Yaku::RinshanKaihou);
    }
    if ctx.is_chankan && !ctx.is_tsumo {
        out.push(Yaku::Chankan);
    }
    if ctx.is_haitei && ctx.is_tsumo && !ctx.is_rinshan {
        out.push(Yaku::HaiteiRaoyue);
    }
    if ctx.is_houtei && !ctx.is_tsumo {
        out.push(Yaku::HouteiRaoyui);
    }
}

/// Fold a raw yaku list into the `(yaku, han)` result, keeping only yakuman
/// when any is present.
fn finish(mut found: Vec<Yaku>, is_open: bool, pinfu: bool) -> Detected {
    let yakuman = found.iter().filter(|y| y.is_yakuman()).count() as u8;
    if yakuman > 0 {
        found.retain(|y| y.is_yakuman());
    }
    let mut yaku = vec![];
    let mut han = 0u8;
    for y in found {
        if let Some(v) = y.han(is_open) {
            yaku.push((y, v));
            han += v;
        }
    }
    Detected { yakuman, han, yaku, pinfu }
}

pub fn detect_standard(
    groups: &Groups,
    pair: Tile,
    wait: WaitKind,
    ctx: &WinContext,
    is_open: bool,
) -> Detected {
    let mut found = vec![];
    situational(ctx, is_open, &mut found);

    let counts = groups.counts(pair);
    let kinds: Vec<Tile> = (0..34u8)
        .filter(|&k| counts.0[k as usize] > 0)
        .map(|k| Tile::from_encoding(k).unwrap())
        .collect();

    let pair_is_yakuhai = pair.is_dragon()
        || pair == ctx.seat_wind.tile()
        || pair == ctx.round_wind.tile();
    let all_runs = groups.list.iter().all(|g| g.is_run);
    let pinfu =
        !is_open && !groups.has_melds && all_runs && !pair_is_yakuhai && wait == WaitKind::Ryanmen;
    if pinfu {
        found.push(Yaku::Pinfu);
    }

    if (ctx.open_tanyao || !is_open) && kinds.iter().all(|k| !k.is_terminal()) {
        found.push(Yaku::Tanyao);
    }

    if !is_open {
        let mut run_kinds: Vec<Tile> = groups.runs().collect();
        run_kinds.sort();
        let mut identical_pairs = 0;
        let mut i = 0;
        while i < run_kinds.len() {
            let same = run_kinds[i..].iter().take_while(|&&r| r == run_kinds[i]).count();
            identical_pairs += same / 2;
            i += same;
        }
        match identical_pairs {
            1 => found.push(Yaku::Iipeikou),
            2 => found.push(Yaku::Ryanpeikou),
            _ => {}
        }
    }

    for t in groups.triplets() {
        match t.encoding() {
            31 => found.push(Yaku::Haku),
            32 => found.push(Yaku::Hatsu),
            33 => found.push(Yaku::Chun),
            _ => {
                if t.is_wind() {
                    if t == ctx.seat_wind.tile() {
                        found.push(Yaku::SeatWind);
                    }
                    if t == ctx.round_wind.tile() {
                        found.push(Yaku::RoundWind);
                    }
                }
            }
        }
    }

    // three-suit and straight patterns
    let has_run = |suit: u8, num: u8| {
        groups.runs().any(|r| r.suit() == suit && r.num() == num)
    };
    let has_triplet = |suit: u8, num: u8| {
        groups.triplets().any(|t| t.suit() == suit && t.num() == num)
    };
    if (1..=7).any(|n| (0..3).all(|s| has_run(s, n))) {
        found.push(Yaku::SanshokuDoujun);
    }
    if (1..=9).any(|n| (0..3).all(|s| has_triplet(s, n))) {
        found.push(Yaku::SanshokuDoukou);
    }
    if (0..3).any(|s| [1, 4, 7].iter().all(|&n| has_run(s, n))) {
        found.push(Yaku::Ittsuu);
    }

    // terminal-in-every-group family
    let group_has_orphan = |g: &Group| {
        if g.is_run {
            g.low.num() == 1 || g.low.num() == 7
        } else {
            g.low.is_terminal()
        }
    };
    let any_run = groups.list.iter().any(|g| g.is_run);
    if any_run && pair.is_terminal() && groups.list.iter().all(group_has_orphan) {
        let pure = !pair.is_honor() && groups.list.iter().all(|g| !g.low.is_honor());
        found.push(if pure { Yaku::Junchan } else { Yaku::Chanta });
    }

    let all_triplets = groups.list.iter().all(|g| !g.is_run);
    if all_triplets {
        found.push(Yaku::Toitoi);
    }

    let concealed_triplets = groups.list.iter().filter(|g| !g.is_run && g.concealed).count();
    if concealed_triplets == 3 {
        found.push(Yaku::Sanankou);
    }

    let kans = groups.list.iter().filter(|g| g.is_kan).count();
    if kans == 3 {
        found.push(Yaku::Sankantsu);
    }

    let dragon_triplets = groups.triplets().filter(|t| t.is_dragon()).count();
    if dragon_triplets == 2 && pair.is_dragon() {
        found.push(Yaku::Shousangen);
    }

    if all_triplets && kinds.iter().all(|k| k.is_terminal()) {
        found.push(Yaku::Honroutou);
    }

    let suits: Vec<u8> = kinds.iter().map(|k| k.suit()).collect();
    let numeral_suits: Vec<u8> =
        suits.iter().copied().filter(|&s| s < 3).collect();
    let has_honors = suits.iter().any(|&s| s == 3);
    if !numeral_suits.is_empty() && numeral_suits.iter().all(|&s| s == numeral_suits[0]) {
        if has_honors {
            found.push(Yaku::Honitsu);
        } else {
            found.push(Yaku::Chinitsu);
        }
    }

    // yakuman shapes
    if dragon_triplets == 3 {
        found.push(Yaku::Daisangen);
    }
    if concealed_triplets == 4 {
        found.push(Yaku::Suuankou);
    }
    if kinds.iter().all(|k| k.is_honor()) {
        found.push(Yaku::Tsuuiisou);
    }
    if kinds.iter().all(|k| k.is_pure_terminal()) {
        found.push(Yaku::Chinroutou);
    }
    let greens = crate::common::tiles_from_str("2s3s4s6s8s gd").unwrap();
    if kinds.iter().all(|k| greens.contains(k)) {
        found.push(Yaku::Ryuuiisou);
    }
    if kans == 4 {
        found.push(Yaku::Suukantsu);
    }
    let wind_triplets = groups.triplets().filter(|t| t.is_wind()).count();
    if wind_triplets == 4 {
        found.push(Yaku::Daisuushii);
    } else if wind_triplets == 3 && pair.is_wind() {
        found.push(Yaku::Shousuushii);
    }
    if !groups.has_melds && is_chuuren(&counts) {
        found.push(Yaku::ChuurenPoutou);
    }

    finish(found, is_open, pinfu)
}

fn is_chuuren(counts: &TileSet34) -> bool {
    let Some(suit) = (0..3).find(|&s| counts.0[(s * 9) as usize] >= 3) else {
        return false;
    };
    let base = [3u8, 1, 1, 1, 1, 1, 1, 1, 3];
    let mut extras = 0;
    for n in 0..9usize {
        let have = counts.0[suit as usize * 9 + n];
        if have < base[n] {
            return false;
        }
        extras += (have - base[n]) as u32;
    }
    // all 14 tiles in one suit, exactly one extra over the 1112345678999 base
    extras == 1 && counts.total() == 14
}

pub fn detect_seven_pairs(pairs: &[Tile], ctx: &WinContext) -> Detected {
    let mut found = vec![Yaku::Chiitoitsu];
    situational(ctx, false, &mut found);

    if pairs.iter().all(|k| !k.is_terminal()) {
        found.push(Yaku::Tanyao);
    }
    if pairs.iter().all(|k| k.is_honor()) {
        found.push(Yaku::Tsuuiisou);
    } else if pairs.iter().all(|k| k.is_terminal()) {
        found.push(Yaku::Honroutou);
    }
    let numeral_suits: Vec<u8> =
        pairs.iter().map(|k| k.suit()).filter(|&s| s < 3).collect();
    let has_honors = pairs.iter().any(|k| k.is_honor());
    if !numeral_suits.is_empty() && numeral_suits.iter().all(|&s| s == numeral_suits[0]) {
        found.push(if has_honors { Yaku::Honitsu } else { Yaku::Chinitsu });
    }

    finish(found, false, false)
}

pub fn detect_orphans(ctx: &WinContext) -> Detected {
    let mut found = vec![Yaku::KokushiMusou];
    situational(ctx, false, &mut found);
    finish(found, false, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tile_ids_from_str;
    use crate::score::decompose::decompose;
    use assert2::check;

    fn detect(hand: &str, win: &str, ctx: &WinContext) -> Vec<Yaku> {
        let counts = TileSet34::from_iter(tile_ids_from_str(hand).unwrap());
        let decomps = decompose(&counts, 4);
        assert!(!decomps.is_empty(), "hand must be complete");
        let win: Tile = win.parse().unwrap();
        let mut best: Option<Detected> = None;
        for d in &decomps {
            for (p, w) in super::super::decompose::win_placements(d, win, ctx.is_tsumo) {
                let groups = Groups::build(d, &[], p, ctx.is_tsumo);
                let detected = detect_standard(&groups, d.pair, w, ctx, false);
                if best.as_ref().map_or(true, |b| (detected.yakuman, detected.han) > (b.yakuman, b.han)) {
                    best = Some(detected);
                }
            }
        }
        best.unwrap().yaku.into_iter().map(|(y, _)| y).collect()
    }

    fn base_ctx() -> WinContext {
        WinContext { open_tanyao: true, ..WinContext::default() }
    }

    #[test]
    fn pinfu_needs_ryanmen_and_clean_pair() {
        let ctx = base_ctx();
        let yaku = detect("2m3m4m5m6m7m3p4p5p6s7s8s9p9p", "5m", &ctx);
        check!(yaku.contains(&Yaku::Pinfu));
        // same hand won on the pair is tanki, no pinfu
        let yaku = detect("2m3m4m5m6m7m3p4p5p6s7s8s9p9p", "9p", &ctx);
        check!(!yaku.contains(&Yaku::Pinfu));
    }

    #[test]
    fn yakuhai_double_wind_counts_twice() {
        let ctx = WinContext { round_wind: crate::common::Wind::East,
                               seat_wind: crate::common::Wind::East,
                               ..base_ctx() };
        let yaku = detect("ew ew ew 2m3m4m5p6p7p2s3s4s9s9s", "4s", &ctx);
        check!(yaku.contains(&Yaku::SeatWind));
        check!(yaku.contains(&Yaku::RoundWind));
    }

    #[test]
    fn sanshoku_and_ittsuu() {
        let ctx = base_ctx();
        let yaku = detect("2m3m4m2p3p4p2s3s4s6s7s8s ew ew", "4s", &ctx);
        check!(yaku.contains(&Yaku::SanshokuDoujun));
        let yaku = detect("1p2p3p4p5p6p7p8p9p2s3s4s ww ww", "4s", &ctx);
        check!(yaku.contains(&Yaku::Ittsuu));
    }

    #[test]
    fn chanta_vs_junchan() {
        let ctx = base_ctx();
        let yaku = detect("1m2m3m7p8p9p9s9s9s1s2s3s ew ew", "3s", &ctx);
        check!(yaku.contains(&Yaku::Chanta));
        check!(!yaku.contains(&Yaku::Junchan));
        let yaku = detect("1m2m3m7p8p9p9s9s9s1s2s3s1p1p", "3s", &ctx);
        check!(yaku.contains(&Yaku::Junchan));
        check!(!yaku.contains(&Yaku::Chanta));
    }

    #[test]
    fn suuankou_on_tsumo() {
        let ctx = WinContext { is_tsumo: true, ..base_ctx() };
        let yaku = detect("2m2m2m5m5m5m8p8p8p3s3s3s ww ww", "ww", &ctx);
        check!(yaku == vec![Yaku::Suuankou]);
        // same hand by ron on a triplet drops to sanankou + toitoi
        let ctx = base_ctx();
        let yaku = detect("2m2m2m5m5m5m8p8p8p3s3s3s ww ww", "3s", &ctx);
        check!(yaku.contains(&Yaku::Sanankou));
        check!(yaku.contains(&Yaku::Toitoi));
        check!(!yaku.contains(&Yaku::Suuankou));
    }

    #[test]
    fn ryanpeikou_beats_iipeikou() {
        let ctx = base_ctx();
        let yaku = detect("2m2m3m3m4m4m6p6p7p7p8p8p9s9s", "9s", &ctx);
        check!(yaku.contains(&Yaku::Ryanpeikou));
        check!(!yaku.contains(&Yaku::Iipeikou));
    }

    #[test]
    fn flushes() {
        let ctx = base_ctx();
        let yaku = detect("1s2s3s4s5s6s7s8s9s1s1s ew ew ew", "9s", &ctx);
        check!(yaku.contains(&Yaku::Honitsu));
        let yaku = detect("1s1s1s2s3s4s5s6s7s7s8s9s9s9s", "9s", &ctx);
        check!(yaku.contains(&Yaku::Chinitsu));
    }

    #[test]
    fn chuuren_shape() {
        let ctx = base_ctx();
        let yaku = detect("1s1s1s2s3s4s5s5s6s7s8s9s9s9s", "5s", &ctx);
        check!(yaku == vec![Yaku::ChuurenPoutou]);
    }

    #[test]
    fn daisangen() {
        let ctx = base_ctx();
        let yaku = detect("wd wd wd gd gd gd rd rd rd 2m3m4m5p5p", "4m", &ctx);
        check!(yaku == vec![Yaku::Daisangen]);
    }
}
