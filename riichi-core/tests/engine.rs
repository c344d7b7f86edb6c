//! End-to-end round scenarios driven through the public API, with preset
//! hands and a preset draw queue so every wall pull is scripted.

use pretty_assertions::assert_eq;

use riichi_core::prelude::*;

/// Start an unshuffled game with four fully preset hands and a scripted
/// draw queue (dora indicator first, then every turn/indicator draw).
fn game(hands: [&str; 4], preset: &str) -> Game {
    let mut g = Game::with_seed(Ruleset::default(), 0x5EED);
    g.set_tile_preset(preset).unwrap();
    g.start_game(
        hands
            .iter()
            .enumerate()
            .map(|(i, h)| SeatConfig::with_hand(format!("P{}", i), *h))
            .collect(),
        false,
    )
    .unwrap();
    g
}

fn seat(i: u8) -> Seat {
    Seat::new(i)
}

/// The tile `seat` holds of the given kind.
fn in_hand(g: &Game, s: Seat, kind: &str) -> TileId {
    let kind: Tile = kind.parse().unwrap();
    *g.player(s)
        .hand
        .iter()
        .find(|id| id.normal_kind() == kind)
        .unwrap_or_else(|| panic!("{} does not hold {}", s, kind))
}

/// The latest draw reported for `seat` in the drained events.
fn drawn(events: &[(Option<Seat>, Event)], s: Seat) -> TileId {
    events
        .iter()
        .filter_map(|(_, ev)| match ev {
            Event::Tile { seat, tile: Some(id) } if *seat == s => Some(*id),
            _ => None,
        })
        .last()
        .expect("no draw for seat")
}

fn queries_for(events: &[(Option<Seat>, Event)], s: Seat) -> Vec<&Query> {
    events
        .iter()
        .filter_map(|(target, ev)| match ev {
            Event::Query(q) if *target == Some(s) => Some(q),
            _ => None,
        })
        .collect()
}

fn draw_events(events: &[(Option<Seat>, Event)]) -> Vec<DrawKind> {
    events
        .iter()
        .filter_map(|(_, ev)| match ev {
            Event::Draw { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect()
}

fn win_records(events: &[(Option<Seat>, Event)]) -> Vec<&WinRecord> {
    events
        .iter()
        .filter_map(|(_, ev)| match ev {
            Event::Win { win } => Some(win),
            _ => None,
        })
        .collect()
}

/// Every tile of the set is somewhere: wall, hands, melds, uncalled
/// discards or the revealed indicators.
fn assert_tile_conservation(g: &Game) {
    let mut total = g.wall().remaining();
    for s in ALL_SEATS {
        let p = g.player(s);
        total += p.hand.len() as u32;
        total += p.melds.iter().map(|m| m.tiles.len() as u32).sum::<u32>();
        total += p.discards.iter().filter(|d| d.called_by.is_none()).count() as u32;
    }
    total += g.dora_indicators().len() as u32;
    assert_eq!(total, 136);
}

// ---------------------------------------------------------------------
// Scenario 1: four identical wind discards on the first uninterrupted
// go-around abort the round.

#[test]
fn four_wind_abortive_draw() {
    let mut g = game(
        [
            "ew 1m4m7m2p5p8p3s6s9s wd 2m 9p",
            "ew 2m5m8m3p6p9p1s4s7s gd 3m 1p",
            "ew 3m6m9m1p4p7p2s5s8s rd 4m 6p",
            "ew 4m6m9m2p7p9p1s4s8s gd 7m 2s",
        ],
        "3p nw nw nw nw",
    );
    let _ = g.pop_events();

    for i in 0..4 {
        let s = seat(i);
        let tile = in_hand(&g, s, "ew");
        g.discard_tile(s, tile, false).unwrap();
        let _ = g.pop_events();
        if i < 3 {
            assert_eq!(g.active_seat(), seat(i + 1));
        }
    }

    // The fourth discard never reaches arbitration: the round aborts and a
    // bonus round of the same wind/round begins.
    assert_eq!(g.bonus(), 1);
    assert_eq!(g.round(), 1);
    assert_eq!(g.wind(), Wind::East);
    assert_eq!(g.points().iter().sum::<GamePoints>(), 100_000);
}

#[test]
fn four_wind_draw_event_is_emitted() {
    let mut g = game(
        [
            "ew 1m4m7m2p5p8p3s6s9s wd 2m 9p",
            "ew 2m5m8m3p6p9p1s4s7s gd 3m 1p",
            "ew 3m6m9m1p4p7p2s5s8s rd 4m 6p",
            "ew 4m6m9m2p7p9p1s4s8s gd 7m 2s",
        ],
        "3p nw nw nw nw",
    );
    let _ = g.pop_events();
    for i in 0..4 {
        let s = seat(i);
        let tile = in_hand(&g, s, "ew");
        g.discard_tile(s, tile, false).unwrap();
        if i == 3 {
            let events = g.pop_events();
            assert_eq!(draw_events(&events), vec![DrawKind::Wind]);
        } else {
            let _ = g.pop_events();
        }
    }
}

// ---------------------------------------------------------------------
// Scenario 2: nine distinct orphan kinds on the first draw allow an
// abortive draw.

#[test]
fn nine_terminal_abortive_draw() {
    let mut g = game(
        [
            "1m9m1p9p1s9s ew sw ww nw wd gd rd",
            "2m3m5m6m 2p3p5p6p 2s3s5s6s 7p",
            "4m7m8m 4p8p9p 4s7s8s 2m 7p 2p 2s",
            "6m7m 1p2p3p 6p 1s2s 4s 6s8s 3m 9s",
        ],
        "4s 2m",
    );
    let events = g.pop_events();
    assert!(queries_for(&events, seat(0))
        .iter()
        .any(|q| matches!(q, Query::NineTerminals)));

    g.do_9tile_draw(seat(0)).unwrap();
    let events = g.pop_events();
    assert_eq!(draw_events(&events)[0], DrawKind::Terminal);
    assert_eq!(g.bonus(), 1);
    assert_eq!(g.round(), 1);
}

#[test]
fn nine_terminal_draw_needs_the_shape() {
    let mut g = game(
        [
            "1m2m4m7m8m 1p2p4p 1s3s 7s 9m 9p",
            "2m3m4m6m7m8m2p3p4p6p7p8p ww",
            "2m3m6m9m 7p8p 2p3p 4s5s 9s 1s 6p",
            "3m4m6m7m 1p3p 6p9p 2s3s 6s7s 9s",
        ],
        "1s gd nw nw nw sw ww",
    );
    let _ = g.pop_events();
    let err = g.do_9tile_draw(seat(0)).unwrap_err();
    assert!(matches!(err, ActionError::NineTerminalsUnavailable { .. }));
}

// ---------------------------------------------------------------------
// Scenario 3: closed-hand tsumo by a non-dealer without riichi.

#[test]
fn non_dealer_closed_tsumo() {
    let mut g = game(
        [
            "1m2m4m7m8m 1p2p4p 1s3s 7s 9m 9p",
            "2m3m4m6m7m8m2p3p4p6p7p8p ww",
            "2m3m6m9m 7p8p 2p3p 4s5s 9s 1s 6p",
            "3m4m6m7m 1p3p 6p9p 2s3s 6s7s 9s",
        ],
        // dora ind, then s0:gd s1:nw s2:nw s3:nw s0:sw s1:ww (the win)
        "1s gd nw nw nw sw ww",
    );
    let events = g.pop_events();

    // one full uninterrupted go-around so the win is not chiihou
    let mut last = events;
    for s in [seat(0), seat(1), seat(2), seat(3), seat(0)] {
        let tile = drawn(&last, s);
        g.discard_tile(s, tile, false).unwrap();
        last = g.pop_events();
    }

    // seat 1 has drawn the winning west wind
    assert!(queries_for(&last, seat(1))
        .iter()
        .any(|q| matches!(q, Query::Tsumo)));
    g.do_tsumo(seat(1)).unwrap();

    let events = g.pop_events();
    let wins = win_records(&events);
    assert_eq!(wins.len(), 1);
    let win = wins[0];
    assert_eq!(win.seat, seat(1));
    assert_eq!(win.win_tile, None);
    assert!(win.han >= 1);
    assert!(win.yaku.iter().any(|(y, _)| *y == Yaku::MenzenTsumo));

    // menzen tsumo only, 30 fu: dealer 500, others 300 each
    assert_eq!(g.points(), [24_500, 26_100, 24_700, 24_700]);
    assert_eq!(g.points().iter().sum::<GamePoints>(), 100_000);
    assert_eq!(g.riichi_sticks(), 0);
    // non-dealer win rotates the deal
    assert_eq!(g.round(), 2);
}

// ---------------------------------------------------------------------
// Scenario 4: riichi, then ron with ura dora; the sticks move to the
// winner.

#[test]
fn riichi_ron_collects_ura_dora_and_sticks() {
    let mut g = game(
        [
            "1m3m7m8m9m 1p3p9p9p 6p8p 2s4s",
            "2m2m4m6m 4p5p6p7p8p 1m 3p 9p 9m",
            "2m3m4m6m7m8m2p3p4p9s9s5s6s",
            "3m4m6m7m 1p2p 6p7p 1s2s3s 8p 9m",
        ],
        // dora ind; a full honor-throwing go-around, then s2 riichis on the
        // second north wind, s3 passes and s0 deals into 4s/7s; ura: 1m
        "1s wd gd nw wd ww gd nw wd 7s 1m",
    );
    let mut last = g.pop_events();

    // first go-around plus two turns: everyone throws the drawn honor
    // (seat 2 declines the riichi offered on its first draw)
    for s in [seat(0), seat(1), seat(2), seat(3), seat(0), seat(1)] {
        let tile = drawn(&last, s);
        g.discard_tile(s, tile, false).unwrap();
        last = g.pop_events();
    }

    // seat 2 declares riichi on the second drawn north wind
    let riichi_queries = queries_for(&last, seat(2));
    assert!(riichi_queries
        .iter()
        .any(|q| matches!(q, Query::Riichi { .. })));
    let tile = drawn(&last, seat(2));
    g.discard_tile(seat(2), tile, true).unwrap();
    last = g.pop_events();
    assert_eq!(g.riichi_sticks(), 1);
    assert!(g.player(seat(2)).riichi);

    // seat 3 passes, then seat 0 deals into the 4s/7s wait
    let tile = drawn(&last, seat(3));
    g.discard_tile(seat(3), tile, false).unwrap();
    last = g.pop_events();
    let tile = drawn(&last, seat(0));
    g.discard_tile(seat(0), tile, false).unwrap();
    last = g.pop_events();
    assert!(queries_for(&last, seat(2))
        .iter()
        .any(|q| matches!(q, Query::Ron { from_seat } if *from_seat == seat(0))));

    g.do_ron(&[seat(2)], seat(0), None).unwrap();
    let events = g.pop_events();
    let wins = win_records(&events);
    assert_eq!(wins.len(), 1);
    let win = wins[0];

    // exactly one ura indicator per dora indicator, and it hits the 2m
    assert_eq!(win.dora_indicators.len(), 1);
    assert_eq!(win.ura_dora_indicators.len(), 1);
    assert!(win.yaku.iter().any(|(y, _)| *y == Yaku::Riichi));
    assert!(win.yaku.iter().any(|(y, n)| *y == Yaku::UraDora && *n == 1));

    // riichi + ippatsu + pinfu + aka + ura = mangan; the stick comes home
    assert_eq!(g.points(), [17_000, 25_000, 33_000, 25_000]);
    assert_eq!(g.riichi_sticks(), 0);
    assert_eq!(g.round(), 2);
}

// ---------------------------------------------------------------------
// Scenario 5: kuikae after a chi is rejected at discard time.

#[test]
fn chi_kuikae_is_rejected() {
    let mut g = game(
        [
            "9m9m 1p2p4p6p 1s3s5s7s9s ew sw",
            "4m5m6m 2p3p7p8p 2s3s7s8s ww ew",
            "4m7m8m 3p5p6p 2s4s6s8s9s nw gd",
            "6m7m9m 1p4p9p 1s4s6s9s wd rd rd",
        ],
        "9p 3m",
    );
    let last = g.pop_events();

    // dealer throws the drawn 3m; the next seat may chi with 4m5m (a left
    // chi, so the 6m on the far end is withheld too)
    let tile = drawn(&last, seat(0));
    g.discard_tile(seat(0), tile, false).unwrap();
    let last = g.pop_events();
    let chi = queries_for(&last, seat(1))
        .into_iter()
        .find_map(|q| match q {
            Query::Call { kind: CallKind::Chi, choices, from_seat, .. } => {
                assert_eq!(*from_seat, Some(seat(0)));
                Some(choices[0].clone())
            }
            _ => None,
        })
        .expect("chi query for seat 1");

    g.call_chi(chi, seat(1), seat(0)).unwrap();
    let last = g.pop_events();

    // the discard query withholds both the called kind and the swap kind
    let six = in_hand(&g, seat(1), "6m");
    let allowed = queries_for(&last, seat(1))
        .into_iter()
        .find_map(|q| match q {
            Query::Discard { allowed, .. } => Some(allowed.clone()),
            _ => None,
        })
        .expect("discard query after chi");
    assert!(!allowed.contains(&six));
    assert!(!allowed.iter().any(|id| id.normal_kind() == "3m".parse().unwrap()));

    let err = g.discard_tile(seat(1), six, false).unwrap_err();
    assert!(matches!(err, ActionError::KuikaeForbidden { .. }));

    // the failed action mutated nothing
    assert!(g.player(seat(1)).hand.contains(&six));
    assert_tile_conservation(&g);

    // a legal discard still goes through
    let legal = in_hand(&g, seat(1), "ww");
    g.discard_tile(seat(1), legal, false).unwrap();
    assert_tile_conservation(&g);
}

// ---------------------------------------------------------------------
// Scenario 6: double ron; the seat nearest clockwise from the discarder
// takes the bonuses, and the deal rotates when no caller is the dealer.

#[test]
fn double_ron_pays_both_winners() {
    let mut g = game(
        [
            "1m9m1p2p4p6p1s3s4s6s ew sw rd",
            "wd wd wd 2m3m4m 5m6m7m 2p2p 5s6s",
            "gd gd gd 3p4p5p 6p7p8p 3m3m 8s9s",
            "1m2m 4m8m9m 8p9p 1p 2s3s 9s nw rd",
        ],
        "1p ww nw ew 7s",
    );
    let mut last = g.pop_events();

    for s in [seat(0), seat(1), seat(2), seat(3)] {
        let tile = drawn(&last, s);
        g.discard_tile(s, tile, false).unwrap();
        last = g.pop_events();
    }

    // seat 3 discarded the 7s both others wait on
    for s in [seat(1), seat(2)] {
        assert!(queries_for(&last, s)
            .iter()
            .any(|q| matches!(q, Query::Ron { from_seat } if *from_seat == seat(3))));
    }

    g.do_ron(&[seat(1), seat(2)], seat(3), None).unwrap();
    let events = g.pop_events();
    let wins = win_records(&events);
    assert_eq!(wins.len(), 2);
    assert_eq!(wins[0].seat, seat(1));
    assert_eq!(wins[1].seat, seat(2));
    for win in &wins {
        assert_eq!(win.win_tile.map(|t| t.normal_kind()), Some("7s".parse().unwrap()));
    }

    // haku + 2 dora + 2 aka = mangan for seat 1; hatsu + aka, 40 fu for
    // seat 2; seat 3 covers both
    assert_eq!(g.points(), [25_000, 33_000, 27_600, 14_400]);
    assert_eq!(g.points().iter().sum::<GamePoints>(), 100_000);
    // no caller was the dealer, so the deal rotates
    assert_eq!(g.round(), 2);
}

// ---------------------------------------------------------------------
// Cross-cutting invariants

#[test]
fn deal_satisfies_hand_size_and_conservation() {
    let g = game(
        [
            "1m2m4m7m8m 1p2p4p 1s3s 7s 9m 9p",
            "2m3m4m6m7m8m2p3p4p6p7p8p ww",
            "2m3m6m9m 7p8p 2p3p 4s5s 9s 1s 6p",
            "3m4m6m7m 1p3p 6p9p 2s3s 6s7s 9s",
        ],
        "1s gd nw nw nw sw ww",
    );
    // dealer has drawn the 14th tile, everyone else holds 13
    assert_eq!(g.player(seat(0)).hand.len(), 14);
    for i in 1..4 {
        assert_eq!(g.player(seat(i)).hand.len(), 13);
    }
    assert_eq!(g.remaining_draws(), 69);
    assert_tile_conservation(&g);
}

#[test]
fn riichi_requires_tenpai_discard() {
    let mut g = game(
        [
            "1m2m4m7m8m 1p2p4p 1s3s 7s 9m 9p",
            "2m3m4m6m7m8m2p3p4p6p7p8p ww",
            "2m3m6m9m 7p8p 2p3p 4s5s 9s 1s 6p",
            "3m4m6m7m 1p3p 6p9p 2s3s 6s7s 9s",
        ],
        "1s gd nw nw nw sw ww",
    );
    let last = g.pop_events();
    // the dealer's junk hand cannot declare riichi
    let tile = drawn(&last, seat(0));
    let err = g.discard_tile(seat(0), tile, true).unwrap_err();
    assert!(matches!(err, ActionError::RiichiNotTenpai { .. }));
    // and nothing changed: the same discard without riichi is accepted
    g.discard_tile(seat(0), tile, false).unwrap();
}

#[test]
fn wrong_seat_discard_is_rejected() {
    let mut g = game(
        [
            "1m2m4m7m8m 1p2p4p 1s3s 7s 9m 9p",
            "2m3m4m6m7m8m2p3p4p6p7p8p ww",
            "2m3m6m9m 7p8p 2p3p 4s5s 9s 1s 6p",
            "3m4m6m7m 1p3p 6p9p 2s3s 6s7s 9s",
        ],
        "1s gd nw nw nw sw ww",
    );
    let _ = g.pop_events();
    let tile = g.player(seat(2)).hand[0];
    let err = g.discard_tile(seat(2), tile, false).unwrap_err();
    assert!(matches!(err, ActionError::NotActiveSeat { .. }));
}
