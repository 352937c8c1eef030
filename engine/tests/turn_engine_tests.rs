//! End-to-end turn engine tests on virtual time.

use proptest::prelude::*;
use std::time::Duration;

use snake_ladder_engine::engine::{LADDER_TEXT, SNAKE_TEXT};
use snake_ladder_engine::{
    BoardMap, EngineConfig, Event, EventType, GamePhase, ManualScheduler, PlayerSpec, Scheduler,
    ScriptedDice, Severity, Snapshot, TurnEngine,
};

type Engine = TurnEngine<ScriptedDice, ManualScheduler>;

fn classic(faces: &[u8]) -> Engine {
    build(EngineConfig::default().with_seed(11), faces)
}

fn plain_board(faces: &[u8]) -> Engine {
    build(EngineConfig::default().with_seed(11).with_board(vec![]), faces)
}

fn build(cfg: EngineConfig, faces: &[u8]) -> Engine {
    TurnEngine::new(cfg, ScriptedDice::new(faces.iter().copied()).unwrap(), ManualScheduler::new()).unwrap()
}

/// One full roll, including every delayed step.
fn play(e: &mut Engine) -> Vec<Event> {
    e.roll_dice();
    e.run_until_idle().unwrap();
    e.drain_events()
}

fn shown(events: &[Event]) -> Vec<(String, String)> {
    events.iter()
        .filter(|ev| ev.ty == EventType::MessageShown)
        .map(|ev| (ev.payload["text"].as_str().unwrap().to_string(), ev.payload["severity"].as_str().unwrap().to_string()))
        .collect()
}

fn positions(s: &Snapshot) -> Vec<u8> { s.players.iter().map(|p| p.position).collect() }

// =============================================================================
// Worked examples
// =============================================================================

#[test]
fn test_ladder_on_four() {
    let mut e = classic(&[4]);
    e.start_game();
    e.drain_events();
    e.roll_dice();
    e.advance(Duration::from_millis(1000)).unwrap();
    assert_eq!(e.players().at(0).unwrap().position, 4);
    assert_eq!(e.turn().current, 0);

    e.advance(Duration::from_millis(1000)).unwrap();
    assert_eq!(e.players().at(0).unwrap().position, 14);
    let msg = e.message().unwrap();
    assert_eq!(msg.severity, Severity::Success);
    assert_eq!(msg.text, LADDER_TEXT);
    assert_eq!(msg.duration, Duration::from_millis(2000));
    assert_eq!(e.turn().current, 0);

    e.advance(Duration::from_millis(1500)).unwrap();
    assert_eq!(e.turn().current, 1);
}

#[test]
fn test_snake_on_seventeen() {
    // player 1 rolls 5, 6, 6 and lands on the 17 snake
    let mut e = classic(&[5, 1, 6, 1, 6]);
    e.start_game();
    for _ in 0..4 { play(&mut e); }
    assert_eq!(e.players().at(0).unwrap().position, 11);
    let events = play(&mut e);
    assert_eq!(e.players().at(0).unwrap().position, 7);
    assert!(shown(&events).contains(&(SNAKE_TEXT.to_string(), "danger".to_string())));
    assert_eq!(e.turn().current, 1);
}

#[test]
fn test_overshoot_at_ninety_eight() {
    // player 1 walks to 98 on a plain board while player 2 shuffles along
    let mut faces = Vec::new();
    for _ in 0..16 { faces.extend([6, 1]); }
    faces.extend([2, 1, 5]);
    let mut e = plain_board(&faces);
    e.start_game();
    for _ in 0..34 { play(&mut e); }
    assert_eq!(e.players().at(0).unwrap().position, 98);
    assert_eq!(e.turn().current, 0);

    e.roll_dice();
    e.advance(Duration::from_millis(1000)).unwrap();
    assert_eq!(e.players().at(0).unwrap().position, 98);
    assert_eq!(e.turn().current, 1);
    assert!(!e.turn().resolving);
    let msg = e.message().unwrap();
    assert_eq!(msg.severity, Severity::Warning);
    assert_eq!(msg.text, "Player 1 needs exactly 2 to win!");
    let events = e.drain_events();
    let over = events.iter().find(|ev| ev.ty == EventType::Overshoot).unwrap();
    assert_eq!(over.payload["needed"], 2);
    assert!(!events.iter().any(|ev| ev.ty == EventType::Moved));
}

#[test]
fn test_exact_hundred_wins() {
    let mut faces = Vec::new();
    for _ in 0..15 { faces.extend([6, 1]); }
    faces.extend([5, 1, 5]);
    let mut e = plain_board(&faces);
    e.start_game();
    for _ in 0..32 { play(&mut e); }
    assert_eq!(e.players().at(0).unwrap().position, 95);

    e.roll_dice();
    e.advance(Duration::from_millis(1000)).unwrap();
    assert_eq!(e.phase(), GamePhase::Finished);
    assert_eq!(e.turn().current, 0);
    assert_eq!(e.winner().unwrap().name, "Player 1");
    let msg = e.message().unwrap();
    assert_eq!(msg.severity, Severity::Success);
    assert_eq!(msg.text, "🎉 Player 1 wins the game! 🎉");
    assert_eq!(msg.duration, Duration::from_millis(5000));

    // nothing left but the message timer
    assert_eq!(e.scheduler().pending(), 1);
    e.run_until_idle().unwrap();
    assert_eq!(e.turn().current, 0);
    assert!(e.message().is_none());
}

#[test]
fn test_solo_player_reaches_hundred() {
    let cfg = EngineConfig::default()
        .with_seed(2)
        .with_players(vec![PlayerSpec::new(1, "Solo", "#123")])
        .with_board(vec![]);
    let mut faces = vec![6; 16];
    faces.push(4);
    let mut e = build(cfg, &faces);
    e.start_game();
    for _ in 0..17 { play(&mut e); }
    assert_eq!(e.phase(), GamePhase::Finished);
    assert_eq!(e.players().at(0).unwrap().position, 100);
}

// =============================================================================
// Guards and lifecycle
// =============================================================================

#[test]
fn test_roll_before_start_is_ignored() {
    let mut e = classic(&[3]);
    let before = e.snapshot();
    e.roll_dice();
    e.run_until_idle().unwrap();
    assert_eq!(e.snapshot(), before);
    assert!(e.drain_events().is_empty());
    assert_eq!(e.dice().rolls(), 0);
}

#[test]
fn test_roll_while_rolling_is_ignored() {
    let mut e = classic(&[3, 4]);
    e.start_game();
    e.roll_dice();
    e.advance(Duration::from_millis(300)).unwrap();
    let before = e.snapshot();
    let pending = e.scheduler().pending();
    e.roll_dice();
    assert_eq!(e.snapshot(), before);
    assert_eq!(e.scheduler().pending(), pending);
    e.run_until_idle().unwrap();
    assert_eq!(e.dice().rolls(), 1);
}

#[test]
fn test_roll_after_finish_is_ignored() {
    let cfg = EngineConfig::default().with_seed(4).with_players(vec![PlayerSpec::new(9, "Solo", "x")]).with_board(vec![]);
    let mut faces = vec![5; 20];
    faces.push(1);
    let mut e = build(cfg, &faces);
    e.start_game();
    for _ in 0..20 { play(&mut e); }
    assert_eq!(e.phase(), GamePhase::Finished);
    let before = e.snapshot();
    e.roll_dice();
    e.run_until_idle().unwrap();
    assert_eq!(e.snapshot(), before);
}

#[test]
fn test_reset_from_every_phase() {
    let mut e = plain_board(&[6]);
    e.reset_game();
    assert_eq!(e.phase(), GamePhase::Waiting);

    e.start_game();
    play(&mut e);
    e.roll_dice();
    e.advance(Duration::from_millis(200)).unwrap();
    e.reset_game();
    let s = e.snapshot();
    assert_eq!(s.phase, GamePhase::Waiting);
    assert_eq!(positions(&s), [0, 0]);
    assert_eq!((s.current_player, s.dice_value, s.rolling, s.resolving), (0, 0, false, false));
    assert!(s.message.is_none());

    let solo = EngineConfig::default().with_seed(1).with_players(vec![PlayerSpec::new(1, "S", "c")]).with_board(vec![]);
    let mut e = build(solo, &[5]);
    e.start_game();
    for _ in 0..20 { play(&mut e); }
    assert_eq!(e.phase(), GamePhase::Finished);
    e.reset_game();
    assert_eq!(e.phase(), GamePhase::Waiting);
    assert_eq!(positions(&e.snapshot()), [0]);
    assert!(e.message().is_none());
}

#[test]
fn test_start_is_a_hard_restart() {
    let mut e = classic(&[4, 2, 3]);
    e.start_game();
    play(&mut e);
    play(&mut e);
    assert_eq!(positions(&e.snapshot()), [14, 2]);
    e.start_game();
    let s = e.snapshot();
    assert_eq!(s.phase, GamePhase::Playing);
    assert_eq!(positions(&s), [0, 0]);
    assert_eq!(s.current_player, 0);
    assert_eq!(s.generation, 2);
}

#[test]
fn test_three_players_rotate() {
    let cfg = EngineConfig::default().with_seed(8).with_players(vec![
        PlayerSpec::new(1, "A", "a"), PlayerSpec::new(2, "B", "b"), PlayerSpec::new(3, "C", "c"),
    ]);
    let mut e = build(cfg, &[1]);
    e.start_game();
    let mut order = Vec::new();
    for _ in 0..6 {
        order.push(e.turn().current);
        play(&mut e);
    }
    assert_eq!(order, [0, 1, 2, 0, 1, 2]);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_each_roll_follows_the_rules(
        players in 1usize..=4,
        faces in prop::collection::vec(1u8..=6, 1..200),
    ) {
        let roster = (1..=players as u32).map(|i| PlayerSpec::new(i, format!("P{i}"), "c")).collect();
        let cfg = EngineConfig::default().with_seed(99).with_players(roster);
        let mut e = build(cfg, &faces);
        let board = BoardMap::classic();
        e.start_game();
        e.drain_events();

        for &face in &faces {
            let before = e.snapshot();
            let events = play(&mut e);
            let after = e.snapshot();

            if before.phase != GamePhase::Playing {
                prop_assert_eq!(positions(&after), positions(&before));
                prop_assert_eq!(after.current_player, before.current_player);
                prop_assert!(events.iter().all(|ev| ev.ty != EventType::Rolled));
                continue;
            }

            let idx = before.current_player;
            let from = before.players[idx].position;
            let target = from + face;
            let mut expected = positions(&before);
            prop_assert_eq!(after.dice_value, face);
            prop_assert!(!after.rolling && !after.resolving);

            if target > 100 {
                prop_assert_eq!(after.current_player, (idx + 1) % players);
                let needed = format!("needs exactly {} to win!", 100 - from);
                prop_assert!(shown(&events).iter().any(|(t, s)| t.ends_with(&needed) && s == "warning"));
            } else if target == 100 {
                expected[idx] = 100;
                prop_assert_eq!(after.phase, GamePhase::Finished);
                prop_assert_eq!(after.current_player, idx);
            } else {
                expected[idx] = board.feature_at(target).map_or(target, |f| f.end);
                prop_assert_eq!(after.current_player, (idx + 1) % players);
            }
            prop_assert_eq!(positions(&after), expected);
        }
    }

    #[test]
    fn prop_reset_always_returns_to_waiting(
        faces in prop::collection::vec(1u8..=6, 1..40),
        cut_ms in 0u64..4000,
    ) {
        let mut e = classic(&faces);
        e.start_game();
        for _ in 0..faces.len() / 2 { play(&mut e); }
        e.roll_dice();
        e.advance(Duration::from_millis(cut_ms)).unwrap();
        e.reset_game();
        e.run_until_idle().unwrap();
        let s = e.snapshot();
        prop_assert_eq!(s.phase, GamePhase::Waiting);
        prop_assert_eq!(positions(&s), vec![0, 0]);
        prop_assert_eq!((s.current_player, s.dice_value, s.rolling, s.resolving), (0, 0, false, false));
        prop_assert!(s.message.is_none());
    }
}
