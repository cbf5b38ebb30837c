use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use glitchtype::content::FixedSource;
use glitchtype::engine::Engine;
use glitchtype::queue::ParagraphQueue;
use glitchtype::runtime::{key_name, FixedTicker, GameEvent, Runner, TestEventSource};
use glitchtype::session::{GameState, MAX_LEVEL};

// Engine time per runner step, independent of how long the step really took
const FRAME: Duration = Duration::from_millis(16);

fn engine(text: &str, level: u32) -> Engine {
    let mut queue = ParagraphQueue::new(Arc::new(FixedSource::new(text)));
    queue.prime(2);
    Engine::new(queue, level)
}

fn harness() -> (Sender<GameEvent>, Runner<TestEventSource, FixedTicker>) {
    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::ZERO);
    (tx, Runner::new(es, ticker))
}

fn send_str(tx: &Sender<GameEvent>, s: &str) {
    for c in s.chars() {
        tx.send(GameEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }
}

/// One loop iteration of the real front end: apply the event, then a frame.
fn step(engine: &mut Engine, runner: &Runner<TestEventSource, FixedTicker>) -> bool {
    let ev = runner.step();
    let was_key = matches!(ev, GameEvent::Key(_));
    if let GameEvent::Key(key) = ev {
        if let Some(name) = key_name(&key) {
            engine.handle_input(&name);
        }
    }
    engine.tick(FRAME);
    was_key
}

fn drain_keys(engine: &mut Engine, runner: &Runner<TestEventSource, FixedTicker>) {
    for _ in 0..1000u32 {
        if !step(engine, runner) {
            break;
        }
    }
}

#[test]
fn headless_quick_fox_flow() {
    let mut engine = engine("the quick fox", 1);
    engine.start_game();
    let (tx, runner) = harness();

    send_str(&tx, "the ");
    drain_keys(&mut engine, &runner);

    let s = engine.session();
    assert_eq!(s.score, 10);
    assert_eq!(s.combo, 1);
    assert_eq!(s.word_index, 1);

    send_str(&tx, "x");
    drain_keys(&mut engine, &runner);

    let s = engine.session();
    assert_eq!(s.errors, 1);
    assert_eq!(s.combo, 0);
    assert_eq!(s.glitch_meter, 5.0);
    assert_eq!(s.input, "");
}

#[test]
fn headless_backspace_edits_input() {
    let mut engine = engine("hello world", 1);
    engine.start_game();
    let (tx, runner) = harness();

    send_str(&tx, "hel");
    tx.send(GameEvent::Key(KeyEvent::new(
        KeyCode::Backspace,
        KeyModifiers::NONE,
    )))
    .unwrap();
    drain_keys(&mut engine, &runner);

    assert_eq!(engine.session().input, "he");
    assert_eq!(engine.session().errors, 0);
}

#[test]
fn headless_idle_player_crashes_by_timeouts() {
    let mut engine = engine("the quick brown fox", 1);
    engine.start_game();
    let (_tx, runner) = harness();

    let mut frames = 0u32;
    while engine.session().state == GameState::Playing && frames < 100_000 {
        step(&mut engine, &runner);
        frames += 1;
    }

    let s = engine.session();
    assert_eq!(s.state, GameState::Crashed);
    assert_eq!(s.lives, 0);
    assert_eq!(s.glitch_meter, 100.0);
    assert_eq!(s.word_index, 0);

    // a crashed session is frozen
    let timer = s.word_timer;
    for _ in 0..50 {
        step(&mut engine, &runner);
    }
    assert_eq!(engine.session().word_timer, timer);
}

#[test]
fn headless_run_to_victory() {
    let mut engine = engine("go fast", 1);
    engine.start_game();
    let (tx, runner) = harness();

    for level in 1..=MAX_LEVEL {
        assert_eq!(engine.session().level, level);
        send_str(&tx, "go fast");
        drain_keys(&mut engine, &runner);
    }

    let s = engine.session();
    assert_eq!(s.state, GameState::Victory);
    assert_eq!(s.level, MAX_LEVEL);
    assert_eq!(s.combo, 12);
    // 10 * (1 + 2 + ... + 12)
    assert_eq!(s.score, 780);
    assert!(!s.words.is_empty());
}

#[test]
fn headless_restart_keeps_progress() {
    let mut engine = engine("go fast", 2);
    engine.start_game();
    let (tx, runner) = harness();

    send_str(&tx, "go x");
    drain_keys(&mut engine, &runner);
    let before = engine.session().clone();
    assert_eq!(before.score, 10);

    engine.restart_level();

    let s = engine.session();
    assert_eq!(s.state, GameState::Playing);
    assert_eq!(s.level, 2);
    assert_eq!(s.lives, before.lives);
    assert_eq!(s.score, 10);
    assert_eq!(s.word_index, 0);
    assert_eq!(s.glitch_meter, 0.0);
    assert!(!s.level_started);
}
