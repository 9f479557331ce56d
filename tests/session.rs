//! Full-session tests: the frame driver wired to recording stub boundaries.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use letterfall::announce::Announcer;
use letterfall::audio::{CueKind, CuePlayer};
use letterfall::consts::*;
use letterfall::game::{Game, Key, Ports};
use letterfall::input::{HandSensor, HandStatus, HandTracker, SensorError};
use letterfall::renderer::{DrawHandle, Drawable, Renderer};
use letterfall::settings::{SharedTunables, TunableSource};
use letterfall::sim::{GameState, Letter, RoundOutcome, RoundPhase};
use letterfall::telemetry::{RoundLog, RoundRecord};
use letterfall::{Tunables, clamp01};

#[derive(Default)]
struct RenderStats {
    live: HashMap<DrawHandle, Drawable>,
    next_id: u64,
    basket_adds: usize,
    basket_removes: usize,
    disposed: bool,
}

impl RenderStats {
    fn live_letters(&self) -> usize {
        self.live
            .values()
            .filter(|d| matches!(d, Drawable::Letter { .. }))
            .count()
    }

    fn live_baskets(&self) -> Vec<f32> {
        self.live
            .values()
            .filter_map(|d| match d {
                Drawable::Basket { width } => Some(*width),
                _ => None,
            })
            .collect()
    }
}

struct RecordingRenderer(Rc<RefCell<RenderStats>>);

impl Renderer for RecordingRenderer {
    fn add(&mut self, drawable: Drawable, _pos: Vec2) -> DrawHandle {
        let mut stats = self.0.borrow_mut();
        stats.next_id += 1;
        let handle = DrawHandle(stats.next_id);
        if matches!(drawable, Drawable::Basket { .. }) {
            stats.basket_adds += 1;
        }
        stats.live.insert(handle, drawable);
        handle
    }

    fn remove(&mut self, handle: DrawHandle) {
        let mut stats = self.0.borrow_mut();
        if let Some(Drawable::Basket { .. }) = stats.live.remove(&handle) {
            stats.basket_removes += 1;
        }
    }

    fn set_transform(&mut self, _handle: DrawHandle, _pos: Vec2) {}

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn present(&mut self) {}

    fn dispose(&mut self) {
        let mut stats = self.0.borrow_mut();
        stats.live.clear();
        stats.disposed = true;
    }
}

struct StubSensor {
    stopped: Rc<Cell<bool>>,
    fail: bool,
}

impl HandSensor for StubSensor {
    fn subscribe(&mut self, _tracker: HandTracker) -> Result<(), SensorError> {
        if self.fail {
            Err(SensorError::Unavailable("stub failure".into()))
        } else {
            Ok(())
        }
    }

    fn stop(&mut self) {
        self.stopped.set(true);
    }
}

struct RecordingCues(Rc<RefCell<Vec<CueKind>>>);

impl CuePlayer for RecordingCues {
    fn play(&mut self, kind: CueKind) {
        self.0.borrow_mut().push(kind);
    }
}

struct RecordingAnnouncer(Rc<RefCell<Vec<String>>>);

impl Announcer for RecordingAnnouncer {
    fn announce(&mut self, text: &str) {
        self.0.borrow_mut().push(text.to_string());
    }
}

struct SharedLog(Rc<RefCell<Vec<RoundRecord>>>);

impl RoundLog for SharedLog {
    fn append(&mut self, record: RoundRecord) {
        self.0.borrow_mut().push(record);
    }

    fn count(&self) -> usize {
        self.0.borrow().len()
    }
}

struct Harness {
    game: Game,
    stats: Rc<RefCell<RenderStats>>,
    cues: Rc<RefCell<Vec<CueKind>>>,
    announcements: Rc<RefCell<Vec<String>>>,
    records: Rc<RefCell<Vec<RoundRecord>>>,
    sensor_stopped: Rc<Cell<bool>>,
    tunables: SharedTunables,
    now_ms: f64,
}

impl Harness {
    fn new(seed: u64) -> Self {
        Self::with_sensor_failure(seed, false)
    }

    fn with_sensor_failure(seed: u64, fail: bool) -> Self {
        let stats = Rc::new(RefCell::new(RenderStats::default()));
        let cues = Rc::new(RefCell::new(Vec::new()));
        let announcements = Rc::new(RefCell::new(Vec::new()));
        let records = Rc::new(RefCell::new(Vec::new()));
        let sensor_stopped = Rc::new(Cell::new(false));
        let tunables = SharedTunables::new(Tunables::default());

        let ports = Ports {
            sensor: Box::new(StubSensor {
                stopped: sensor_stopped.clone(),
                fail,
            }),
            cues: Box::new(RecordingCues(cues.clone())),
            announcer: Box::new(RecordingAnnouncer(announcements.clone())),
            round_log: Box::new(SharedLog(records.clone())),
            tunables: Box::new(tunables.clone()),
        };
        let game = Game::new(seed, Box::new(RecordingRenderer(stats.clone())), ports);

        Self {
            game,
            stats,
            cues,
            announcements,
            records,
            sensor_stopped,
            tunables,
            now_ms: 0.0,
        }
    }

    fn step(&mut self) -> bool {
        self.now_ms += f64::from(DEFAULT_DT_MS);
        self.game.frame(self.now_ms)
    }

    fn step_n(&mut self, frames: usize) {
        for _ in 0..frames {
            self.step();
        }
    }

    /// Run until a record is emitted, steering the hand feed so the basket
    /// follows the target letter's column.
    fn play_until_round_ends(&mut self, max_frames: usize) -> RoundRecord {
        let feed = self.game.hand_tracker();
        let sensitivity = self.tunables.snapshot().sensitivity;
        let before = self.records.borrow().len();
        for _ in 0..max_frames {
            let desired = self
                .game
                .state()
                .letters
                .iter()
                .find(|l| l.is_target)
                .map(|l| clamp01(l.pos.x / (PLAY_W * sensitivity) + 0.5))
                .unwrap_or(0.5);
            feed.report(1.0 - desired, true);
            self.step();
            if self.records.borrow().len() > before {
                return self.records.borrow().last().cloned().unwrap();
            }
        }
        panic!("no terminal event within {max_frames} frames");
    }

    /// Swap in a staged Falling state with the given target and letters
    fn stage(&mut self, target: char, letters: Vec<Letter>) {
        let mut state = GameState::new(1);
        state.target = target;
        state.phase = RoundPhase::Falling;
        state.letters = letters;
        self.game.load_state(state);
    }
}

fn letter(id: u32, ch: char, is_target: bool, x: f32, y: f32) -> Letter {
    Letter {
        id,
        ch,
        is_target,
        pos: Vec2::new(x, y),
        fall_factor: 1.0,
    }
}

#[test]
fn prep_spawns_after_delay_and_draws_letters() {
    let mut harness = Harness::new(42);

    // Initial announcement and the basket drawable exist before any frame
    assert_eq!(harness.announcements.borrow().len(), 1);
    assert_eq!(harness.stats.borrow().live_baskets().len(), 1);

    // Stay in Prep for the whole delay
    let frames_in_prep = (PREP_DELAY_MS / DEFAULT_DT_MS) as usize - 1;
    harness.step_n(frames_in_prep);
    assert_eq!(harness.game.state().phase, RoundPhase::Prep);
    assert_eq!(harness.stats.borrow().live_letters(), 0);

    // Crossing the delay spawns target + distractors and their drawables
    harness.step_n(2);
    assert_eq!(harness.game.state().phase, RoundPhase::Falling);
    assert_eq!(harness.stats.borrow().live_letters(), DISTRACTOR_COUNT + 1);
}

#[test]
fn staged_correct_catch_emits_cue_record_and_announcement() {
    let mut harness = Harness::new(7);
    harness.stage('B', vec![letter(101, 'B', true, 0.0, BASKET_Y + 10.0)]);

    let announced_before = harness.announcements.borrow().len();
    harness.step();

    let records = harness.records.borrow();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, RoundOutcome::Correct);
    assert_eq!(records[0].target, 'B');
    assert_eq!(records[0].score, 1);
    assert_eq!(records[0].notes, None);
    drop(records);

    assert_eq!(harness.cues.borrow().as_slice(), &[CueKind::Correct]);
    assert_eq!(harness.game.score(), 1);
    // New round announced, drawables for the old letters gone
    assert_eq!(harness.announcements.borrow().len(), announced_before + 1);
    assert_eq!(harness.game.state().phase, RoundPhase::Prep);
    assert_eq!(harness.stats.borrow().live_letters(), 0);
}

#[test]
fn staged_wrong_catch_notes_the_distractor() {
    let mut harness = Harness::new(7);
    harness.stage(
        'B',
        vec![
            letter(101, 'C', false, 0.0, BASKET_Y + 10.0),
            letter(102, 'B', true, 300.0, 400.0),
        ],
    );

    harness.step();

    let records = harness.records.borrow();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, RoundOutcome::WrongCatch);
    assert_eq!(records[0].notes.as_deref(), Some("caught C"));
    assert_eq!(records[0].score, -1);
    drop(records);

    assert_eq!(harness.cues.borrow().as_slice(), &[CueKind::Wrong]);
}

#[test]
fn staged_miss_plays_no_cue() {
    let mut harness = Harness::new(7);
    harness.stage(
        'B',
        vec![letter(
            101,
            'B',
            true,
            300.0,
            -PLAY_H / 2.0 - MISS_MARGIN - 5.0,
        )],
    );

    harness.step();

    let records = harness.records.borrow();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, RoundOutcome::Missed);
    assert_eq!(records[0].score, -1);
    drop(records);

    assert!(harness.cues.borrow().is_empty());
    assert_eq!(harness.game.score(), -1);
}

#[test]
fn played_round_keeps_cue_record_and_score_consistent() {
    let mut harness = Harness::new(42);
    let record = harness.play_until_round_ends(4000);

    assert_eq!(harness.game.rounds_logged(), 1);
    let cues = harness.cues.borrow();
    match record.outcome {
        RoundOutcome::Correct => {
            assert_eq!(cues.as_slice(), &[CueKind::Correct]);
            assert_eq!(harness.game.score(), 1);
        }
        RoundOutcome::WrongCatch => {
            assert_eq!(cues.as_slice(), &[CueKind::Wrong]);
            assert!(record.notes.is_some());
            assert_eq!(harness.game.score(), -1);
        }
        RoundOutcome::Missed => {
            assert!(cues.is_empty());
            assert_eq!(harness.game.score(), -1);
        }
    }
    drop(cues);

    // Next round is announced and underway
    assert_eq!(harness.game.state().phase, RoundPhase::Prep);
    assert_eq!(harness.announcements.borrow().len(), 2);
}

#[test]
fn records_arrive_in_event_order() {
    let mut harness = Harness::new(9);
    let mut expected_score = 0;
    for _ in 0..3 {
        let record = harness.play_until_round_ends(4000);
        expected_score += match record.outcome {
            RoundOutcome::Correct => 1,
            RoundOutcome::WrongCatch | RoundOutcome::Missed => -1,
        };
        assert_eq!(record.score, expected_score);
    }

    let records = harness.records.borrow();
    assert_eq!(records.len(), 3);
    for pair in records.windows(2) {
        assert!(pair[0].timestamp_ms <= pair[1].timestamp_ms);
    }
}

#[test]
fn basket_width_change_swaps_the_drawable_without_leaking() {
    let mut harness = Harness::new(5);
    harness.step();
    assert_eq!(harness.stats.borrow().basket_adds, 1);

    harness.tunables.set(Tunables {
        basket_width: 120.0,
        ..Tunables::default()
    });
    harness.step();

    let stats = harness.stats.borrow();
    assert_eq!(stats.basket_adds, 2);
    assert_eq!(stats.basket_removes, 1);
    assert_eq!(stats.live_baskets(), vec![120.0]);
    drop(stats);

    // Collision width follows on the same tick the snapshot is read
    harness.stage('B', vec![]);
    harness.step();
    assert_eq!(harness.game.state().basket.width, 120.0);
}

#[test]
fn out_of_range_tunables_are_clamped() {
    let mut harness = Harness::new(5);
    harness.tunables.set(Tunables {
        sensitivity: 50.0,
        basket_width: 9999.0,
        fall_speed_multiplier: 0.0,
    });
    harness.stage('B', vec![]);
    harness.step();

    assert_eq!(harness.game.state().basket.width, 380.0);
}

#[test]
fn keyboard_steers_and_repeat_reannounces() {
    let mut harness = Harness::new(5);
    harness.stage('B', vec![]);

    harness.game.key_down(Key::Right);
    harness.step_n(20);
    assert!(harness.game.state().basket.x > 0.0);
    harness.game.key_up(Key::Right);

    let before = harness.announcements.borrow().len();
    harness.game.key_down(Key::Repeat);
    let announcements = harness.announcements.borrow();
    assert_eq!(announcements.len(), before + 1);
    assert!(announcements.last().unwrap().contains('B'));
}

#[test]
fn sensor_failure_degrades_to_keyboard() {
    let harness = Harness::with_sensor_failure(5, true);
    assert_eq!(harness.game.hand_status(), HandStatus::Unavailable);
}

#[test]
fn shutdown_releases_everything_and_stops_the_loop() {
    let mut harness = Harness::new(5);
    harness.step_n(10);

    harness.game.shutdown();
    assert!(harness.sensor_stopped.get());
    assert!(harness.stats.borrow().disposed);
    assert!(harness.stats.borrow().live.is_empty());
    assert!(!harness.step());

    // Shutdown is idempotent
    harness.game.shutdown();
}
