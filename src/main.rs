//! Letterfall entry point
//!
//! Headless demo session: stub boundaries, a scripted hand feed that plays
//! the game, and a JSON-lines round log in the temp directory. A real host
//! supplies its own renderer, sensor, and audio implementations.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;

use letterfall::announce::Announcer;
use letterfall::audio::{CueKind, CuePlayer};
use letterfall::consts::{DEFAULT_DT_MS, PLAY_W};
use letterfall::game::{Game, Ports};
use letterfall::input::{HandSensor, HandTracker, SensorError};
use letterfall::renderer::{DrawHandle, Drawable, Renderer, RendererError};
use letterfall::settings::FixedTunables;
use letterfall::telemetry::JsonlRoundLog;
use letterfall::{Tunables, clamp01};

/// Frames the demo session runs for (a few rounds at 16 ms per frame)
const DEMO_FRAMES: u32 = 4000;

/// Renderer that only tracks handles; lets the demo verify nothing leaks
struct HeadlessRenderer {
    live: HashMap<DrawHandle, Drawable>,
    next_id: u64,
}

impl HeadlessRenderer {
    fn new() -> Result<Self, RendererError> {
        Ok(Self {
            live: HashMap::new(),
            next_id: 1,
        })
    }
}

impl Renderer for HeadlessRenderer {
    fn add(&mut self, drawable: Drawable, _pos: Vec2) -> DrawHandle {
        let handle = DrawHandle(self.next_id);
        self.next_id += 1;
        self.live.insert(handle, drawable);
        handle
    }

    fn remove(&mut self, handle: DrawHandle) {
        self.live.remove(&handle);
    }

    fn set_transform(&mut self, _handle: DrawHandle, _pos: Vec2) {}

    fn resize(&mut self, width: u32, height: u32) {
        log::debug!("resize to {width}x{height}");
    }

    fn present(&mut self) {}

    fn dispose(&mut self) {
        log::info!("renderer disposed ({} drawables released)", self.live.len());
        self.live.clear();
    }
}

/// Stand-in hand feed; the demo loop writes into the tracker the way a
/// camera callback would
#[derive(Default)]
struct DemoFeed {
    feed: Option<HandTracker>,
}

impl HandSensor for DemoFeed {
    fn subscribe(&mut self, tracker: HandTracker) -> Result<(), SensorError> {
        self.feed = Some(tracker);
        Ok(())
    }

    fn stop(&mut self) {
        if self.feed.take().is_some() {
            log::debug!("demo feed stopped");
        }
    }
}

struct LogCues;

impl CuePlayer for LogCues {
    fn play(&mut self, kind: CueKind) {
        log::info!("cue: {kind:?}");
    }
}

struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&mut self, text: &str) {
        log::info!("announce: {text}");
    }
}

fn main() {
    env_logger::init();

    // Renderer construction is the only fatal step; report and bail before
    // any frame is scheduled
    let renderer = match HeadlessRenderer::new() {
        Ok(renderer) => renderer,
        Err(err) => {
            log::error!("cannot start session: {err}");
            std::process::exit(1);
        }
    };

    let log_path = std::env::temp_dir().join("letterfall_rounds.jsonl");
    let ports = Ports {
        sensor: Box::new(DemoFeed::default()),
        cues: Box::new(LogCues),
        announcer: Box::new(LogAnnouncer),
        round_log: Box::new(JsonlRoundLog::new(&log_path)),
        tunables: Box::new(FixedTunables::default()),
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut game = Game::new(seed, Box::new(renderer), ports);
    let feed = game.hand_tracker();
    let sensitivity = Tunables::default().sensitivity;

    let mut now_ms = 0.0_f64;
    for _ in 0..DEMO_FRAMES {
        // Steer toward the target letter's column, like a player would
        let desired_norm = game
            .state()
            .letters
            .iter()
            .find(|l| l.is_target)
            .map(|l| clamp01(l.pos.x / (PLAY_W * sensitivity) + 0.5))
            .unwrap_or(0.5);
        feed.report(1.0 - desired_norm, true);

        now_ms += f64::from(DEFAULT_DT_MS);
        if !game.frame(now_ms) {
            break;
        }
    }

    game.shutdown();
    log::info!(
        "demo finished: score {}, {} rounds logged to {}",
        game.score(),
        game.rounds_logged(),
        log_path.display()
    );
}
