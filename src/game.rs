//! Game loop driver
//!
//! Owns the simulation state and the external boundaries, and advances one
//! frame per host callback. The host supplies timestamps and key events; the
//! driver supplies the per-frame order: poll tunables, apply basket-width
//! changes, advance the simulation, map the terminal event to feedback and
//! telemetry, sync the scene, present.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::announce::{Announcer, target_phrase};
use crate::audio::{CueKind, CuePlayer};
use crate::consts::*;
use crate::input::{HandSensor, HandStatus, HandTracker, KeyState, basket_target};
pub use crate::input::Key;
use crate::renderer::{DrawHandle, Drawable, Renderer};
use crate::settings::{TunableSource, Tunables};
use crate::sim::{GameState, RoundEvent, RoundOutcome, TickInput, tick};
use crate::telemetry::{RoundLog, RoundRecord};

/// External collaborators injected into the driver
pub struct Ports {
    pub sensor: Box<dyn HandSensor>,
    pub cues: Box<dyn CuePlayer>,
    pub announcer: Box<dyn Announcer>,
    pub round_log: Box<dyn RoundLog>,
    pub tunables: Box<dyn TunableSource>,
}

/// A running session: simulation state plus its boundaries
pub struct Game {
    state: GameState,
    renderer: Box<dyn Renderer>,
    ports: Ports,
    hand: HandTracker,
    keys: KeyState,
    tunables: Tunables,
    letter_handles: HashMap<u32, DrawHandle>,
    basket_handle: DrawHandle,
    basket_shown_width: f32,
    last_time_ms: Option<f64>,
    running: bool,
}

impl Game {
    /// Start a session. The renderer must already be initialized - its
    /// construction is the only fatal step and belongs to the caller.
    pub fn new(seed: u64, mut renderer: Box<dyn Renderer>, mut ports: Ports) -> Self {
        let hand = HandTracker::new();
        if let Err(err) = ports.sensor.subscribe(hand.clone()) {
            log::warn!("{err}; falling back to keyboard control");
            hand.set_unavailable();
        }

        let state = GameState::new(seed);
        let tunables = ports.tunables.snapshot().clamped();
        let basket_handle = renderer.add(
            Drawable::Basket {
                width: tunables.basket_width,
            },
            Vec2::new(state.basket.x, BASKET_Y),
        );

        ports.announcer.announce(&target_phrase(state.target));
        log::info!("session started, seed {seed}, target {}", state.target);

        Self {
            state,
            renderer,
            ports,
            hand,
            keys: KeyState::default(),
            basket_shown_width: tunables.basket_width,
            tunables,
            letter_handles: HashMap::new(),
            basket_handle,
            last_time_ms: None,
            running: true,
        }
    }

    /// Advance one frame at the host's timestamp (ms). Returns false once
    /// the session has been shut down and no further frames are wanted.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }

        let dt_ms = match self.last_time_ms {
            Some(prev) => ((now_ms - prev) as f32).clamp(0.0, MAX_DT_MS),
            None => DEFAULT_DT_MS,
        };
        self.last_time_ms = Some(now_ms);

        self.tunables = self.ports.tunables.snapshot().clamped();
        if self.tunables.basket_width != self.basket_shown_width {
            self.rebuild_basket_drawable();
        }

        let input = TickInput {
            target_x: basket_target(self.hand.normalized(), self.tunables.sensitivity),
            steer_left: self.keys.left,
            steer_right: self.keys.right,
        };
        if let Some(event) = tick(&mut self.state, &input, &self.tunables, dt_ms) {
            self.on_round_event(event, now_ms);
        }

        self.sync_scene();
        self.renderer.present();
        true
    }

    /// Host key-down. Repeat re-announces the current target immediately.
    pub fn key_down(&mut self, key: Key) {
        if key == Key::Repeat {
            self.ports
                .announcer
                .announce(&target_phrase(self.state.target));
            return;
        }
        self.keys.set(key, true);
    }

    /// Host key-up
    pub fn key_up(&mut self, key: Key) {
        self.keys.set(key, false);
    }

    /// Host window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    /// Stop the sensor feed and release all renderer resources. Idempotent;
    /// after this, `frame` returns false.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.ports.sensor.stop();
        self.renderer.dispose();
        log::info!(
            "session ended, score {}, {} rounds recorded",
            self.state.score,
            self.ports.round_log.count()
        );
    }

    // === Display read-back ===

    pub fn score(&self) -> i64 {
        self.state.score
    }

    pub fn target(&self) -> char {
        self.state.target
    }

    pub fn hand_status(&self) -> HandStatus {
        self.hand.status()
    }

    pub fn rounds_logged(&self) -> usize {
        self.ports.round_log.count()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Replace the simulation state (session restore, staged scenarios).
    /// The next frame re-syncs drawables and starts timing fresh.
    pub fn load_state(&mut self, state: GameState) {
        self.state = state;
        self.last_time_ms = None;
    }

    /// Sensor-side tracker handle, for hosts that drive the feed themselves
    pub fn hand_tracker(&self) -> HandTracker {
        self.hand.clone()
    }

    // === Internals ===

    /// Map a terminal event to cue, telemetry, and the next announcement.
    /// The round has already been restarted by the resolver; `state.target`
    /// is the new round's target.
    fn on_round_event(&mut self, event: RoundEvent, now_ms: f64) {
        let notes = match event.outcome {
            RoundOutcome::WrongCatch => event.caught.map(|ch| format!("caught {ch}")),
            _ => None,
        };
        match event.outcome {
            RoundOutcome::Correct => self.ports.cues.play(CueKind::Correct),
            RoundOutcome::WrongCatch => self.ports.cues.play(CueKind::Wrong),
            RoundOutcome::Missed => {}
        }

        log::info!(
            "round over: target {} {} (score {})",
            event.target,
            event.outcome.as_str(),
            event.score
        );
        self.ports.round_log.append(RoundRecord {
            timestamp_ms: now_ms,
            target: event.target,
            outcome: event.outcome,
            score: event.score,
            notes,
        });

        self.ports
            .announcer
            .announce(&target_phrase(self.state.target));
    }

    /// Swap the basket drawable for one at the new width. The old drawable
    /// is removed first so nothing leaks across the change.
    fn rebuild_basket_drawable(&mut self) {
        self.renderer.remove(self.basket_handle);
        self.basket_handle = self.renderer.add(
            Drawable::Basket {
                width: self.tunables.basket_width,
            },
            Vec2::new(self.state.basket.x, BASKET_Y),
        );
        self.basket_shown_width = self.tunables.basket_width;
    }

    /// Reconcile drawables with the simulation: add new letters, move live
    /// ones, drop the ones the round no longer owns.
    fn sync_scene(&mut self) {
        for letter in &self.state.letters {
            match self.letter_handles.get(&letter.id) {
                Some(&handle) => self.renderer.set_transform(handle, letter.pos),
                None => {
                    let handle = self.renderer.add(
                        Drawable::Letter {
                            ch: letter.ch,
                            is_target: letter.is_target,
                        },
                        letter.pos,
                    );
                    self.letter_handles.insert(letter.id, handle);
                }
            }
        }

        let live: HashSet<u32> = self.state.letters.iter().map(|l| l.id).collect();
        let stale: Vec<(u32, DrawHandle)> = self
            .letter_handles
            .iter()
            .filter(|(id, _)| !live.contains(id))
            .map(|(&id, &handle)| (id, handle))
            .collect();
        for (id, handle) in stale {
            self.renderer.remove(handle);
            self.letter_handles.remove(&id);
        }

        self.renderer
            .set_transform(self.basket_handle, Vec2::new(self.state.basket.x, BASKET_Y));
    }
}
