//! Input aggregation
//!
//! Merges the hand sensor's last reported horizontal position with keyboard
//! steering into a single basket target. The sensor delivers updates
//! out-of-band from the tick loop; only the latest value is kept, and the
//! tick loop reads it without blocking. A stale or absent reading is not an
//! error - the aggregator falls back to the field center.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use thiserror::Error;

use crate::clamp01;
use crate::consts::PLAY_W;

/// Hand sensor failure; the game degrades to keyboard-only control
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("hand sensor unavailable: {0}")]
    Unavailable(String),
}

/// Hand-tracking state for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandStatus {
    /// No sensor report received yet
    Init,
    /// Sensor has a valid detection
    Tracking,
    /// Sensor is running but has lost the hand
    Searching,
    /// Sensor failed to start or died mid-session
    Unavailable,
}

impl HandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandStatus::Init => "INIT",
            HandStatus::Tracking => "ON",
            HandStatus::Searching => "SEARCHING",
            HandStatus::Unavailable => "OFF",
        }
    }
}

#[derive(Debug, Default)]
struct HandShared {
    /// f32 bits of the last mirrored position; valid only once `seen` is set
    norm_bits: AtomicU32,
    /// A locked report has arrived at least once
    seen: AtomicBool,
    /// Any report has arrived at least once
    reported: AtomicBool,
    /// Current detection validity
    locked: AtomicBool,
    /// Sensor failed; keyboard-only from here on
    unavailable: AtomicBool,
}

/// Shared last-known hand position.
///
/// Clones share state: hand one clone to the sensor feed, keep another in
/// the tick loop. Writes are single atomic stores; reads never block.
#[derive(Debug, Clone, Default)]
pub struct HandTracker {
    inner: Arc<HandShared>,
}

impl HandTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sensor-side entry point. `raw_norm` is the sensor's horizontal
    /// fraction in [0, 1]; the mirror policy (sensor-left maps to
    /// screen-right) is applied here, storing `1 - raw_norm`. Unlocked
    /// reports keep the last known value.
    pub fn report(&self, raw_norm: f32, locked: bool) {
        self.inner.reported.store(true, Ordering::Relaxed);
        self.inner.locked.store(locked, Ordering::Relaxed);
        if locked {
            let mirrored = clamp01(1.0 - raw_norm);
            self.inner
                .norm_bits
                .store(mirrored.to_bits(), Ordering::Relaxed);
            self.inner.seen.store(true, Ordering::Relaxed);
        }
    }

    /// Mark the sensor as dead for the rest of the session
    pub fn set_unavailable(&self) {
        self.inner.unavailable.store(true, Ordering::Relaxed);
    }

    /// Last known mirrored position, or the field center before any
    /// locked report has arrived
    pub fn normalized(&self) -> f32 {
        if self.inner.seen.load(Ordering::Relaxed) {
            f32::from_bits(self.inner.norm_bits.load(Ordering::Relaxed))
        } else {
            0.5
        }
    }

    pub fn status(&self) -> HandStatus {
        if self.inner.unavailable.load(Ordering::Relaxed) {
            HandStatus::Unavailable
        } else if self.inner.locked.load(Ordering::Relaxed) {
            HandStatus::Tracking
        } else if self.inner.reported.load(Ordering::Relaxed) {
            HandStatus::Searching
        } else {
            HandStatus::Init
        }
    }
}

/// Hand-position source. `subscribe` hands the feed a tracker clone to
/// write into; `stop` tears the feed down on shutdown.
pub trait HandSensor {
    fn subscribe(&mut self, tracker: HandTracker) -> Result<(), SensorError>;
    fn stop(&mut self);
}

/// Sensor that is never available; sessions degrade to keyboard-only
#[derive(Debug, Default)]
pub struct NoSensor;

impl HandSensor for NoSensor {
    fn subscribe(&mut self, _tracker: HandTracker) -> Result<(), SensorError> {
        Err(SensorError::Unavailable("no sensor configured".into()))
    }

    fn stop(&mut self) {}
}

/// Keyboard actions the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Steer the basket left
    Left,
    /// Steer the basket right
    Right,
    /// Re-announce the current target
    Repeat,
}

/// Held-key state fed by host key-down/key-up events
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Repeat => {}
        }
    }
}

/// Convert a mirrored normalized position to a basket target in field
/// coordinates
#[inline]
pub fn basket_target(norm: f32, sensitivity: f32) -> f32 {
    (norm - 0.5) * PLAY_W * sensitivity
}
