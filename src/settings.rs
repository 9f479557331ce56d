//! Live-tunable game parameters
//!
//! A snapshot is polled once per frame; out-of-range values clamp to the
//! nearest bound instead of being rejected.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Sensitivity bounds
pub const SENSITIVITY_MIN: f32 = 0.2;
pub const SENSITIVITY_MAX: f32 = 2.0;
/// Basket width bounds
pub const BASKET_WIDTH_MIN: f32 = 80.0;
pub const BASKET_WIDTH_MAX: f32 = 380.0;
/// Fall-speed multiplier bounds
pub const FALL_SPEED_MIN: f32 = 0.3;
pub const FALL_SPEED_MAX: f32 = 3.0;

/// Tunable parameters read every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tunables {
    /// Hand-position to basket-position gain
    pub sensitivity: f32,
    /// Basket collision width in field units
    pub basket_width: f32,
    /// Multiplier applied to every letter's fall speed
    pub fall_speed_multiplier: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            sensitivity: 0.9,
            basket_width: crate::consts::BASKET_DEFAULT_WIDTH,
            fall_speed_multiplier: 1.0,
        }
    }
}

impl Tunables {
    /// Clamp every field to its valid range
    pub fn clamped(self) -> Self {
        Self {
            sensitivity: self.sensitivity.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX),
            basket_width: self.basket_width.clamp(BASKET_WIDTH_MIN, BASKET_WIDTH_MAX),
            fall_speed_multiplier: self
                .fall_speed_multiplier
                .clamp(FALL_SPEED_MIN, FALL_SPEED_MAX),
        }
    }
}

/// Source of the per-tick tunable snapshot
pub trait TunableSource {
    fn snapshot(&self) -> Tunables;
}

/// Fixed tunables for headless runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTunables(pub Tunables);

impl TunableSource for FixedTunables {
    fn snapshot(&self) -> Tunables {
        self.0
    }
}

/// Tunables shared with a UI thread; the game polls, the UI writes
#[derive(Debug, Clone, Default)]
pub struct SharedTunables {
    inner: Arc<Mutex<Tunables>>,
}

impl SharedTunables {
    pub fn new(tunables: Tunables) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tunables)),
        }
    }

    /// Writer-side handle (clone freely)
    pub fn set(&self, tunables: Tunables) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = tunables;
        }
    }
}

impl TunableSource for SharedTunables {
    fn snapshot(&self) -> Tunables {
        self.inner
            .lock()
            .map(|guard| *guard)
            .unwrap_or_default()
    }
}
