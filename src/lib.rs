//! Letterfall - a letter-catching game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (round state machine, spawning, collisions)
//! - `input`: Hand-sensor + keyboard aggregation into a basket target
//! - `renderer`: Opaque drawable boundary consumed by the host
//! - `audio` / `announce`: Fire-and-forget feedback boundaries
//! - `telemetry`: Append-only round history
//! - `settings`: Live-tunable parameters
//! - `game`: Frame driver wiring the above together

pub mod announce;
pub mod audio;
pub mod game;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod telemetry;

pub use game::{Game, Key, Ports};
pub use settings::Tunables;

/// Game configuration constants
pub mod consts {
    /// Play-field width in field units
    pub const PLAY_W: f32 = 900.0;
    /// Play-field height in field units
    pub const PLAY_H: f32 = 600.0;

    /// Delay between target selection and spawn (ms)
    pub const PREP_DELAY_MS: f32 = 5000.0;
    /// Distractor letters spawned alongside the target
    pub const DISTRACTOR_COUNT: usize = 2;

    /// Letter hitbox edge length (square, centered on the letter)
    pub const LETTER_HITBOX: f32 = 110.0;
    /// Horizontal spawn margin - one entity width kept clear of the edges
    pub const SPAWN_MARGIN: f32 = 160.0;
    /// Spawn height above the top edge
    pub const SPAWN_Y_OFFSET: f32 = 120.0;
    /// Extra randomized spawn height for distractors
    pub const SPAWN_Y_JITTER: f32 = 80.0;

    /// Basket height
    pub const BASKET_HEIGHT: f32 = 28.0;
    /// Vertical slot of the basket (fixed)
    pub const BASKET_Y: f32 = -PLAY_H / 2.0 + 80.0;
    /// Default basket width
    pub const BASKET_DEFAULT_WIDTH: f32 = 220.0;

    /// Letters below -PLAY_H/2 - MISS_MARGIN have left the field
    pub const MISS_MARGIN: f32 = 140.0;

    /// Base fall speed, scaled per entity and by the live multiplier
    pub const BASE_FALL_SPEED: f32 = 1.0;
    /// Units fallen per speed unit per millisecond
    pub const FALL_SCALE: f32 = 0.06;

    /// Per-tick keyboard nudge in field units
    pub const KEY_STEP: f32 = 8.0;
    /// Fraction of the remaining distance the basket covers per tick
    pub const SMOOTH_FACTOR: f32 = 0.18;

    /// Delta time assumed on the first frame (ms)
    pub const DEFAULT_DT_MS: f32 = 16.0;
    /// Frame delta clamp (ms) to prevent tunneling after a stall
    pub const MAX_DT_MS: f32 = 100.0;
}

/// Number of letters in the alphabet
pub const ALPHABET_LEN: u8 = 26;

/// Map an index in 0..26 to 'A'..='Z'
#[inline]
pub fn letter_at(index: u8) -> char {
    debug_assert!(index < ALPHABET_LEN);
    (b'A' + index) as char
}

/// Clamp a normalized coordinate to [0, 1]
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
