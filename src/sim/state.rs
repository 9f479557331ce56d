//! Game state and core simulation types
//!
//! Everything needed to replay a session deterministically lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{ALPHABET_LEN, letter_at};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Target announced, waiting out the pre-round delay; no letters exist
    Prep,
    /// Letters are descending and may be caught or missed
    Falling,
}

/// A falling letter entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Letter {
    pub id: u32,
    pub ch: char,
    pub is_target: bool,
    pub pos: Vec2,
    /// Per-entity speed factor drawn at spawn; the live fall-speed
    /// multiplier is applied on top of this at movement time
    pub fall_factor: f32,
}

/// The player's basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    /// Horizontal center, clamped so the basket stays inside the field
    pub x: f32,
    /// Collision width, tracks the live tunable
    pub width: f32,
}

impl Default for Basket {
    fn default() -> Self {
        Self {
            x: 0.0,
            width: BASKET_DEFAULT_WIDTH,
        }
    }
}

impl Basket {
    /// Clamp the center so both edges stay within the field
    pub fn clamp_to_field(&mut self) {
        let limit = PLAY_W / 2.0 - self.width / 2.0;
        self.x = self.x.clamp(-limit, limit);
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The target letter landed in the basket
    Correct,
    /// A distractor landed in the basket
    WrongCatch,
    /// The target fell past the miss boundary
    Missed,
}

impl RoundOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundOutcome::Correct => "correct",
            RoundOutcome::WrongCatch => "wrong_catch",
            RoundOutcome::Missed => "missed",
        }
    }
}

/// Terminal event returned by the resolver, consumed once by the driver
#[derive(Debug, Clone, PartialEq)]
pub struct RoundEvent {
    pub outcome: RoundOutcome,
    /// Target of the round that just ended
    pub target: char,
    /// Character actually caught, when the outcome involved a catch
    pub caught: Option<char>,
    /// Session score after the event was applied
    pub score: i64,
}

/// Salt for the target-selection RNG stream
const TARGET_STREAM: u64 = 0x54;
/// Salt for the spawn RNG stream
const SPAWN_STREAM: u64 = 0x5350;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Rounds started so far (0-based; selects the per-round RNG stream)
    pub round_index: u64,
    /// Current phase
    pub phase: RoundPhase,
    /// Time accumulated in Prep (ms)
    pub prep_elapsed_ms: f32,
    /// The letter the player must catch this round
    pub target: char,
    /// Session score; +1 correct, -1 wrong catch or miss
    pub score: i64,
    /// Live letters in spawn order
    pub letters: Vec<Letter>,
    /// The player's basket
    pub basket: Basket,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session in Prep with a freshly chosen target
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            round_index: 0,
            phase: RoundPhase::Prep,
            prep_elapsed_ms: 0.0,
            target: 'A',
            score: 0,
            letters: Vec::new(),
            basket: Basket::default(),
            next_id: 1,
        };
        state.target = state.pick_target();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Per-round RNG stream derived from the seed and round index, so state
    /// stays serializable without carrying live RNG internals
    pub fn round_rng(&self, stream: u64) -> Pcg32 {
        let mixed = self
            .seed
            .wrapping_add(self.round_index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Pcg32::seed_from_u64(mixed ^ stream)
    }

    /// Draw this round's target uniformly from the alphabet
    fn pick_target(&self) -> char {
        let mut rng = self.round_rng(TARGET_STREAM);
        letter_at(rng.random_range(0..ALPHABET_LEN))
    }

    /// RNG stream for this round's spawn draws
    pub fn spawn_rng(&self) -> Pcg32 {
        self.round_rng(SPAWN_STREAM)
    }

    /// End the current round: clear all letters, choose a new target, and
    /// re-enter Prep with the delay restarted
    pub fn start_new_round(&mut self) {
        self.letters.clear();
        self.round_index += 1;
        self.target = self.pick_target();
        self.phase = RoundPhase::Prep;
        self.prep_elapsed_ms = 0.0;
    }
}
