//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, derived from the game seed and round index
//! - Stable iteration order (letters in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, basket_rect, below_miss_line, letter_rect};
pub use spawn::spawn_letters;
pub use state::{Basket, GameState, Letter, RoundEvent, RoundOutcome, RoundPhase};
pub use tick::{TickInput, tick};
