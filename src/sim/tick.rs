//! Per-tick simulation advance
//!
//! One call per host frame. Advances the round state machine, moves letters,
//! updates the basket, and resolves catches and misses. A terminal event is
//! returned to the caller instead of being acted on here, so the driver
//! consumes it exactly once.

use super::collision::{basket_rect, below_miss_line, letter_rect};
use super::spawn::spawn_letters;
use super::state::{GameState, RoundEvent, RoundOutcome, RoundPhase};
use crate::consts::*;
use crate::settings::Tunables;

/// Input for a single tick (aggregated upstream, deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Basket target position in field coordinates (sensor-derived)
    pub target_x: f32,
    /// Keyboard steer state
    pub steer_left: bool,
    pub steer_right: bool,
}

/// Advance the simulation by one tick.
///
/// Returns the terminal event if this tick ended the round. The round is
/// already restarted (new target, letters cleared, Prep re-entered) by the
/// time the event is returned.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    tunables: &Tunables,
    dt_ms: f32,
) -> Option<RoundEvent> {
    match state.phase {
        RoundPhase::Prep => {
            state.prep_elapsed_ms += dt_ms;
            if state.prep_elapsed_ms >= PREP_DELAY_MS {
                spawn_letters(state);
                state.phase = RoundPhase::Falling;
            }
            None
        }
        RoundPhase::Falling => {
            // Constant-velocity descent; the live multiplier applies here so
            // tunable changes take effect immediately
            let step = tunables.fall_speed_multiplier * dt_ms * FALL_SCALE;
            for letter in &mut state.letters {
                letter.pos.y -= letter.fall_factor * step;
            }

            // Basket update happens before collision testing: keyboard nudge,
            // then smoothing toward the aggregated target, then clamp
            state.basket.width = tunables.basket_width;
            if input.steer_left {
                state.basket.x -= KEY_STEP;
            }
            if input.steer_right {
                state.basket.x += KEY_STEP;
            }
            state.basket.x += (input.target_x - state.basket.x) * SMOOTH_FACTOR;
            state.basket.clamp_to_field();

            resolve(state)
        }
    }
}

/// Scan letters in spawn order and resolve the first terminal event.
///
/// Distractors that fell past the boundary before the first terminal event
/// are removed silently; everything else is cleared by the round restart.
fn resolve(state: &mut GameState) -> Option<RoundEvent> {
    let catch_zone = basket_rect(&state.basket);

    let mut terminal: Option<(RoundOutcome, Option<char>)> = None;
    let mut fallen: Vec<u32> = Vec::new();

    for letter in &state.letters {
        if letter_rect(letter.pos).overlaps(&catch_zone) {
            let outcome = if letter.is_target {
                RoundOutcome::Correct
            } else {
                RoundOutcome::WrongCatch
            };
            terminal = Some((outcome, Some(letter.ch)));
            break;
        }
        if below_miss_line(letter.pos) {
            if letter.is_target {
                terminal = Some((RoundOutcome::Missed, None));
                break;
            }
            fallen.push(letter.id);
        }
    }

    match terminal {
        Some((outcome, caught)) => {
            state.score += match outcome {
                RoundOutcome::Correct => 1,
                RoundOutcome::WrongCatch | RoundOutcome::Missed => -1,
            };
            let event = RoundEvent {
                outcome,
                target: state.target,
                caught,
                score: state.score,
            };
            state.start_new_round();
            Some(event)
        }
        None => {
            if !fallen.is_empty() {
                state.letters.retain(|l| !fallen.contains(&l.id));
            }
            None
        }
    }
}
