//! Letter spawning
//!
//! Invoked once per Prep -> Falling transition. Produces exactly one target
//! letter and DISTRACTOR_COUNT distractors at shuffled horizontal positions
//! above the top edge of the field.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::consts::*;
use crate::{ALPHABET_LEN, letter_at};

use super::state::{GameState, Letter};

/// Spawn this round's letters into `state.letters`.
///
/// Horizontal positions are drawn within the field width minus SPAWN_MARGIN
/// and shuffled; the first goes to the target, the rest to distractors.
/// Distractor characters are rejection-sampled so none equals the target.
pub fn spawn_letters(state: &mut GameState) {
    let mut rng = state.spawn_rng();

    let half_span = (PLAY_W - SPAWN_MARGIN) / 2.0;
    let mut xs: Vec<f32> = (0..DISTRACTOR_COUNT + 1)
        .map(|_| rng.random_range(-half_span..half_span))
        .collect();
    xs.shuffle(&mut rng);

    let target = state.target;
    let id = state.next_entity_id();
    state.letters.push(Letter {
        id,
        ch: target,
        is_target: true,
        pos: Vec2::new(xs[0], PLAY_H / 2.0 + SPAWN_Y_OFFSET),
        fall_factor: BASE_FALL_SPEED * rng.random_range(0.9..1.3),
    });

    for &x in &xs[1..] {
        let ch = loop {
            let candidate = letter_at(rng.random_range(0..ALPHABET_LEN));
            if candidate != target {
                break candidate;
            }
        };
        let y = PLAY_H / 2.0 + SPAWN_Y_OFFSET + rng.random_range(0.0..SPAWN_Y_JITTER);
        let id = state.next_entity_id();
        state.letters.push(Letter {
            id,
            ch,
            is_target: false,
            pos: Vec2::new(x, y),
            fall_factor: BASE_FALL_SPEED * rng.random_range(0.8..1.3),
        });
    }
}
