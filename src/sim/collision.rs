//! Collision detection for the catching game
//!
//! Letters and the basket are axis-aligned rectangles in field units.
//! Overlap is half-open on all sides: rectangles that merely share an edge
//! do not collide.

use glam::Vec2;

use crate::consts::*;

use super::state::Basket;

/// An axis-aligned rectangle (origin at the lower-left corner)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Half-open overlap test; shared edges count as a miss
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Hitbox of a letter centered on its position
#[inline]
pub fn letter_rect(pos: Vec2) -> Rect {
    Rect {
        x: pos.x - LETTER_HITBOX / 2.0,
        y: pos.y - LETTER_HITBOX / 2.0,
        w: LETTER_HITBOX,
        h: LETTER_HITBOX,
    }
}

/// Catch area of the basket at its fixed vertical slot
#[inline]
pub fn basket_rect(basket: &Basket) -> Rect {
    Rect {
        x: basket.x - basket.width / 2.0,
        y: BASKET_Y,
        w: basket.width,
        h: BASKET_HEIGHT,
    }
}

/// Whether a letter has fallen past the lower boundary
#[inline]
pub fn below_miss_line(pos: Vec2) -> bool {
    pos.y < -PLAY_H / 2.0 - MISS_MARGIN
}
