//! Renderer boundary
//!
//! The game never inspects rendering internals: it adds drawables, moves
//! them by handle, and removes them. Handle allocation is the renderer's
//! concern. Failing to initialize a renderer is the only fatal error in the
//! system and must be reported before any frame is scheduled.

use glam::Vec2;
use thiserror::Error;

/// Renderer initialization failure - aborts the session before it starts
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("renderer initialization failed: {0}")]
    Init(String),
}

/// What a drawable represents
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drawable {
    /// A falling letter tile
    Letter { ch: char, is_target: bool },
    /// The player's basket at the given width
    Basket { width: f32 },
}

/// Opaque handle to a drawable owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawHandle(pub u64);

/// Opaque rendering backend
pub trait Renderer {
    /// Create a drawable at the given field position
    fn add(&mut self, drawable: Drawable, pos: Vec2) -> DrawHandle;
    /// Destroy a drawable and release its resources
    fn remove(&mut self, handle: DrawHandle);
    /// Move a drawable
    fn set_transform(&mut self, handle: DrawHandle, pos: Vec2);
    /// Propagate a host window resize
    fn resize(&mut self, width: u32, height: u32);
    /// Present the current frame
    fn present(&mut self);
    /// Release everything; called once on shutdown
    fn dispose(&mut self);
}
