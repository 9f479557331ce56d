//! Audio cue boundary
//!
//! Cues are fire-and-forget: the tick loop never waits on playback, and an
//! unavailable audio backend is not an error - implementations swallow
//! failures silently.

/// Catch feedback cue kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    /// Target letter caught
    Correct,
    /// Distractor caught
    Wrong,
}

/// Fire-and-forget cue player
pub trait CuePlayer {
    fn play(&mut self, kind: CueKind);
}

/// Cue player that discards everything (audio unavailable)
#[derive(Debug, Default)]
pub struct NullCues;

impl CuePlayer for NullCues {
    fn play(&mut self, _kind: CueKind) {}
}
