//! Open-loop position tracking.
//!
//! Counts emitted steps; nothing here is measured.

use crate::config::units::Steps;

/// Motor position tracker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    /// Signed steps emitted since power-on.
    steps: Steps,
}

impl Position {
    /// Create a new position tracker at the origin.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Move by a number of steps.
    #[inline]
    pub fn move_steps(&mut self, delta: i64) {
        self.steps = Steps(self.steps.0.wrapping_add(delta));
    }
}
