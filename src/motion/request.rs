//! Operator motion intent.

use serde::Deserialize;

use crate::config::units::RevsPerSec;

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Clockwise (positive step count).
    #[default]
    Clockwise,
    /// Counter-clockwise (negative step count).
    CounterClockwise,
}

impl Direction {
    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Short label for status output.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Clockwise => "CW",
            Direction::CounterClockwise => "CCW",
        }
    }
}

/// What the operator asked the engine to do.
///
/// Immutable once issued; a new request replaces the previous one wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionRequest {
    /// Run continuously at a fixed rate, in the configured direction.
    ConstantRate {
        /// Requested rate (clamped to the configured range when applied).
        rps: RevsPerSec,
    },
    /// Run a precomputed eased profile of `total_steps`.
    FixedPlan {
        /// Steps in the plan (normalized to whole revolutions when built).
        total_steps: u32,
        /// Direction of the first run.
        direction: Direction,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_reverse() {
        assert_eq!(Direction::Clockwise.reversed(), Direction::CounterClockwise);
        assert_eq!(Direction::CounterClockwise.reversed().sign(), 1);
    }
}
