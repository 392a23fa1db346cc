//! Unit types for physical quantities.
//!
//! Keeps rotational rates and step counts apart from raw integers so a
//! rate is never passed where a step count or a microsecond value is meant.

use serde::Deserialize;

/// Microseconds in one second.
pub const MICROS_PER_SEC: u32 = 1_000_000;

/// Rotational rate in whole revolutions per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(transparent)]
pub struct RevsPerSec(pub u8);

impl RevsPerSec {
    /// Create a new RevsPerSec value.
    #[inline]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Step frequency for a motor with `steps_per_revolution` full steps.
    #[inline]
    pub fn steps_per_sec(self, steps_per_revolution: u16) -> u32 {
        self.0 as u32 * steps_per_revolution as u32
    }

    /// Exact mean microseconds between steps, before any rounding.
    ///
    /// Returns `None` for a zero step frequency.
    pub fn nominal_interval_us(self, steps_per_revolution: u16) -> Option<f64> {
        let steps_per_sec = self.steps_per_sec(steps_per_revolution);
        if steps_per_sec == 0 {
            None
        } else {
            Some(MICROS_PER_SEC as f64 / steps_per_sec as f64)
        }
    }
}

/// Open-loop motor position in steps (signed, from power-on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Steps(pub i64);

impl Steps {
    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to RevsPerSec.
    fn rps(self) -> RevsPerSec;
}

impl UnitExt for u8 {
    #[inline]
    fn rps(self) -> RevsPerSec {
        RevsPerSec(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_per_sec() {
        assert_eq!(5u8.rps().steps_per_sec(200), 1000);
        assert_eq!(0u8.rps().steps_per_sec(200), 0);
    }

    #[test]
    fn test_nominal_interval() {
        let interval = 3u8.rps().nominal_interval_us(200).unwrap();
        assert!((interval - 1666.666_666).abs() < 0.001);
        assert!(0u8.rps().nominal_interval_us(200).is_none());
    }
}
