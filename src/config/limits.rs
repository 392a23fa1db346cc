//! Rate range limits.

use super::units::RevsPerSec;

/// Inclusive range of selectable rates.
///
/// Out-of-range requests are clamped, never rejected: the device has no
/// channel to report a refused request beyond its status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    /// Slowest selectable rate (never zero once normalized).
    pub min: RevsPerSec,
    /// Fastest selectable rate.
    pub max: RevsPerSec,
}

impl RateLimits {
    /// Create rate limits, normalizing a zero minimum to one and an inverted
    /// range to a single point at `min`.
    pub fn new(min: RevsPerSec, max: RevsPerSec) -> Self {
        let min = RevsPerSec(min.0.max(1));
        let max = if max < min { min } else { max };
        Self { min, max }
    }

    /// Check if limits are valid as written (1 <= min <= max).
    pub fn is_valid(&self) -> bool {
        self.min.0 >= 1 && self.min <= self.max
    }

    /// Clamp a rate into the range.
    pub fn clamp(&self, rate: RevsPerSec) -> RevsPerSec {
        if rate < self.min {
            self.min
        } else if rate > self.max {
            self.max
        } else {
            rate
        }
    }

    /// The rate selected after `rate` by one button press: one step up,
    /// wrapping from the maximum back to the minimum.
    pub fn next_cyclic(&self, rate: RevsPerSec) -> RevsPerSec {
        if rate >= self.max {
            self.min
        } else {
            self.clamp(RevsPerSec(rate.0 + 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> RateLimits {
        RateLimits::new(RevsPerSec(1), RevsPerSec(5))
    }

    #[test]
    fn test_rate_clamp() {
        let limits = limits();

        assert_eq!(limits.clamp(RevsPerSec(0)), RevsPerSec(1));
        assert_eq!(limits.clamp(RevsPerSec(3)), RevsPerSec(3));
        assert_eq!(limits.clamp(RevsPerSec(9)), RevsPerSec(5));
    }

    #[test]
    fn test_cyclic_advance_wraps() {
        let limits = limits();
        let mut rate = RevsPerSec(5);
        let mut seen = [0u8; 6];

        for slot in seen.iter_mut() {
            rate = limits.next_cyclic(rate);
            *slot = rate.0;
        }

        assert_eq!(seen, [1, 2, 3, 4, 5, 1]);
    }

    #[test]
    fn test_cyclic_advance_from_below_range() {
        assert_eq!(limits().next_cyclic(RevsPerSec(0)), RevsPerSec(1));
    }

    #[test]
    fn test_normalization() {
        let limits = RateLimits::new(RevsPerSec(0), RevsPerSec(0));
        assert_eq!(limits.min, RevsPerSec(1));
        assert_eq!(limits.max, RevsPerSec(1));
        assert!(limits.is_valid());
    }
}
