//! Constant-rate step timing.
//!
//! The mean interval is held in Q16.16 fixed point and accumulated step by
//! step; each emitted interval is the difference between successive whole
//! parts of the running total. Rounding error therefore never compounds:
//! after N steps the elapsed base time is within one microsecond of
//! `N * nominal`, the same way a digital differential analyzer distributes
//! error along a line.
//!
//! The accumulator is 32 bits and wraps. Whole parts are compared modulo
//! 2^16, which is exact for any interval below 65 536 µs.

use libm::round;

use crate::config::units::RevsPerSec;
use crate::config::{EngineConfig, RateLimits};

use super::prng::Xorshift32;

/// Fractional bits of the fixed-point format.
pub const FIXED_FRACTION_BITS: u32 = 16;

/// Dither bound as a fraction of the nominal interval.
const JITTER_FRACTION: f64 = 0.0125;
/// Smallest dither bound in microseconds.
const JITTER_MIN_US: u32 = 1;
/// Largest dither bound in microseconds.
const JITTER_MAX_US: u32 = 20;

/// One interval produced by [`TimingState::next_sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSample {
    /// Interval from the accumulator alone.
    pub base_us: u32,
    /// Dither added on top, within `[-jitter_bound_us, +jitter_bound_us]`.
    pub dither_us: i32,
    /// Interval to emit: base plus dither, floored at the minimum pulse width.
    pub interval_us: u32,
}

/// Live fixed-point accumulator state for constant-rate stepping.
///
/// Created at startup with the initial rate, recomputed by [`configure`]
/// whenever the requested rate changes, and advanced once per step.
///
/// [`configure`]: TimingState::configure
#[derive(Debug, Clone)]
pub struct TimingState {
    steps_per_revolution: u16,
    limits: RateLimits,
    min_interval_us: u32,
    dither: bool,

    nominal_interval_us: f64,
    nominal_interval_fixed: u32,
    accumulated_fixed: u32,
    accumulated_whole_us: u16,
    jitter_bound_us: u32,
    prng: Xorshift32,
    applied_rate: RevsPerSec,
}

impl TimingState {
    /// Create timing state from raw parameters and configure it for `rate`.
    ///
    /// `min_interval_us` is the electrical floor for any emitted interval,
    /// normally the STEP pulse width.
    pub fn new(
        steps_per_revolution: u16,
        limits: RateLimits,
        min_interval_us: u32,
        rate: RevsPerSec,
    ) -> Self {
        let mut state = Self {
            steps_per_revolution,
            limits,
            min_interval_us,
            dither: true,
            nominal_interval_us: 0.0,
            nominal_interval_fixed: 0,
            accumulated_fixed: 0,
            accumulated_whole_us: 0,
            jitter_bound_us: JITTER_MIN_US,
            prng: Xorshift32::default(),
            applied_rate: limits.min,
        };
        state.configure(rate);
        state
    }

    /// Create timing state from engine configuration at its initial rate.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.steps_per_revolution,
            config.rate_limits(),
            config.pulse_width_us as u32,
            config.initial_rate,
        )
        .with_dither(config.dither)
    }

    /// Enable or disable dither. The generator advances either way so the
    /// base sequence is unaffected.
    pub fn with_dither(mut self, dither: bool) -> Self {
        self.dither = dither;
        self
    }

    /// Replace the dither generator.
    pub fn with_generator(mut self, prng: Xorshift32) -> Self {
        self.prng = prng;
        self
    }

    /// Recompute timing for a new rate.
    ///
    /// The rate is clamped into the configured range (zero becomes the
    /// minimum), the accumulator restarts from zero, and the dither bound
    /// is derived from the unrounded interval so it tracks true speed.
    pub fn configure(&mut self, rate: RevsPerSec) {
        let rate = self.limits.clamp(rate);
        let nominal = rate
            .nominal_interval_us(self.steps_per_revolution)
            .unwrap_or(u16::MAX as f64);

        self.nominal_interval_us = nominal;
        // Float-to-int `as` saturates, so an unvalidated slow rate pins at u32::MAX.
        self.nominal_interval_fixed = round(nominal * (1u32 << FIXED_FRACTION_BITS) as f64) as u32;
        self.accumulated_fixed = 0;
        self.accumulated_whole_us = 0;
        self.jitter_bound_us =
            (round(nominal * JITTER_FRACTION) as u32).clamp(JITTER_MIN_US, JITTER_MAX_US);
        self.applied_rate = rate;
    }

    /// Check whether `requested` differs from the rate last applied.
    #[inline]
    pub fn needs_reconfigure(&self, requested: RevsPerSec) -> bool {
        self.limits.clamp(requested) != self.applied_rate
    }

    /// Produce the next interval, advancing the accumulator and generator.
    pub fn next_sample(&mut self) -> IntervalSample {
        self.accumulated_fixed = self.accumulated_fixed.wrapping_add(self.nominal_interval_fixed);
        let target_whole = (self.accumulated_fixed >> FIXED_FRACTION_BITS) as u16;
        let base_us = target_whole.wrapping_sub(self.accumulated_whole_us) as u32;
        self.accumulated_whole_us = target_whole;

        let jitter = self.prng.next_symmetric(self.jitter_bound_us);
        let dither_us = if self.dither { jitter } else { 0 };

        let interval = (base_us as i64 + dither_us as i64).max(self.min_interval_us as i64);

        IntervalSample {
            base_us,
            dither_us,
            interval_us: interval as u32,
        }
    }

    /// Produce the next interval to emit, in microseconds.
    #[inline]
    pub fn next_interval(&mut self) -> u32 {
        self.next_sample().interval_us
    }

    /// Rate this state was last configured for.
    #[inline]
    pub fn applied_rate(&self) -> RevsPerSec {
        self.applied_rate
    }

    /// Selectable rate range.
    #[inline]
    pub fn limits(&self) -> RateLimits {
        self.limits
    }

    /// Mean interval in Q16.16 microseconds.
    #[inline]
    pub fn nominal_interval_fixed(&self) -> u32 {
        self.nominal_interval_fixed
    }

    /// Mean interval in microseconds, before fixed-point rounding.
    #[inline]
    pub fn nominal_interval_us(&self) -> f64 {
        self.nominal_interval_us
    }

    /// Largest dither magnitude in microseconds.
    #[inline]
    pub fn jitter_bound_us(&self) -> u32 {
        self.jitter_bound_us
    }

    /// Smallest interval ever emitted.
    #[inline]
    pub fn min_interval_us(&self) -> u32 {
        self.min_interval_us
    }

    /// Raw accumulator value.
    #[inline]
    pub fn accumulated_fixed(&self) -> u32 {
        self.accumulated_fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(rate: u8) -> TimingState {
        TimingState::new(200, RateLimits::new(RevsPerSec(1), RevsPerSec(5)), 10, RevsPerSec(rate))
    }

    #[test]
    fn test_five_rps_is_exact() {
        let mut timing = state(5);

        assert_eq!(timing.nominal_interval_fixed(), 1000 << 16);
        assert_eq!(timing.jitter_bound_us(), 13);

        let total: u64 = (0..1000).map(|_| timing.next_sample().base_us as u64).sum();
        assert_eq!(total, 1_000_000);
    }

    #[test]
    fn test_fractional_interval_distributes_error() {
        // 3 RPS: 1666.67 us per step, emitted as a 1667/1667/1666 pattern.
        let mut timing = state(3);
        let intervals: [u32; 3] = core::array::from_fn(|_| timing.next_sample().base_us);

        assert_eq!(intervals.iter().sum::<u32>(), 5000);
        assert!(intervals.iter().all(|&i| i == 1666 || i == 1667));
    }

    #[test]
    fn test_rate_clamped() {
        let mut timing = state(5);

        timing.configure(RevsPerSec(0));
        assert_eq!(timing.applied_rate(), RevsPerSec(1));

        timing.configure(RevsPerSec(200));
        assert_eq!(timing.applied_rate(), RevsPerSec(5));
    }

    #[test]
    fn test_jitter_bound_clamped() {
        // 1 RPS: 5000 us * 1.25% = 62.5, clamped to 20.
        assert_eq!(state(1).jitter_bound_us(), 20);
    }

    #[test]
    fn test_configure_resets_accumulator() {
        let mut timing = state(3);
        timing.next_interval();
        assert_ne!(timing.accumulated_fixed(), 0);

        timing.configure(RevsPerSec(4));
        assert_eq!(timing.accumulated_fixed(), 0);
    }

    #[test]
    fn test_needs_reconfigure() {
        let timing = state(5);

        assert!(!timing.needs_reconfigure(RevsPerSec(5)));
        assert!(!timing.needs_reconfigure(RevsPerSec(9)));
        assert!(timing.needs_reconfigure(RevsPerSec(2)));
    }

    #[test]
    fn test_accumulator_wraps_without_drift() {
        // 1666.67 us per step overflows 32 bits after ~39 steps.
        let mut timing = state(3);
        let total: u64 = (0..3000).map(|_| timing.next_sample().base_us as u64).sum();
        assert_eq!(total, 5_000_000);
    }

    #[test]
    fn test_dither_disabled() {
        let mut timing = state(2).with_dither(false);
        for _ in 0..100 {
            let sample = timing.next_sample();
            assert_eq!(sample.dither_us, 0);
            assert_eq!(sample.interval_us, sample.base_us);
        }
    }

    #[test]
    fn test_floor_at_min_interval() {
        // A floor above the nominal interval clamps every emitted value.
        let mut timing =
            TimingState::new(200, RateLimits::new(RevsPerSec(1), RevsPerSec(5)), 1500, RevsPerSec(5));
        for _ in 0..100 {
            assert_eq!(timing.next_interval(), 1500);
        }
    }

    #[test]
    fn test_deterministic_sequence() {
        let mut a = state(4);
        let mut b = state(4);
        for _ in 0..500 {
            assert_eq!(a.next_sample(), b.next_sample());
        }
    }
}
