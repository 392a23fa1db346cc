//! Eased fixed-plan delay tables.
//!
//! The whole run is tabulated before the first pulse. Doing the
//! trigonometry and division per step would add jitter far larger than the
//! constant-rate dither.

use core::f32::consts::PI;

use libm::{roundf, sinf};
use serde::Deserialize;

use crate::config::PlanConfig;
use crate::error::{MotionError, Result};

/// Capacity of a profile table in steps.
pub const MAX_PLAN_STEPS: usize = 2400;

/// Speed floor for the sine curve.
const SINE_SPEED_FLOOR: f32 = 0.08;
/// Speed floor for the quadratic curve.
const QUADRATIC_SPEED_FLOOR: f32 = 0.30;

/// Speed curve across a planned run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseShape {
    /// `sin(π·t)`: gentle start and stop.
    #[default]
    Sine,
    /// Two mirrored quadratic ramps meeting at mid-run: shorter, steeper ramps.
    SymmetricQuadratic,
}

impl EaseShape {
    /// Speed factor in `(0, 1]` at normalized position `t` in `[0, 0.5]`.
    ///
    /// Callers mirror the second half onto the first.
    pub fn speed(self, t: f32) -> f32 {
        match self {
            EaseShape::Sine => sinf(PI * t).max(SINE_SPEED_FLOOR),
            EaseShape::SymmetricQuadratic => {
                let u = 2.0 * t;
                let rest = 1.0 - u;
                (1.0 - rest * rest).max(QUADRATIC_SPEED_FLOOR)
            }
        }
    }

    /// Short label for status output.
    pub fn label(self) -> &'static str {
        match self {
            EaseShape::Sine => "SINE",
            EaseShape::SymmetricQuadratic => "QUAD",
        }
    }
}

/// Delay scaling and bounds for a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EaseParams {
    /// Delay at full speed, in microseconds.
    pub peak_delay_us: u32,
    /// Uniform duration multiplier.
    pub time_scale: f32,
    /// Shortest entry.
    pub floor_us: u32,
    /// Longest entry.
    pub ceiling_us: u32,
}

impl EaseParams {
    /// Extract profile parameters from a plan.
    pub fn from_plan(plan: &PlanConfig) -> Self {
        Self {
            peak_delay_us: plan.peak_delay_us,
            time_scale: plan.time_scale,
            floor_us: plan.floor_us,
            ceiling_us: plan.ceiling_us,
        }
    }

    fn normalized(self) -> Self {
        let floor_us = self.floor_us.max(1);
        let time_scale = if self.time_scale.is_finite() && self.time_scale > 0.0 {
            self.time_scale
        } else {
            1.0
        };
        Self {
            peak_delay_us: self.peak_delay_us,
            time_scale,
            floor_us,
            ceiling_us: self.ceiling_us.max(floor_us),
        }
    }
}

/// Table length for a request: whole revolutions, at least one, at most
/// what fits. `None` if a single revolution exceeds the capacity.
fn planned_len(total_steps: u32, per_rev: u32) -> Option<u32> {
    let capacity_revs = MAX_PLAN_STEPS as u32 / per_rev;
    if capacity_revs == 0 {
        return None;
    }
    Some((total_steps / per_rev).clamp(1, capacity_revs) * per_rev)
}

/// Precomputed per-step delays for one complete run.
///
/// Immutable once built; consumed by index.
#[derive(Debug, Clone)]
pub struct EaseProfile {
    delays: heapless::Vec<u32, MAX_PLAN_STEPS>,
    shape: EaseShape,
    params: EaseParams,
    steps_per_revolution: u16,
}

impl EaseProfile {
    /// Tabulate `total_steps` delays along `shape`.
    ///
    /// `total_steps` is normalized to whole revolutions: zero becomes one
    /// revolution, a partial revolution is dropped, and the length is capped
    /// at the table capacity. Bounds and time scale are normalized the same
    /// way.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::ProfileCapacity` if one revolution does not fit.
    pub fn build(
        total_steps: u32,
        shape: EaseShape,
        params: EaseParams,
        steps_per_revolution: u16,
    ) -> Result<Self> {
        let per_rev = steps_per_revolution.max(1) as u32;
        let n = planned_len(total_steps, per_rev).ok_or(MotionError::ProfileCapacity {
            requested: per_rev,
            capacity: MAX_PLAN_STEPS,
        })?;
        let params = params.normalized();
        let last = (n - 1).max(1) as f32;

        let mut delays = heapless::Vec::new();
        for i in 0..n {
            // Mirrored index keeps delay[i] == delay[n - 1 - i] bit for bit.
            let t = i.min(n - 1 - i) as f32 / last;
            let speed = shape.speed(t);
            let delay = roundf(params.peak_delay_us as f32 / speed * params.time_scale);
            let delay = (delay as u32).clamp(params.floor_us, params.ceiling_us);
            // n <= MAX_PLAN_STEPS by construction.
            let _ = delays.push(delay);
        }

        Ok(Self {
            delays,
            shape,
            params,
            steps_per_revolution: per_rev as u16,
        })
    }

    /// Tabulate the run described by a plan.
    pub fn from_plan(plan: &PlanConfig, steps_per_revolution: u16) -> Result<Self> {
        Self::build(
            plan.total_steps(steps_per_revolution),
            plan.shape,
            EaseParams::from_plan(plan),
            steps_per_revolution,
        )
    }

    /// Check whether this table already describes `plan`.
    pub fn matches(&self, plan: &PlanConfig, steps_per_revolution: u16) -> bool {
        self.describes(
            plan.total_steps(steps_per_revolution),
            plan.shape,
            EaseParams::from_plan(plan),
            steps_per_revolution,
        )
    }

    /// Check whether [`build`](Self::build) with these arguments would
    /// produce this table.
    pub fn describes(
        &self,
        total_steps: u32,
        shape: EaseShape,
        params: EaseParams,
        steps_per_revolution: u16,
    ) -> bool {
        let per_rev = steps_per_revolution.max(1);
        self.shape == shape
            && self.steps_per_revolution == per_rev
            && self.params == params.normalized()
            && planned_len(total_steps, per_rev as u32) == Some(self.len() as u32)
    }

    /// Delay for step `index`, if in range.
    #[inline]
    pub fn delay_at(&self, index: usize) -> Option<u32> {
        self.delays.get(index).copied()
    }

    /// All delays in run order.
    #[inline]
    pub fn delays(&self) -> &[u32] {
        &self.delays
    }

    /// Steps in the run.
    #[inline]
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// Check if the table is empty (never true for a built profile).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    /// Whole revolutions in the run.
    #[inline]
    pub fn rotations(&self) -> u32 {
        self.len() as u32 / self.steps_per_revolution as u32
    }

    /// Curve the table was built from.
    #[inline]
    pub fn shape(&self) -> EaseShape {
        self.shape
    }

    /// Normalized parameters the table was built from.
    #[inline]
    pub fn params(&self) -> EaseParams {
        self.params
    }

    /// Steps per revolution the table was built for.
    #[inline]
    pub fn steps_per_revolution(&self) -> u16 {
        self.steps_per_revolution
    }

    /// Sum of all delays in microseconds.
    pub fn total_duration_us(&self) -> u64 {
        self.delays.iter().map(|&d| d as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> EaseParams {
        EaseParams {
            peak_delay_us: 300,
            time_scale: 1.0,
            floor_us: 300,
            ceiling_us: 4000,
        }
    }

    #[test]
    fn test_sine_profile_shape() {
        let profile = EaseProfile::build(1000, EaseShape::Sine, params(), 200).unwrap();

        assert_eq!(profile.len(), 1000);
        assert_eq!(profile.rotations(), 5);
        // Endpoint speed floor 0.08: 300 / 0.08 = 3750.
        assert_eq!(profile.delay_at(0), Some(3750));
        assert_eq!(profile.delay_at(999), Some(3750));
        assert_eq!(profile.delay_at(499), Some(300));
    }

    #[test]
    fn test_quadratic_endpoints() {
        let profile = EaseProfile::build(1200, EaseShape::SymmetricQuadratic, params(), 200).unwrap();

        // Endpoint speed floor 0.30: 300 / 0.3 = 1000.
        assert_eq!(profile.delay_at(0), Some(1000));
        assert_eq!(profile.delay_at(1199), Some(1000));
    }

    #[test]
    fn test_monotone_halves() {
        let profile = EaseProfile::build(1000, EaseShape::Sine, params(), 200).unwrap();
        let delays = profile.delays();
        let mid = delays.len() / 2;

        assert!(delays[..mid].windows(2).all(|w| w[1] <= w[0]));
        assert!(delays[mid..].windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_time_scale_stretches() {
        let slow = EaseParams {
            time_scale: 2.0,
            ..params()
        };
        let profile = EaseProfile::build(200, EaseShape::Sine, slow, 200).unwrap();

        assert_eq!(profile.delay_at(99), Some(600));
        // 300 / 0.08 * 2 = 7500, capped by the ceiling.
        assert_eq!(profile.delay_at(0), Some(4000));
    }

    #[test]
    fn test_step_count_normalized() {
        let zero = EaseProfile::build(0, EaseShape::Sine, params(), 200).unwrap();
        assert_eq!(zero.len(), 200);

        let partial = EaseProfile::build(450, EaseShape::Sine, params(), 200).unwrap();
        assert_eq!(partial.len(), 400);

        let huge = EaseProfile::build(1_000_000, EaseShape::Sine, params(), 200).unwrap();
        assert_eq!(huge.len(), MAX_PLAN_STEPS);
    }

    #[test]
    fn test_revolution_larger_than_capacity() {
        let result = EaseProfile::build(5000, EaseShape::Sine, params(), 5000);
        assert!(result.is_err());
    }

    #[test]
    fn test_matches_plan() {
        let plan = PlanConfig::default();
        let profile = EaseProfile::from_plan(&plan, 200).unwrap();

        assert!(profile.matches(&plan, 200));

        let other = PlanConfig {
            rotations: 6,
            ..plan
        };
        assert!(!profile.matches(&other, 200));
    }
}
