//! Plan execution - walks an ease table step by step.

use super::ease::EaseProfile;
use super::request::Direction;

/// Runtime cursor over an [`EaseProfile`].
///
/// Yields one delay per step in run order; the table itself is never
/// touched, so a cursor can be restarted or a second one created for the
/// return run.
#[derive(Debug, Clone)]
pub struct PlanExecutor<'a> {
    /// The table being executed.
    profile: &'a EaseProfile,

    /// Next step to emit (0 to total_steps).
    current_step: usize,

    /// Direction of this run.
    direction: Direction,
}

impl<'a> PlanExecutor<'a> {
    /// Create an executor at the start of a run.
    pub fn new(profile: &'a EaseProfile, direction: Direction) -> Self {
        Self {
            profile,
            current_step: 0,
            direction,
        }
    }

    /// Create an executor that continues a run from `step`.
    pub fn resume(profile: &'a EaseProfile, direction: Direction, step: usize) -> Self {
        Self {
            profile,
            current_step: step.min(profile.len()),
            direction,
        }
    }

    /// Check if every step has been emitted.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.current_step >= self.profile.len()
    }

    /// Number of steps already taken.
    #[inline]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Get the total number of steps.
    #[inline]
    pub fn total_steps(&self) -> usize {
        self.profile.len()
    }

    /// Get steps remaining.
    #[inline]
    pub fn steps_remaining(&self) -> usize {
        self.profile.len().saturating_sub(self.current_step)
    }

    /// Direction of this run.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whole revolutions finished so far.
    #[inline]
    pub fn completed_revolutions(&self) -> u32 {
        (self.current_step / self.profile.steps_per_revolution() as usize) as u32
    }

    /// Get the profile being executed.
    #[inline]
    pub fn profile(&self) -> &EaseProfile {
        self.profile
    }

    /// Reset the executor to the beginning.
    pub fn reset(&mut self) {
        self.current_step = 0;
    }

    /// Get progress as a fraction (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.profile.is_empty() {
            1.0
        } else {
            self.current_step as f32 / self.profile.len() as f32
        }
    }
}

impl Iterator for PlanExecutor<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let delay = self.profile.delay_at(self.current_step)?;
        self.current_step += 1;
        Some(delay)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps_remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PlanExecutor<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{EaseParams, EaseShape};

    fn profile() -> EaseProfile {
        let params = EaseParams {
            peak_delay_us: 300,
            time_scale: 1.0,
            floor_us: 300,
            ceiling_us: 4000,
        };
        EaseProfile::build(400, EaseShape::Sine, params, 200).unwrap()
    }

    #[test]
    fn test_executor_complete() {
        let profile = profile();
        let mut executor = PlanExecutor::new(&profile, Direction::Clockwise);

        assert!(!executor.is_complete());
        assert_eq!(executor.len(), 400);

        let emitted: u64 = executor.by_ref().map(|d| d as u64).sum();

        assert!(executor.is_complete());
        assert_eq!(executor.current_step(), 400);
        assert_eq!(executor.completed_revolutions(), 2);
        assert_eq!(emitted, profile.total_duration_us());
        assert_eq!(executor.next(), None);
    }

    #[test]
    fn test_revolution_boundaries() {
        let profile = profile();
        let mut executor = PlanExecutor::new(&profile, Direction::CounterClockwise);

        executor.by_ref().take(199).for_each(drop);
        assert_eq!(executor.completed_revolutions(), 0);
        executor.next();
        assert_eq!(executor.completed_revolutions(), 1);
        assert!((executor.progress() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_reset() {
        let profile = profile();
        let mut executor = PlanExecutor::new(&profile, Direction::Clockwise);
        executor.by_ref().for_each(drop);

        executor.reset();
        assert_eq!(executor.steps_remaining(), 400);
        assert_eq!(executor.next(), profile.delay_at(0));
    }

    #[test]
    fn test_resume_mid_run() {
        let profile = profile();
        let mut executor = PlanExecutor::resume(&profile, Direction::Clockwise, 150);

        assert_eq!(executor.len(), 250);
        assert_eq!(executor.next(), profile.delay_at(150));
        assert_eq!(PlanExecutor::resume(&profile, Direction::Clockwise, 999).len(), 0);
    }
}
