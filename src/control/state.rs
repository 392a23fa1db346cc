//! Control-loop states.

/// Where the control loop is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    /// Applying the current request: timing recomputed or profile built.
    #[default]
    Idle,
    /// Interactive mode: one step per tick at the selected rate.
    RunningConstantRate,
    /// A precomputed eased run, executed to completion in one tick.
    RunningPlan,
    /// Showing completion status between plan runs.
    DisplayPause,
}

impl ControlState {
    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            ControlState::Idle => "idle",
            ControlState::RunningConstantRate => "constant_rate",
            ControlState::RunningPlan => "plan",
            ControlState::DisplayPause => "display_pause",
        }
    }

    /// Check if the motor is being stepped in this state.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, ControlState::RunningConstantRate | ControlState::RunningPlan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(ControlState::default(), ControlState::Idle);
        assert!(!ControlState::Idle.is_running());
        assert!(ControlState::RunningPlan.is_running());
        assert_eq!(ControlState::DisplayPause.name(), "display_pause");
    }
}
