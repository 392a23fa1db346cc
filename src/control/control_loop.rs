//! The cooperative control loop.
//!
//! One owner drives everything: button polling, timing updates, display
//! refreshes and step emission all happen on the caller's thread, in an
//! order that keeps blocking I/O out of any pulse train.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::units::RevsPerSec;
use crate::config::EngineConfig;
use crate::display::{DisplayAdapter, StatusDisplay};
use crate::error::Result;
use crate::input::Button;
use crate::motion::{Direction, EaseParams, EaseProfile, MotionRequest, PlanExecutor, TimingState};
use crate::motor::{Housekeeping, StepPulseDriver};

use super::clock::MonotonicClock;
use super::state::ControlState;

/// What the status display currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Blank,
    Speed(RevsPerSec),
    PlanStart { rotations: u32, direction: Direction },
    PlanComplete,
}

/// Drives the motor from button input and the active [`MotionRequest`].
///
/// Constant-rate mode emits one step per [`tick`](Self::tick) and samples
/// the button between steps. Plan mode runs a whole eased profile inside a
/// single tick, then pauses on a completion screen.
pub struct ControlLoop<STEP, DIR, DELAY, HK, BTN, CLK, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    HK: Housekeeping,
    BTN: InputPin,
    CLK: MonotonicClock,
    D: DisplayAdapter,
{
    config: EngineConfig,
    driver: StepPulseDriver<STEP, DIR, DELAY, HK>,
    button: Button<BTN>,
    clock: CLK,
    status: StatusDisplay<D>,
    timing: TimingState,
    profile: Option<EaseProfile>,
    request: MotionRequest,
    state: ControlState,

    /// Rate chosen by the operator in constant-rate mode.
    selected_rate: RevsPerSec,
    screen: Screen,
    /// Direction of the current or next plan run.
    plan_direction: Direction,
    /// Next step of the current plan run; survives a failed tick.
    plan_step: usize,
    /// Plan finished without reversal; Idle waits for a press.
    awaiting_press: bool,
    runs_completed: u32,
}

impl<STEP, DIR, DELAY, HK, BTN, CLK, D> ControlLoop<STEP, DIR, DELAY, HK, BTN, CLK, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    HK: Housekeeping,
    BTN: InputPin,
    CLK: MonotonicClock,
    D: DisplayAdapter,
{
    /// Assemble a control loop. Call [`start`](Self::start) before ticking,
    /// or use [`run`](Self::run).
    pub fn new(
        config: EngineConfig,
        driver: StepPulseDriver<STEP, DIR, DELAY, HK>,
        button: Button<BTN>,
        clock: CLK,
        display: D,
    ) -> Self {
        let timing = TimingState::from_config(&config);
        let request = config.initial_request();
        let selected_rate = timing.applied_rate();
        let plan_direction = config.direction;

        Self {
            config,
            driver,
            button,
            clock,
            status: StatusDisplay::new(display),
            timing,
            profile: None,
            request,
            state: ControlState::Idle,
            selected_rate,
            screen: Screen::Blank,
            plan_direction,
            plan_step: 0,
            awaiting_press: false,
            runs_completed: 0,
        }
    }

    /// Startup sequence: bring up the display, drive DIR once, let it
    /// settle, show the first status screen and hold it for the splash time.
    ///
    /// A display that fails to initialize is logged and skipped. In plan
    /// mode the table is built here so the banner shows what will run.
    ///
    /// # Errors
    ///
    /// Returns an error if DIR cannot be driven or the plan table cannot be built.
    pub fn start(&mut self) -> Result<()> {
        info!(
            "stepper start: {} steps/rev, {}..{} rps",
            self.config.steps_per_revolution,
            self.config.min_rate.value(),
            self.config.max_rate.value()
        );

        self.status.init();
        self.apply_direction(self.config.direction)?;

        match self.request {
            MotionRequest::ConstantRate { .. } => self.show_speed(),
            MotionRequest::FixedPlan { total_steps, .. } => {
                self.prepare_profile(total_steps)?;
                self.show_plan_banner();
            }
        }
        self.driver.pause_ms(self.config.splash_ms as u32);

        self.transition(ControlState::Idle);
        Ok(())
    }

    /// Advance the state machine by one step.
    ///
    /// In constant-rate mode that is one pulse; in plan mode one whole run.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin fails or a profile cannot be built. The
    /// loop can be ticked again: an interrupted plan run resumes at the
    /// step that failed instead of starting over.
    pub fn tick(&mut self) -> Result<()> {
        match self.state {
            ControlState::Idle => self.apply_request(),
            ControlState::RunningConstantRate => self.step_constant_rate(),
            ControlState::RunningPlan => self.run_plan(),
            ControlState::DisplayPause => self.finish_pause(),
        }
    }

    /// Run forever. Errors are logged and the loop continues.
    pub fn run(&mut self) -> ! {
        if self.start().is_err() {
            error!("startup failed, continuing");
        }
        loop {
            if self.tick().is_err() {
                error!("tick failed in state {}", self.state.name());
            }
        }
    }

    /// Replace the active request. Takes effect on the next tick from Idle.
    pub fn request(&mut self, request: MotionRequest) {
        self.request = request;
        self.awaiting_press = false;
        self.plan_step = 0;
        if let MotionRequest::FixedPlan { direction, .. } = request {
            self.plan_direction = direction;
        }
        self.transition(ControlState::Idle);
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// The request being served.
    #[inline]
    pub fn active_request(&self) -> MotionRequest {
        self.request
    }

    /// Rate selected in constant-rate mode.
    #[inline]
    pub fn selected_rate(&self) -> RevsPerSec {
        self.selected_rate
    }

    /// Constant-rate timing state.
    #[inline]
    pub fn timing(&self) -> &TimingState {
        &self.timing
    }

    /// The current plan table, once built.
    #[inline]
    pub fn profile(&self) -> Option<&EaseProfile> {
        self.profile.as_ref()
    }

    /// Direction of the current or next plan run.
    #[inline]
    pub fn plan_direction(&self) -> Direction {
        self.plan_direction
    }

    /// Plan runs finished since construction.
    #[inline]
    pub fn runs_completed(&self) -> u32 {
        self.runs_completed
    }

    /// Check whether a finished plan is waiting for a press to re-arm.
    #[inline]
    pub fn is_awaiting_press(&self) -> bool {
        self.awaiting_press
    }

    /// The step driver.
    #[inline]
    pub fn driver(&self) -> &StepPulseDriver<STEP, DIR, DELAY, HK> {
        &self.driver
    }

    /// The status display.
    #[inline]
    pub fn status(&self) -> &StatusDisplay<D> {
        &self.status
    }

    /// The engine configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tear down, returning the hardware.
    pub fn release(self) -> (StepPulseDriver<STEP, DIR, DELAY, HK>, Button<BTN>, CLK, D) {
        (self.driver, self.button, self.clock, self.status.release())
    }

    fn transition(&mut self, next: ControlState) {
        if self.state != next {
            debug!("state {} -> {}", self.state.name(), next.name());
            self.state = next;
        }
    }

    /// Drive DIR and wait for it to settle, only if it actually changes.
    fn apply_direction(&mut self, direction: Direction) -> Result<()> {
        if self.driver.direction() != Some(direction) {
            self.driver.set_direction(direction)?;
            self.driver.pause_ms(self.config.direction_settle_ms as u32);
        }
        Ok(())
    }

    fn apply_request(&mut self) -> Result<()> {
        if self.awaiting_press {
            let now = self.clock.now_ms();
            if !self.button.poll_edge(now) {
                return Ok(());
            }
            info!("plan re-armed");
            self.awaiting_press = false;
        }

        match self.request {
            MotionRequest::ConstantRate { rps } => {
                self.selected_rate = self.timing.limits().clamp(rps);
                self.timing.configure(self.selected_rate);
                self.apply_direction(self.config.direction)?;
                info!("constant rate: {} rps", self.selected_rate.value());
                self.transition(ControlState::RunningConstantRate);
            }
            MotionRequest::FixedPlan { total_steps, .. } => {
                self.prepare_profile(total_steps)?;
                self.enter_plan()?;
            }
        }
        Ok(())
    }

    /// Poll input, refresh status after a rate change, then emit one step.
    fn step_constant_rate(&mut self) -> Result<()> {
        let now = self.clock.now_ms();
        if self.button.poll_edge(now) {
            self.selected_rate = self.timing.limits().next_cyclic(self.selected_rate);
            info!("speed changed: {} rps", self.selected_rate.value());
        }

        self.show_speed();

        if self.timing.needs_reconfigure(self.selected_rate) {
            self.timing.configure(self.selected_rate);
        }

        let interval_us = self.timing.next_interval();
        self.driver.emit_step(interval_us)
    }

    /// Emit every remaining step of the profile back to back. No input,
    /// display or logging happens until the last pulse is out.
    fn run_plan(&mut self) -> Result<()> {
        let Some(profile) = self.profile.as_ref() else {
            self.transition(ControlState::Idle);
            return Ok(());
        };

        for delay_us in PlanExecutor::resume(profile, self.plan_direction, self.plan_step) {
            self.driver.emit_step(delay_us)?;
            self.plan_step += 1;
        }
        self.plan_step = 0;

        self.runs_completed = self.runs_completed.wrapping_add(1);
        info!(
            "plan complete: {} rev {}",
            profile.rotations(),
            self.plan_direction.label()
        );
        self.transition(ControlState::DisplayPause);
        Ok(())
    }

    /// Show the completion screen, hold it, then reverse or go idle.
    fn finish_pause(&mut self) -> Result<()> {
        let rotations = self.profile.as_ref().map_or(0, EaseProfile::rotations);
        let next = if self.config.plan.reverse_on_complete {
            Some(self.plan_direction.reversed())
        } else {
            None
        };

        self.status.show_plan_complete(rotations, next);
        self.screen = Screen::PlanComplete;
        self.driver.pause_ms(self.config.plan.pause_ms);

        match next {
            Some(direction) => {
                self.plan_direction = direction;
                if let MotionRequest::FixedPlan { total_steps, .. } = self.request {
                    self.prepare_profile(total_steps)?;
                }
                self.enter_plan()
            }
            None => {
                self.awaiting_press = true;
                self.transition(ControlState::Idle);
                Ok(())
            }
        }
    }

    /// Set direction and show the run banner before entering RunningPlan.
    fn enter_plan(&mut self) -> Result<()> {
        self.apply_direction(self.plan_direction)?;
        self.plan_step = 0;
        self.show_plan_banner();
        self.transition(ControlState::RunningPlan);
        Ok(())
    }

    /// Draw the speed screen unless it already shows the selected rate.
    fn show_speed(&mut self) {
        let screen = Screen::Speed(self.selected_rate);
        if self.screen != screen {
            self.status.show_speed(self.selected_rate);
            self.screen = screen;
        }
    }

    /// Draw the run banner for the current table unless it is already up.
    fn show_plan_banner(&mut self) {
        let Some(profile) = self.profile.as_ref() else {
            return;
        };
        let screen = Screen::PlanStart {
            rotations: profile.rotations(),
            direction: self.plan_direction,
        };
        if self.screen != screen {
            self.status
                .show_plan_start(profile.shape(), profile.rotations(), self.plan_direction);
            self.screen = screen;
        }
    }

    /// Build the plan table unless the current one already fits.
    fn prepare_profile(&mut self, total_steps: u32) -> Result<()> {
        let plan = &self.config.plan;
        let params = EaseParams::from_plan(plan);
        let steps_per_revolution = self.config.steps_per_revolution;

        let reusable = self
            .profile
            .as_ref()
            .is_some_and(|p| p.describes(total_steps, plan.shape, params, steps_per_revolution));
        if reusable {
            return Ok(());
        }

        let profile = EaseProfile::build(total_steps, plan.shape, params, steps_per_revolution)?;
        info!(
            "profile built: {} steps, {} us",
            profile.len() as u32,
            profile.total_duration_us() as u32
        );
        self.profile = Some(profile);
        Ok(())
    }
}
