//! Engine configuration - root configuration structure.

use serde::Deserialize;

use crate::motion::{Direction, MotionRequest};

use super::limits::RateLimits;
use super::plan::PlanConfig;
use super::units::RevsPerSec;

/// Which behavior the control loop runs after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Continuous constant-rate stepping, rate cycled by the button.
    #[default]
    Interactive,
    /// Pre-planned eased runs of whole revolutions.
    Plan,
}

/// Root configuration structure from TOML.
///
/// Every field defaults to the compiled-in firmware constant, so an empty
/// document yields the stock configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Full steps per mechanical revolution (200 for 1.8° motors).
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u16,

    /// Slowest selectable rate.
    #[serde(default = "default_min_rate", rename = "min_rate_rps")]
    pub min_rate: RevsPerSec,

    /// Fastest selectable rate.
    #[serde(default = "default_max_rate", rename = "max_rate_rps")]
    pub max_rate: RevsPerSec,

    /// Rate at power-on.
    #[serde(default = "default_initial_rate", rename = "initial_rate_rps")]
    pub initial_rate: RevsPerSec,

    /// STEP high time; must exceed the driver IC minimum.
    #[serde(default = "default_pulse_width_us")]
    pub pulse_width_us: u16,

    /// Time a raw button level must hold before it is trusted.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u16,

    /// Steps between housekeeping yields (0 disables yielding).
    #[serde(default = "default_yield_every_steps")]
    pub yield_every_steps: u16,

    /// Invert DIR pin logic. Fixed for the lifetime of the engine.
    #[serde(default)]
    pub invert_direction: bool,

    /// Direction of constant-rate motion and of the first planned run.
    #[serde(default)]
    pub direction: Direction,

    /// Wait after driving DIR at startup.
    #[serde(default = "default_direction_settle_ms")]
    pub direction_settle_ms: u16,

    /// How long the first status screen stays up before stepping starts.
    #[serde(default = "default_splash_ms")]
    pub splash_ms: u16,

    /// Add bounded pseudo-random dither to constant-rate intervals.
    #[serde(default = "default_dither")]
    pub dither: bool,

    /// Behavior selected at startup.
    #[serde(default)]
    pub mode: Mode,

    /// Eased run parameters (used in `Mode::Plan`).
    #[serde(default)]
    pub plan: PlanConfig,
}

fn default_steps_per_revolution() -> u16 {
    200
}

fn default_min_rate() -> RevsPerSec {
    RevsPerSec(1)
}

fn default_max_rate() -> RevsPerSec {
    RevsPerSec(5)
}

fn default_initial_rate() -> RevsPerSec {
    RevsPerSec(5)
}

fn default_pulse_width_us() -> u16 {
    10
}

fn default_debounce_ms() -> u16 {
    35
}

fn default_yield_every_steps() -> u16 {
    64
}

fn default_direction_settle_ms() -> u16 {
    50
}

fn default_splash_ms() -> u16 {
    500
}

fn default_dither() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: default_steps_per_revolution(),
            min_rate: default_min_rate(),
            max_rate: default_max_rate(),
            initial_rate: default_initial_rate(),
            pulse_width_us: default_pulse_width_us(),
            debounce_ms: default_debounce_ms(),
            yield_every_steps: default_yield_every_steps(),
            invert_direction: false,
            direction: Direction::Clockwise,
            direction_settle_ms: default_direction_settle_ms(),
            splash_ms: default_splash_ms(),
            dither: default_dither(),
            mode: Mode::Interactive,
            plan: PlanConfig::default(),
        }
    }
}

impl EngineConfig {
    /// The selectable rate range, normalized.
    pub fn rate_limits(&self) -> RateLimits {
        RateLimits::new(self.min_rate, self.max_rate)
    }

    /// The request the control loop starts with.
    pub fn initial_request(&self) -> MotionRequest {
        match self.mode {
            Mode::Interactive => MotionRequest::ConstantRate {
                rps: self.initial_rate,
            },
            Mode::Plan => MotionRequest::FixedPlan {
                total_steps: self.plan.total_steps(self.steps_per_revolution),
                direction: self.direction,
            },
        }
    }
}
