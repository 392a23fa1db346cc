//! Configuration validation.

use crate::error::{ConfigError, Error, Result};
use crate::motion::MAX_PLAN_STEPS;

use super::units::RevsPerSec;
use super::{EngineConfig, PlanConfig};

/// Largest nominal interval the Q16.16 integer part can carry.
const MAX_NOMINAL_INTERVAL_US: u32 = u16::MAX as u32;

/// Validate an engine configuration.
///
/// Checks:
/// - Steps per revolution and pulse width are non-zero
/// - Rate range is ordered and starts at one or more
/// - Nominal interval at the slowest rate fits the fixed-point integer part
/// - Nominal interval at the fastest rate is longer than the STEP pulse
/// - Plan bounds, time scale and length are usable
pub fn validate_config(config: &EngineConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.steps_per_revolution,
        )));
    }

    if config.pulse_width_us == 0 {
        return Err(Error::Config(ConfigError::InvalidPulseWidth(config.pulse_width_us)));
    }

    if config.min_rate.0 == 0 || config.min_rate > config.max_rate {
        return Err(Error::Config(ConfigError::InvalidRateRange {
            min: config.min_rate.0,
            max: config.max_rate.0,
        }));
    }

    validate_rate_timing(config)?;
    validate_plan(&config.plan, config.steps_per_revolution)?;

    Ok(())
}

fn validate_rate_timing(config: &EngineConfig) -> Result<()> {
    let slowest = whole_interval_us(config.min_rate, config.steps_per_revolution);
    if slowest > MAX_NOMINAL_INTERVAL_US {
        return Err(Error::Config(ConfigError::RateTooSlow {
            rps: config.min_rate.0,
            interval_us: slowest,
        }));
    }

    let fastest = whole_interval_us(config.max_rate, config.steps_per_revolution);
    if fastest <= config.pulse_width_us as u32 {
        return Err(Error::Config(ConfigError::RateTooFast {
            rps: config.max_rate.0,
            interval_us: fastest,
            pulse_width_us: config.pulse_width_us,
        }));
    }

    Ok(())
}

fn validate_plan(plan: &PlanConfig, steps_per_revolution: u16) -> Result<()> {
    if plan.floor_us == 0 || plan.floor_us > plan.ceiling_us {
        return Err(Error::Config(ConfigError::InvalidEaseBounds {
            floor: plan.floor_us,
            ceiling: plan.ceiling_us,
        }));
    }

    if !plan.time_scale.is_finite() || plan.time_scale <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidTimeScale(plan.time_scale)));
    }

    let steps = plan.total_steps(steps_per_revolution);
    if steps as usize > MAX_PLAN_STEPS || (steps_per_revolution as usize) > MAX_PLAN_STEPS {
        return Err(Error::Config(ConfigError::PlanTooLong {
            steps,
            capacity: MAX_PLAN_STEPS,
        }));
    }

    Ok(())
}

fn whole_interval_us(rate: RevsPerSec, steps_per_revolution: u16) -> u32 {
    rate.nominal_interval_us(steps_per_revolution)
        .map(|us| us as u32)
        .unwrap_or(u32::MAX)
}
