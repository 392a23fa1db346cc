//! STEP/DIR pulse driver.
//!
//! Generic over embedded-hal 1.0 pins and delay. Timing is produced by
//! busy delays: each step is a fixed-width high pulse followed by a low
//! period that completes the requested interval.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Steps;
use crate::error::{MotorError, Result};
use crate::motion::Direction;

use super::housekeeping::{Housekeeping, NoHousekeeping};
use super::position::Position;

/// Emits step pulses and owns the housekeeping cadence.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
/// - `HK`: Housekeeping hook (defaults to `NoHousekeeping`)
pub struct StepPulseDriver<STEP, DIR, DELAY, HK = NoHousekeeping>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    HK: Housekeeping,
{
    /// STEP pin (one pulse per step).
    step_pin: STEP,

    /// DIR pin (high = CW unless inverted).
    dir_pin: DIR,

    /// Delay provider for step timing.
    delay: DELAY,

    /// Platform servicing hook.
    housekeeping: HK,

    /// STEP high time in microseconds.
    pulse_width_us: u32,

    /// Steps between housekeeping calls (0 = never).
    yield_every_steps: u16,

    /// Steps since the last housekeeping call.
    steps_since_yield: u16,

    /// DIR polarity, fixed at construction.
    invert_direction: bool,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// Open-loop position.
    position: Position,
}

impl<STEP, DIR, DELAY, HK> StepPulseDriver<STEP, DIR, DELAY, HK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    HK: Housekeeping,
{
    /// Create a new driver.
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        delay: DELAY,
        housekeeping: HK,
        pulse_width_us: u32,
        yield_every_steps: u16,
        invert_direction: bool,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            housekeeping,
            pulse_width_us,
            yield_every_steps,
            steps_since_yield: 0,
            invert_direction,
            current_direction: None,
            position: Position::new(),
        }
    }

    /// Emit one step lasting `interval_us` in total.
    ///
    /// STEP is held high for the pulse width, then low for the remainder.
    /// An interval shorter than the pulse still emits the full pulse with
    /// no low period: a step is never skipped. Housekeeping runs after the
    /// low period on every `yield_every_steps`-th step.
    ///
    /// # Errors
    ///
    /// Fails without touching STEP if DIR has never been driven, since the
    /// step could not be counted toward the position.
    pub fn emit_step(&mut self, interval_us: u32) -> Result<()> {
        let sign = self
            .current_direction
            .ok_or(MotorError::DirectionNotSet)?
            .sign();

        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(self.pulse_width_us);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;

        let low_us = interval_us.saturating_sub(self.pulse_width_us);
        if low_us > 0 {
            self.delay.delay_us(low_us);
        }

        self.position.move_steps(sign);

        if self.yield_every_steps != 0 {
            self.steps_since_yield += 1;
            if self.steps_since_yield >= self.yield_every_steps {
                self.steps_since_yield = 0;
                self.housekeeping.service();
            }
        }

        Ok(())
    }

    /// Drive DIR for `direction`, honoring the configured polarity.
    ///
    /// Skips the pin write if the direction is unchanged.
    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Clockwise => !self.invert_direction,
            Direction::CounterClockwise => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }

    /// Block for `ms` milliseconds (settling, status pauses). Never called
    /// inside a pulse train.
    #[inline]
    pub fn pause_ms(&mut self, ms: u32) {
        if ms > 0 {
            self.delay.delay_ms(ms);
        }
    }

    /// Direction last driven onto DIR.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.current_direction
    }

    /// Current open-loop position in steps.
    #[inline]
    pub fn position_steps(&self) -> Steps {
        self.position.steps()
    }

    /// STEP high time in microseconds.
    #[inline]
    pub fn pulse_width_us(&self) -> u32 {
        self.pulse_width_us
    }

    /// Steps left before the next housekeeping call, if yielding is enabled.
    #[inline]
    pub fn steps_until_yield(&self) -> Option<u16> {
        if self.yield_every_steps == 0 {
            None
        } else {
            Some(self.yield_every_steps - self.steps_since_yield)
        }
    }

    /// Release the hardware.
    pub fn release(self) -> (STEP, DIR, DELAY, HK) {
        (self.step_pin, self.dir_pin, self.delay, self.housekeeping)
    }
}
