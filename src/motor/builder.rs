//! Builder pattern for StepPulseDriver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::EngineConfig;
use crate::error::{ConfigError, Error, Result};

use super::driver::StepPulseDriver;
use super::housekeeping::{Housekeeping, NoHousekeeping};

/// Builder for creating StepPulseDriver instances.
pub struct StepPulseDriverBuilder<STEP, DIR, DELAY, HK = NoHousekeeping>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    HK: Housekeeping,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    housekeeping: HK,
    pulse_width_us: u32,
    yield_every_steps: u16,
    invert_direction: bool,
}

impl<STEP, DIR, DELAY> Default for StepPulseDriverBuilder<STEP, DIR, DELAY, NoHousekeeping>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, DELAY> StepPulseDriverBuilder<STEP, DIR, DELAY, NoHousekeeping>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder with the stock firmware timing.
    pub fn new() -> Self {
        let defaults = EngineConfig::default();
        Self {
            step_pin: None,
            dir_pin: None,
            delay: None,
            housekeeping: NoHousekeeping,
            pulse_width_us: defaults.pulse_width_us as u32,
            yield_every_steps: defaults.yield_every_steps,
            invert_direction: defaults.invert_direction,
        }
    }
}

impl<STEP, DIR, DELAY, HK> StepPulseDriverBuilder<STEP, DIR, DELAY, HK>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
    HK: Housekeeping,
{
    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the housekeeping hook.
    pub fn housekeeping<H: Housekeeping>(self, housekeeping: H) -> StepPulseDriverBuilder<STEP, DIR, DELAY, H> {
        StepPulseDriverBuilder {
            step_pin: self.step_pin,
            dir_pin: self.dir_pin,
            delay: self.delay,
            housekeeping,
            pulse_width_us: self.pulse_width_us,
            yield_every_steps: self.yield_every_steps,
            invert_direction: self.invert_direction,
        }
    }

    /// Set the STEP pulse width in microseconds.
    pub fn pulse_width_us(mut self, us: u32) -> Self {
        self.pulse_width_us = us;
        self
    }

    /// Set the housekeeping cadence (0 disables it).
    pub fn yield_every_steps(mut self, steps: u16) -> Self {
        self.yield_every_steps = steps;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Configure timing and polarity from an EngineConfig.
    pub fn from_config(mut self, config: &EngineConfig) -> Self {
        self.pulse_width_us = config.pulse_width_us as u32;
        self.yield_every_steps = config.yield_every_steps;
        self.invert_direction = config.invert_direction;
        self
    }

    /// Build the StepPulseDriver.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin or the delay is missing, or the pulse width is zero.
    pub fn build(self) -> Result<StepPulseDriver<STEP, DIR, DELAY, HK>> {
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;

        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingField("dir_pin")))?;

        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;

        if self.pulse_width_us == 0 {
            return Err(Error::Config(ConfigError::InvalidPulseWidth(0)));
        }

        Ok(StepPulseDriver::new(
            step_pin,
            dir_pin,
            delay,
            self.housekeeping,
            self.pulse_width_us,
            self.yield_every_steps,
            self.invert_direction,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;

    struct NullPin;

    impl embedded_hal::digital::ErrorType for NullPin {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for NullPin {
        fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
            Ok(())
        }

        fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_step_pin() {
        let result = StepPulseDriverBuilder::<NullPin, NullPin, NoopDelay>::new()
            .dir_pin(NullPin)
            .delay(NoopDelay::new())
            .build();

        match result {
            Err(Error::Config(ConfigError::MissingField(name))) => assert_eq!(name, "step_pin"),
            _ => panic!("expected missing step_pin"),
        }
    }

    #[test]
    fn test_from_config() {
        let config = EngineConfig {
            pulse_width_us: 20,
            yield_every_steps: 0,
            ..EngineConfig::default()
        };

        let driver = StepPulseDriverBuilder::new()
            .step_pin(PinMock::new(&[]))
            .dir_pin(PinMock::new(&[]))
            .delay(NoopDelay::new())
            .from_config(&config)
            .build()
            .unwrap();

        assert_eq!(driver.pulse_width_us(), 20);
        assert_eq!(driver.steps_until_yield(), None);

        let (mut step, mut dir, _, _) = driver.release();
        step.done();
        dir.done();
    }
}
