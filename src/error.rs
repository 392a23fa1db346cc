//! Error types for stepper-timing.
//!
//! Runtime range violations are clamped, not reported; these errors cover
//! configuration loading, GPIO failures and profile capacity.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-timing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// STEP/DIR output error
    Motor(MotorError),
    /// Motion profile error
    Motion(MotionError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Steps per revolution must be non-zero
    InvalidStepsPerRevolution(u16),
    /// Rate range must satisfy `1 <= min <= max`
    InvalidRateRange {
        /// Minimum rate in revolutions per second
        min: u8,
        /// Maximum rate in revolutions per second
        max: u8,
    },
    /// Nominal interval at the minimum rate does not fit the Q16.16 integer part
    RateTooSlow {
        /// Offending rate in revolutions per second
        rps: u8,
        /// Resulting interval in microseconds
        interval_us: u32,
    },
    /// Nominal interval at the maximum rate is not longer than the STEP pulse
    RateTooFast {
        /// Offending rate in revolutions per second
        rps: u8,
        /// Resulting interval in microseconds
        interval_us: u32,
        /// Configured pulse width in microseconds
        pulse_width_us: u16,
    },
    /// STEP pulse width must be non-zero
    InvalidPulseWidth(u16),
    /// Ease delay bounds must satisfy `0 < floor <= ceiling`
    InvalidEaseBounds {
        /// Shortest allowed delay in microseconds
        floor: u32,
        /// Longest allowed delay in microseconds
        ceiling: u32,
    },
    /// Time scale must be finite and positive
    InvalidTimeScale(f32),
    /// Plan does not fit the profile table
    PlanTooLong {
        /// Requested steps
        steps: u32,
        /// Table capacity
        capacity: usize,
    },
    /// A required builder field was not supplied
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// STEP/DIR output errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
    /// A step was requested before DIR was driven
    DirectionNotSet,
}

/// Motion profile errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Profile table cannot hold a single revolution
    ProfileCapacity {
        /// Steps needed
        requested: u32,
        /// Table capacity
        capacity: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidRateRange { min, max } => {
                write!(f, "Invalid rate range: [{}, {}]. Must satisfy 1 <= min <= max", min, max)
            }
            ConfigError::RateTooSlow { rps, interval_us } => {
                write!(f, "{} RPS gives a {} us interval, limit is 65535 us", rps, interval_us)
            }
            ConfigError::RateTooFast { rps, interval_us, pulse_width_us } => write!(
                f,
                "{} RPS gives a {} us interval, not longer than the {} us pulse",
                rps, interval_us, pulse_width_us
            ),
            ConfigError::InvalidPulseWidth(v) => write!(f, "Invalid pulse width: {} us. Must be > 0", v),
            ConfigError::InvalidEaseBounds { floor, ceiling } => {
                write!(f, "Invalid ease bounds: floor {} us, ceiling {} us", floor, ceiling)
            }
            ConfigError::InvalidTimeScale(v) => write!(f, "Invalid time scale: {}. Must be > 0", v),
            ConfigError::PlanTooLong { steps, capacity } => {
                write!(f, "Plan of {} steps exceeds profile capacity {}", steps, capacity)
            }
            ConfigError::MissingField(name) => write!(f, "{} is required", name),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::DirectionNotSet => write!(f, "DIR must be set before stepping"),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::ProfileCapacity { requested, capacity } => write!(
                f,
                "Profile of {} steps does not fit capacity {}",
                requested, capacity
            ),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
