//! # stepper-timing
//!
//! Step-timing engine for STEP/DIR stepper drivers with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Drift-free constant rate**: Q16.16 accumulator, error never compounds
//! - **Dithered intervals**: bounded xorshift jitter against mechanical resonance
//! - **Eased plans**: precomputed sine or quadratic speed tables, run back to back
//! - **embedded-hal 1.0**: `OutputPin` for STEP/DIR, `InputPin` for the button, `DelayNs` for timing
//! - **Housekeeping yield**: platform servicing at a fixed step cadence, never mid-pulse
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_timing::{Button, ControlLoop, EngineConfig, StepPulseDriverBuilder};
//!
//! let config: EngineConfig = stepper_timing::load_config("stepper.toml")?;
//!
//! let driver = StepPulseDriverBuilder::new()
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .delay(delay)
//!     .from_config(&config)
//!     .build()?;
//! let button = Button::active_low(button_pin, config.debounce_ms as u32);
//!
//! ControlLoop::new(config, driver, button, clock, display).run();
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and `StdClock`
//! - `defmt`: Enables defmt logging for embedded targets
//! - `log`: Enables `log` facade logging for hosted targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(all(test, not(feature = "std")))]
#[macro_use]
extern crate std;

// Logging macros (defmt / log / no-op)
mod fmt;

pub mod config;
pub mod control;
pub mod display;
pub mod error;
pub mod input;
pub mod motion;
pub mod motor;

pub use config::{validate_config, EngineConfig, Mode, PlanConfig, RateLimits};
pub use control::{ControlLoop, ControlState, MonotonicClock};
pub use display::{DisplayAdapter, NullDisplay, StatusDisplay};
pub use error::{Error, Result};
pub use input::{Button, DebounceFilter};
pub use motion::{
    Direction, EaseParams, EaseProfile, EaseShape, MotionRequest, PlanExecutor, TimingState,
};
pub use motor::{FnHousekeeping, Housekeeping, NoHousekeeping, StepPulseDriver, StepPulseDriverBuilder};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
#[cfg(feature = "std")]
pub use control::StdClock;

// Unit types
pub use config::units::{RevsPerSec, Steps, UnitExt};
