//! Configuration module for stepper-timing.
//!
//! Provides the engine configuration, its validation, and TOML loading
//! (with `std` feature). Defaults reproduce the compiled-in firmware constants.

mod engine;
mod limits;
#[cfg(feature = "std")]
mod loader;
mod plan;
pub mod units;
mod validation;

pub use engine::{EngineConfig, Mode};
pub use limits::RateLimits;
pub use plan::PlanConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{RevsPerSec, Steps};
