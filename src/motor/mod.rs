//! Motor module for stepper-timing.
//!
//! Provides the STEP/DIR pulse driver, its housekeeping hook and open-loop
//! position tracking.

mod builder;
mod driver;
mod housekeeping;
mod position;

pub use builder::StepPulseDriverBuilder;
pub use driver::StepPulseDriver;
pub use housekeeping::{FnHousekeeping, Housekeeping, NoHousekeeping};
pub use position::Position;
