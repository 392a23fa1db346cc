//! Motion module for stepper-timing.
//!
//! Turns a motion request into per-step delays: a drift-free fixed-point
//! accumulator for constant rate, and precomputed ease tables for planned runs.

mod ease;
mod executor;
pub mod prng;
mod request;
mod timing;

pub use ease::{EaseParams, EaseProfile, EaseShape, MAX_PLAN_STEPS};
pub use executor::PlanExecutor;
pub use prng::Xorshift32;
pub use request::{Direction, MotionRequest};
pub use timing::{IntervalSample, TimingState, FIXED_FRACTION_BITS};
