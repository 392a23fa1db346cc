//! Control loop and its time source.

mod clock;
mod control_loop;
mod state;

#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::MonotonicClock;
pub use control_loop::ControlLoop;
pub use state::ControlState;
