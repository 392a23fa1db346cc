//! Operator input.

mod button;
mod debounce;

pub use button::Button;
pub use debounce::{ButtonState, DebounceFilter};
