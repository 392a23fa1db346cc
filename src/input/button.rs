//! Momentary operator button on an embedded-hal input pin.

use embedded_hal::digital::InputPin;

use super::debounce::DebounceFilter;

/// Debounced push button.
///
/// The stock wiring is active-low with a pull-up: the pin reads low while
/// the button is held.
pub struct Button<PIN>
where
    PIN: InputPin,
{
    pin: PIN,
    active_low: bool,
    filter: DebounceFilter,
}

impl<PIN> Button<PIN>
where
    PIN: InputPin,
{
    /// Create an active-low button.
    pub fn active_low(pin: PIN, debounce_ms: u32) -> Self {
        Self {
            pin,
            active_low: true,
            filter: DebounceFilter::new(debounce_ms),
        }
    }

    /// Create an active-high button.
    pub fn active_high(pin: PIN, debounce_ms: u32) -> Self {
        Self {
            pin,
            active_low: false,
            filter: DebounceFilter::new(debounce_ms),
        }
    }

    /// Sample the pin and report a settled press edge.
    ///
    /// A failed read is logged and treated as no event; the filter keeps its
    /// previous state.
    pub fn poll_edge(&mut self, now_ms: u32) -> bool {
        let low = match self.pin.is_low() {
            Ok(low) => low,
            Err(_) => {
                warn!("button read failed");
                return false;
            }
        };
        let pressed = low == self.active_low;
        self.filter.poll_edge(now_ms, pressed)
    }

    /// The debounce filter.
    #[inline]
    pub fn filter(&self) -> &DebounceFilter {
        &self.filter
    }

    /// Release the pin.
    pub fn release(self) -> PIN {
        self.pin
    }
}
