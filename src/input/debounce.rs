//! Press-edge debounce filter.

/// Raw and settled button levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Most recent raw level seen (true = pressed).
    pub last_reading: bool,
    /// Level last accepted as settled.
    pub stable_state: bool,
    /// Timestamp of the last raw level change.
    pub last_change_ms: u32,
}

/// Turns a bouncing pressed/released level into single press events.
///
/// A raw change restarts the settle timer. Once the level has held for the
/// whole window it becomes the stable state, and only the transition to
/// pressed is reported. A press shorter than the window is treated as
/// noise and dropped.
#[derive(Debug, Clone)]
pub struct DebounceFilter {
    state: ButtonState,
    window_ms: u32,
}

impl DebounceFilter {
    /// Create a filter with a settle window in milliseconds, starting released.
    pub const fn new(window_ms: u32) -> Self {
        Self {
            state: ButtonState {
                last_reading: false,
                stable_state: false,
                last_change_ms: 0,
            },
            window_ms,
        }
    }

    /// Feed one sample; returns `true` exactly once per settled press.
    ///
    /// `now_ms` is a monotonic millisecond clock; wrap-around is tolerated.
    /// `pressed` is the polarity-normalized raw level.
    pub fn poll_edge(&mut self, now_ms: u32, pressed: bool) -> bool {
        if pressed != self.state.last_reading {
            self.state.last_reading = pressed;
            self.state.last_change_ms = now_ms;
        }

        if now_ms.wrapping_sub(self.state.last_change_ms) < self.window_ms {
            return false;
        }

        if self.state.stable_state != pressed {
            self.state.stable_state = pressed;
            return pressed;
        }

        false
    }

    /// Current filter state.
    #[inline]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Settle window in milliseconds.
    #[inline]
    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }

    /// Check whether the settled level is pressed.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.state.stable_state
    }
}
