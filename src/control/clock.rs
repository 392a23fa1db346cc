//! Millisecond time source for input debouncing.

/// Monotonic millisecond clock.
///
/// Only differences are meaningful; the counter may wrap at `u32::MAX`.
pub trait MonotonicClock {
    /// Milliseconds since an arbitrary epoch.
    fn now_ms(&mut self) -> u32;
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &mut C {
    fn now_ms(&mut self) -> u32 {
        (**self).now_ms()
    }
}

/// Wall-clock time source for hosted builds.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start counting from now.
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl MonotonicClock for StdClock {
    fn now_ms(&mut self) -> u32 {
        // Truncation gives the documented wrap-around.
        self.start.elapsed().as_millis() as u32
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_std_clock_monotonic() {
        let mut clock = StdClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b.wrapping_sub(a) < 1000);
    }
}
