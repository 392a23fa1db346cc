//! Platform housekeeping hook.
//!
//! Some targets (an ESP8266 watchdog, a USB stack polled from the main
//! loop) need the single thread back every so often. The pulse driver calls
//! [`Housekeeping::service`] at a fixed step cadence, always after a step's
//! low period and never while STEP is high.

/// Background servicing invoked between steps.
pub trait Housekeeping {
    /// Service the platform. Must be short and bounded.
    fn service(&mut self);
}

/// Housekeeping for hosts with nothing to service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHousekeeping;

impl Housekeeping for NoHousekeeping {
    #[inline]
    fn service(&mut self) {}
}

/// Adapts a closure into [`Housekeeping`].
#[derive(Debug, Clone, Copy)]
pub struct FnHousekeeping<F>(pub F);

impl<F: FnMut()> Housekeeping for FnHousekeeping<F> {
    #[inline]
    fn service(&mut self) {
        (self.0)()
    }
}

impl<H: Housekeeping + ?Sized> Housekeeping for &mut H {
    #[inline]
    fn service(&mut self) {
        (**self).service()
    }
}
