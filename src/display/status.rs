//! Status screens rendered between pulse trains.

use core::fmt::Write;

use crate::config::units::RevsPerSec;
use crate::motion::{Direction, EaseShape};

use super::DisplayAdapter;

/// One formatted line of status text.
pub type StatusLine = heapless::String<20>;

const PANEL_WIDTH: u32 = 128;
const BAR_Y: i32 = 56;
const BAR_HEIGHT: u32 = 8;

fn line(args: core::fmt::Arguments<'_>) -> StatusLine {
    let mut text = StatusLine::new();
    // Overlong text is clipped; the panel cannot show it anyway.
    let _ = text.write_fmt(args);
    text
}

/// Wraps a [`DisplayAdapter`] with the engine's status screens.
///
/// Failures never reach the caller. A failed `init` latches the display off
/// for the rest of the run; a failed draw is logged and the screen skipped.
pub struct StatusDisplay<D> {
    display: D,
    enabled: bool,
}

impl<D> StatusDisplay<D>
where
    D: DisplayAdapter,
{
    /// Wrap an uninitialized display. Nothing is drawn until [`init`](Self::init).
    pub fn new(display: D) -> Self {
        Self {
            display,
            enabled: false,
        }
    }

    /// Initialize the panel. Returns whether it is usable.
    pub fn init(&mut self) -> bool {
        self.enabled = self.display.init().is_ok();
        if self.enabled {
            info!("display ready");
        } else {
            warn!("display init failed, continuing without status");
        }
        self.enabled
    }

    /// Check whether the display initialized successfully.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Speed screen for constant-rate mode.
    pub fn show_speed(&mut self, rate: RevsPerSec) {
        let speed = line(format_args!("{} RPS", rate.value()));
        self.render(|d| {
            d.draw_text(0, 0, 1, "STEPPER CONTROL")?;
            d.draw_text(0, 18, 2, "SPEED")?;
            d.draw_text(0, 42, 2, &speed)
        });
    }

    /// Banner shown before an eased plan starts.
    pub fn show_plan_start(&mut self, shape: EaseShape, rotations: u32, direction: Direction) {
        let run = line(format_args!("{} REV {}", rotations, direction.label()));
        self.render(|d| {
            d.draw_text(0, 0, 1, "EASE RUN")?;
            d.draw_text(0, 18, 2, shape.label())?;
            d.draw_text(0, 36, 2, &run)?;
            d.draw_rect(0, BAR_Y, PANEL_WIDTH, BAR_HEIGHT)
        });
    }

    /// Completion screen shown during the pause after a plan.
    ///
    /// `next` is the direction of the following run, or `None` when the
    /// engine goes idle.
    pub fn show_plan_complete(&mut self, revolutions: u32, next: Option<Direction>) {
        let revs = line(format_args!("{} REV", revolutions));
        let next = match next {
            Some(direction) => line(format_args!("NEXT {}", direction.label())),
            None => line(format_args!("PRESS TO RUN")),
        };
        self.render(|d| {
            d.draw_text(0, 0, 2, "DONE")?;
            d.draw_text(0, 22, 2, &revs)?;
            d.draw_text(0, 44, 1, &next)?;
            d.draw_rect(0, BAR_Y, PANEL_WIDTH, BAR_HEIGHT)?;
            d.fill_rect(0, BAR_Y, PANEL_WIDTH, BAR_HEIGHT)
        });
    }

    /// Clear, draw, present. Skipped entirely while the display is off.
    fn render<F>(&mut self, draw: F)
    where
        F: FnOnce(&mut D) -> Result<(), D::Error>,
    {
        if !self.enabled {
            return;
        }

        let result = self
            .display
            .clear()
            .and_then(|_| draw(&mut self.display))
            .and_then(|_| self.display.present());

        if result.is_err() {
            warn!("display update failed");
        }
    }

    /// Access the wrapped display.
    pub fn inner(&self) -> &D {
        &self.display
    }

    /// Release the wrapped display.
    pub fn release(self) -> D {
        self.display
    }
}
