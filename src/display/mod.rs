//! Status display.
//!
//! The engine never touches pixels. It hands fully formed lines of text to a
//! [`DisplayAdapter`] through [`StatusDisplay`], and only at state-entry
//! boundaries, never between two adjacent step pulses.

mod status;

pub use status::{StatusDisplay, StatusLine};

/// Text-and-rectangle drawing surface for a small monochrome panel.
///
/// Drawing calls only touch a frame buffer; nothing reaches the panel until
/// [`present`](DisplayAdapter::present).
pub trait DisplayAdapter {
    /// Bus or controller error.
    type Error;

    /// Bring up the panel. Called once at startup.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Clear the frame buffer.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draw `text` with its top-left corner at `(x, y)` and integer scale `size`.
    fn draw_text(&mut self, x: i32, y: i32, size: u8, text: &str) -> Result<(), Self::Error>;

    /// Draw a rectangle outline.
    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<(), Self::Error>;

    /// Draw a filled rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<(), Self::Error>;

    /// Push the frame buffer to the panel.
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// Display that accepts and discards everything, for headless builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl DisplayAdapter for NullDisplay {
    type Error = core::convert::Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn draw_text(&mut self, _x: i32, _y: i32, _size: u8, _text: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn draw_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<D: DisplayAdapter + ?Sized> DisplayAdapter for &mut D {
    type Error = D::Error;

    fn init(&mut self) -> Result<(), Self::Error> {
        (**self).init()
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        (**self).clear()
    }

    fn draw_text(&mut self, x: i32, y: i32, size: u8, text: &str) -> Result<(), Self::Error> {
        (**self).draw_text(x, y, size, text)
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<(), Self::Error> {
        (**self).draw_rect(x, y, w, h)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) -> Result<(), Self::Error> {
        (**self).fill_rect(x, y, w, h)
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        (**self).present()
    }
}
