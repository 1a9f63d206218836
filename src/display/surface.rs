use crate::display::view::Key;
use crate::error::FinchResult;
use crate::raster::Image;

/// A named, closable place to show frames and read keys from.
pub trait Surface {
    /// False once the operator closed the surface.
    fn is_open(&self) -> bool;

    /// Shows `frame`. An error means the surface is gone.
    fn present(&mut self, frame: &Image) -> FinchResult<()>;

    /// Returns at most one pending key press; never blocks.
    fn poll_key(&mut self) -> Option<Key>;

    /// Called on iterations with nothing to show so the surface can keep
    /// servicing its own events.
    fn idle(&mut self) {}
}

/// Surface for headless runs: always open, shows nothing, never has input.
#[derive(Debug, Default)]
pub struct NullSurface {
    presented: u64,
}

impl NullSurface {
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Surface for NullSurface {
    fn is_open(&self) -> bool {
        true
    }

    fn present(&mut self, _frame: &Image) -> FinchResult<()> {
        self.presented += 1;
        Ok(())
    }

    fn poll_key(&mut self) -> Option<Key> {
        None
    }
}
