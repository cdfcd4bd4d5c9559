//! Output writer trait definition.

use crate::error::Result;
use crate::event::AcousticEvent;

/// Trait for writing accepted events.
pub trait OutputWriter {
    /// Write the file header (if applicable).
    fn write_header(&mut self) -> Result<()>;

    /// Write a single event.
    fn write_event(&mut self, event: &AcousticEvent) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}
