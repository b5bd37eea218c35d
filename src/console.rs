//! Formatted output over a byte transport.
//!
//! [`Console`] wraps any [`embedded_io::Write`] transmitter and layers
//! [`core::fmt`] on top of it, so command handlers can use `write!` for the
//! fixed-width listing format. Every character of output, echo included, goes
//! out through the same blocking byte path.

use core::fmt;
use embedded_io::Write;

/// Blocking console over a serial transmitter.
pub struct Console<W: Write>(W);

impl<W: Write> Console<W> {
    /// Wrap a byte transmitter.
    pub fn new(tx: W) -> Self {
        Console(tx)
    }

    /// Transmit one raw byte, blocking until the transport accepts it.
    ///
    /// Used for the line editor's echo path, where bytes go back verbatim
    /// without any formatting.
    pub fn write_byte(&mut self, byte: u8) {
        self.0.write_all(&[byte]).ok();
    }

    /// Transmit a raw byte slice, blocking through each byte in sequence.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.0.write_all(bytes).ok();
    }

    /// Release the wrapped transmitter.
    pub fn free(self) -> W {
        self.0
    }
}

impl<W: Write> fmt::Write for Console<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
