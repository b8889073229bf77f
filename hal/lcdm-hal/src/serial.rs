//! Blocking serial transport with read deadlines
//!
//! Writes go through [`embedded_io::Write`]. Reads take an explicit
//! timeout so a silent device can never stall the caller forever.

use core::time::Duration;

use embedded_io::{ErrorType, Write};

/// Duplex byte stream used by the dispenser driver
///
/// Implementations must honour the timeout passed to [`read_timeout`]:
/// when it elapses the call returns with whatever arrived, possibly
/// nothing. A timeout is not an error.
///
/// [`read_timeout`]: SerialTransport::read_timeout
pub trait SerialTransport: ErrorType + Write {
    /// Read up to `buf.len()` bytes, waiting at most `timeout`
    ///
    /// Returns the number of bytes placed in `buf`. `Ok(0)` means the
    /// deadline passed with no data.
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Self::Error>;

    /// Read a single byte, `None` on timeout
    fn read_byte_timeout(&mut self, timeout: Duration) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        match self.read_timeout(&mut buf, timeout)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}
