//! [`SerialTransport`] over a host serial port
//!
//! The port must already be opened and configured (9600 8N1 for the
//! LCDM-2000). Only the read timeout is changed, per call.

use std::io::{self, Read};
use std::time::Duration;

use embedded_io::{ErrorType, Write};
use lcdm_hal::SerialTransport;
use serialport::SerialPort;

/// Adapter from [`serialport::SerialPort`] to [`SerialTransport`]
pub struct SerialPortTransport {
    port: Box<dyn SerialPort>,
}

impl SerialPortTransport {
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Port name, if the platform reports one
    pub fn name(&self) -> Option<String> {
        self.port.name()
    }

    pub fn into_inner(self) -> Box<dyn SerialPort> {
        self.port
    }
}

impl ErrorType for SerialPortTransport {
    type Error = io::Error;
}

impl Write for SerialPortTransport {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        io::Write::write(&mut self.port, buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        io::Write::flush(&mut self.port)
    }
}

impl SerialTransport for SerialPortTransport {
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.port.set_timeout(timeout)?;
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(err) if err.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(err) => Err(err),
        }
    }
}
