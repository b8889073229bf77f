//! Blocking driver for LCDM-2000 note dispensers
//!
//! [`Lcdm2000`] wraps any [`SerialTransport`] and exposes one method per
//! device command. Each call runs a complete transaction, retrying the
//! ACK and response phases as configured in [`DriverConfig`], and
//! returns the decoded record or a [`DispenserError`].
//!
//! ```no_run
//! # #[cfg(feature = "serialport")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use lcdm_driver::{Lcdm2000, SerialPortTransport};
//!
//! let port = serialport::new("/dev/ttyUSB0", 9600).open()?;
//! let dispenser = Lcdm2000::new(SerialPortTransport::new(port));
//!
//! let record = dispenser.upper_dispense(5)?;
//! println!("dispensed {} notes, {} rejected", record.exit, record.reject);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "serialport"))]
//! # fn main() {}
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod dispenser;
pub mod error;
#[cfg(feature = "serialport")]
pub mod serial;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, DriverConfig};
pub use dispenser::{DispenserResult, Lcdm2000};
pub use error::{DeviceError, DispenserError, PreconditionError, ProtocolError};
#[cfg(feature = "serialport")]
pub use serial::SerialPortTransport;

pub use lcdm_hal::SerialTransport;
pub use lcdm_protocol as protocol;
pub use lcdm_protocol::{
    Command, DispenseRecord, DualDispenseRecord, PurgeRecord, Response, RomVersionRecord,
    StatusRecord,
};
