//! LCDM Hardware Abstraction Layer
//!
//! This crate defines the transport boundary between the dispenser driver
//! and whatever moves bytes to the device: a host serial port, a UART
//! peripheral on a controller board, or a scripted stream in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lcdm-driver (transaction state machine)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lcdm-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  serialport   │       │  board UART   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! Opening the port and configuring baud rate or framing is the
//! responsibility of whoever builds the transport, never the driver.

#![no_std]
#![deny(unsafe_code)]

pub mod serial;

pub use serial::SerialTransport;

// Re-export so implementors don't need a direct embedded-io dependency
pub use embedded_io::{Error, ErrorKind, ErrorType, Write};
