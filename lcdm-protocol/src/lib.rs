//! LCDM-2000 Dispenser Protocol
//!
//! This crate defines the binary request/response protocol spoken by the
//! LCDM-2000 family of note dispensers. It is pure: no I/O, no timing.
//! The transaction driver in `lcdm-driver` runs the handshake on top.
//!
//! # Protocol Overview
//!
//! Commands and responses use fixed framing with an XOR block check:
//! ```text
//! Command:  ┌─────┬────┬─────┬─────┬──────────┬─────┬─────┐
//!           │ EOT │ ID │ STX │ CMD │ PARAMS   │ ETX │ BCC │
//!           │ 04  │ 50 │ 02  │ 1B  │ 0–4B     │ 03  │ 1B  │
//!           └─────┴────┴─────┴─────┴──────────┴─────┴─────┘
//! Response: ┌─────┬────┬─────┬─────┬─────────┬───────┬─────────┬─────┬─────┐
//!           │ SOH │ ID │ STX │ RSP │ PARAMS1 │ ERROR │ PARAMS2 │ ETX │ BCC │
//!           │ 01  │ 50 │ 02  │ 1B  │         │ 1B    │         │ 03  │ 1B  │
//!           └─────┴────┴─────┴─────┴─────────┴───────┴─────────┴─────┴─────┘
//! ```
//!
//! The response length is never self-describing: each command has a fixed
//! response size, see [`Command::response_size`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod error_code;
pub mod frame;
pub mod quantity;
pub mod response;

pub use command::Command;
pub use error_code::{ErrorCode, NORMAL_STOP, NO_ERROR};
pub use frame::{bcc, CommandFrame, FrameError, ResponseFrame, ACK, NAK};
pub use quantity::{Quantity, QuantityError};
pub use response::{
    DispenseRecord, DualDispenseRecord, PurgeRecord, Response, ResponseLayout, ResponseRecord,
    RomVersionRecord, Sensor0, Sensor1, StatusRecord,
};
