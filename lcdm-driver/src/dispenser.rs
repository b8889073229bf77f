//! LCDM-2000 transaction engine
//!
//! One call is one transaction: send the command frame until the device
//! ACKs it, read the fixed-size response until one validates (NAKing the
//! bad ones), ACK it, then turn a non-success ERROR byte into a
//! [`DeviceError`]. The transport is held for the whole exchange.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use lcdm_hal::SerialTransport;
use lcdm_protocol::error_code::is_success_byte;
use lcdm_protocol::frame::MAX_RESPONSE_FRAME_SIZE;
use lcdm_protocol::{
    Command, DispenseRecord, DualDispenseRecord, PurgeRecord, Quantity, Response,
    ResponseLayout, ResponseRecord, RomVersionRecord, StatusRecord, ACK, NAK,
};
use log::{debug, trace, warn};

use crate::config::{ConfigError, DriverConfig};
use crate::error::{DeviceError, DispenserError, PreconditionError, ProtocolError};

/// Result of a dispenser call on transport `T`
pub type DispenserResult<R, T> = Result<R, DispenserError<<T as embedded_io::ErrorType>::Error>>;

/// Driver for one LCDM-2000 on one serial line
///
/// Calls may come from several threads; each transaction locks the
/// transport until its final ACK is written.
pub struct Lcdm2000<T> {
    transport: Mutex<T>,
    config: DriverConfig,
}

impl<T: SerialTransport> Lcdm2000<T> {
    /// Driver with default timeouts and retries
    pub fn new(transport: T) -> Self {
        Self {
            transport: Mutex::new(transport),
            config: DriverConfig::default(),
        }
    }

    /// Driver with custom timeouts and retries
    ///
    /// Fails if `config` would skip a handshake phase (zero retries) or
    /// never wait for the device (zero timeout).
    pub fn with_config(transport: T, config: DriverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            transport: Mutex::new(transport),
            config,
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Release the transport
    pub fn into_inner(self) -> T {
        self.transport
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run any command and return its decoded response
    pub fn execute(&self, command: Command) -> DispenserResult<Response, T> {
        match command.response_layout() {
            ResponseLayout::ErrorOnly => self.transact::<PurgeRecord>(command).map(Into::into),
            ResponseLayout::SingleCassette => {
                self.transact::<DispenseRecord>(command).map(Into::into)
            }
            ResponseLayout::DualCassette => {
                self.transact::<DualDispenseRecord>(command).map(Into::into)
            }
            ResponseLayout::Sensors => self.transact::<StatusRecord>(command).map(Into::into),
            ResponseLayout::RomVersion => {
                self.transact::<RomVersionRecord>(command).map(Into::into)
            }
        }
    }

    /// Clear the note path into the reject tray
    pub fn purge(&self) -> DispenserResult<PurgeRecord, T> {
        self.transact(Command::Purge)
    }

    /// Read sensor states
    pub fn status(&self) -> DispenserResult<StatusRecord, T> {
        self.transact(Command::Status)
    }

    pub fn rom_version(&self) -> DispenserResult<RomVersionRecord, T> {
        self.transact(Command::RomVersion)
    }

    /// Dispense `qty` notes (1..=69) from the upper cassette
    pub fn upper_dispense(&self, qty: u8) -> DispenserResult<DispenseRecord, T> {
        let qty = quantity("qty", qty)?;
        self.transact(Command::UpperDispense(qty))
    }

    /// Dispense `qty` notes (1..=69) from the lower cassette
    pub fn lower_dispense(&self, qty: u8) -> DispenserResult<DispenseRecord, T> {
        let qty = quantity("qty", qty)?;
        self.transact(Command::LowerDispense(qty))
    }

    /// Dispense from both cassettes in one operation
    ///
    /// Both quantities are checked before anything is sent.
    pub fn upper_and_lower_dispense(
        &self,
        qty_upper: u8,
        qty_lower: u8,
    ) -> DispenserResult<DualDispenseRecord, T> {
        let upper = quantity("qty_upper", qty_upper)?;
        let lower = quantity("qty_lower", qty_lower)?;
        self.transact(Command::UpperAndLowerDispense { upper, lower })
    }

    /// Move one upper-cassette note to the reject tray
    pub fn upper_test_dispense(&self) -> DispenserResult<DispenseRecord, T> {
        self.transact(Command::UpperTestDispense)
    }

    /// Move one lower-cassette note to the reject tray
    pub fn lower_test_dispense(&self) -> DispenserResult<DispenseRecord, T> {
        self.transact(Command::LowerTestDispense)
    }

    /// Full transaction for a command whose answer decodes to `R`
    fn transact<R: ResponseRecord>(&self, command: Command) -> DispenserResult<R, T> {
        let mut transport = self
            .transport
            .lock()
            .map_err(|_| DispenserError::TransportUnavailable)?;

        self.send(&mut *transport, &command)?;
        let record: R = self.receive(&mut *transport, &command)?;

        let error = record.error_byte();
        if is_success_byte(error) {
            debug!("{} complete", command.name());
            return Ok(record);
        }

        let err = DeviceError::from_response(record.into());
        warn!("{} failed: {}", command.name(), err);
        Err(err.into())
    }

    /// Write the command frame until the device ACKs it
    fn send(&self, transport: &mut T, command: &Command) -> DispenserResult<(), T> {
        let frame = command.to_frame().encode();
        let attempts = self.config.max_retries;

        for attempt in 1..=attempts {
            debug!("CMD: {}", hex::encode(&frame[..]));
            transport
                .write_all(&frame)
                .map_err(DispenserError::Transport)?;
            transport.flush().map_err(DispenserError::Transport)?;

            match transport
                .read_byte_timeout(self.config.ack_timeout)
                .map_err(DispenserError::Transport)?
            {
                Some(ACK) => {
                    trace!("ACK for {}", command.name());
                    return Ok(());
                }
                Some(other) => warn!(
                    "{}: expected ACK, got {:#04x} (attempt {}/{})",
                    command.name(),
                    other,
                    attempt,
                    attempts
                ),
                None => warn!(
                    "{}: no ACK within {:?} (attempt {}/{})",
                    command.name(),
                    self.config.ack_timeout,
                    attempt,
                    attempts
                ),
            }
        }

        Err(ProtocolError::AckTimeout { attempts }.into())
    }

    /// Read response frames, NAKing invalid ones, until one decodes
    fn receive<R: ResponseRecord>(
        &self,
        transport: &mut T,
        command: &Command,
    ) -> DispenserResult<R, T> {
        let attempts = self.config.max_retries;
        let mut buf = [0u8; MAX_RESPONSE_FRAME_SIZE];
        let size = command.response_size();
        let mut last_error = None;

        for attempt in 1..=attempts {
            let n = self.read_frame(transport, &mut buf[..size])?;
            let raw = &buf[..n];
            debug!("RSP: {}", hex::encode(raw));

            match R::decode(raw, command) {
                Ok(record) => {
                    write_control(transport, ACK)?;
                    return Ok(record);
                }
                Err(err) => {
                    if n == 0 {
                        warn!(
                            "{}: no response (attempt {}/{})",
                            command.name(),
                            attempt,
                            attempts
                        );
                        last_error = None;
                    } else {
                        warn!(
                            "{}: bad response, {} (attempt {}/{})",
                            command.name(),
                            err,
                            attempt,
                            attempts
                        );
                        last_error = Some(err);
                    }
                    write_control(transport, NAK)?;
                }
            }
        }

        Err(ProtocolError::ResponseTimeout {
            attempts,
            last_error,
        }
        .into())
    }

    /// Fill `buf` before the response deadline, returning the bytes read
    fn read_frame(&self, transport: &mut T, buf: &mut [u8]) -> DispenserResult<usize, T> {
        let deadline = Instant::now() + self.config.response_timeout;
        let mut filled = 0;

        while filled < buf.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            let n = transport
                .read_timeout(&mut buf[filled..], remaining)
                .map_err(DispenserError::Transport)?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        Ok(filled)
    }
}

fn write_control<T: SerialTransport>(transport: &mut T, byte: u8) -> DispenserResult<(), T> {
    transport
        .write_all(&[byte])
        .and_then(|()| transport.flush())
        .map_err(DispenserError::Transport)
}

fn quantity(field: &'static str, value: u8) -> Result<Quantity, PreconditionError> {
    Quantity::new(value).map_err(|err| PreconditionError::quantity(field, err))
}
