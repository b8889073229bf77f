//! Response layouts and decoded records
//!
//! Responses have no length field. The command that was sent decides the
//! layout, so decoding always needs the [`Command`] alongside the bytes.

use crate::command::Command;
use crate::error_code::{self, NO_ERROR};
use crate::frame::{FrameError, ResponseFrame, HEADER_LEN, TRAILER_LEN};
use crate::quantity::{decode_count, decode_digit};

/// Body layouts, one per response shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseLayout {
    /// ERROR
    ErrorOnly,
    /// CHK(2) EXIT(2) | ERROR | STATUS REJECT(2)
    SingleCassette,
    /// CHK(4) EXIT(4) | ERROR | STATUS(2) REJECT(4)
    DualCassette,
    /// SKIP | ERROR | SENSOR0 SENSOR1
    Sensors,
    /// SKIP1 ROM(2) SKIP2 CHECK(4), no error byte
    RomVersion,
}

impl ResponseLayout {
    /// Body length in bytes
    pub const fn body_len(self) -> usize {
        match self {
            ResponseLayout::ErrorOnly => 1,
            ResponseLayout::SingleCassette => 8,
            ResponseLayout::DualCassette => 15,
            ResponseLayout::Sensors => 4,
            ResponseLayout::RomVersion => 8,
        }
    }

    /// Complete frame length in bytes
    pub const fn frame_size(self) -> usize {
        HEADER_LEN + self.body_len() + TRAILER_LEN
    }
}

/// Result of PURGE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PurgeRecord {
    /// Raw ERROR byte
    pub error: u8,
}

/// Result of a single-cassette dispense or test dispense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispenseRecord {
    /// Notes counted at the CHK sensors
    pub chk: u16,
    /// Notes counted at the EXIT sensor
    pub exit: u16,
    /// Raw ERROR byte
    pub error: u8,
    /// Cassette status: 0 = enough notes, 1 = near end
    pub status: u8,
    /// Notes sent to the reject tray
    pub reject: u16,
}

/// Result of an upper-and-lower dispense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DualDispenseRecord {
    pub chk_upper: u16,
    pub chk_lower: u16,
    pub exit_upper: u16,
    pub exit_lower: u16,
    /// Raw ERROR byte
    pub error: u8,
    pub status_upper: u8,
    pub status_lower: u8,
    pub reject_upper: u16,
    pub reject_lower: u16,
}

/// SENSOR0 bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sensor0 {
    pub chk1: bool,
    pub chk2: bool,
    pub div1: bool,
    pub div2: bool,
    pub ejt: bool,
    pub exit: bool,
    /// Upper cassette near end
    pub near_end0: bool,
}

impl Sensor0 {
    /// Parse from the raw SENSOR0 byte (bit 7 is always set)
    pub fn from_byte(value: u8) -> Self {
        Self {
            chk1: value & (1 << 0) != 0,
            chk2: value & (1 << 1) != 0,
            div1: value & (1 << 2) != 0,
            div2: value & (1 << 3) != 0,
            ejt: value & (1 << 4) != 0,
            exit: value & (1 << 5) != 0,
            near_end0: value & (1 << 6) != 0,
        }
    }
}

/// SENSOR1 bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sensor1 {
    pub sol: bool,
    /// Upper cassette present
    pub cassette0: bool,
    /// Lower cassette present
    pub cassette1: bool,
    pub chk3: bool,
    pub chk4: bool,
    /// Lower cassette near end
    pub near_end1: bool,
    /// Reject tray switch
    pub reject_tray: bool,
}

impl Sensor1 {
    /// Parse from the raw SENSOR1 byte (bit 7 unused)
    pub fn from_byte(value: u8) -> Self {
        Self {
            sol: value & (1 << 0) != 0,
            cassette0: value & (1 << 1) != 0,
            cassette1: value & (1 << 2) != 0,
            chk3: value & (1 << 3) != 0,
            chk4: value & (1 << 4) != 0,
            near_end1: value & (1 << 5) != 0,
            reject_tray: value & (1 << 6) != 0,
        }
    }
}

/// Result of STATUS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusRecord {
    /// Raw ERROR byte
    pub error: u8,
    pub sensor0: Sensor0,
    pub sensor1: Sensor1,
    /// Raw sensor bytes as received
    pub raw_sensors: [u8; 2],
}

/// Result of ROM VERSION
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RomVersionRecord {
    /// Two ROM version bytes
    pub rom: [u8; 2],
    /// Four check bytes
    pub check: [u8; 4],
}

/// Record type for one response layout
///
/// Lets callers decode straight into the record their command produces.
/// The command must answer with `Self::LAYOUT`.
pub trait ResponseRecord: Copy + Into<Response> {
    /// Body layout this record decodes
    const LAYOUT: ResponseLayout;

    /// Decode a validated body of `LAYOUT.body_len()` bytes
    fn from_body(body: &[u8]) -> Self;

    /// Raw ERROR byte (`NO_ERROR` for layouts without one)
    fn error_byte(&self) -> u8;

    /// Validate `raw` as the answer to `command` and decode it
    fn decode(raw: &[u8], command: &Command) -> Result<Self, FrameError> {
        let frame = ResponseFrame::parse(raw, Self::LAYOUT.frame_size())?;

        if frame.rsp_code() != command.code() {
            return Err(FrameError::UnexpectedResponse {
                expected: command.code(),
                received: frame.rsp_code(),
            });
        }

        Ok(Self::from_body(frame.body()))
    }
}

impl ResponseRecord for PurgeRecord {
    const LAYOUT: ResponseLayout = ResponseLayout::ErrorOnly;

    fn from_body(body: &[u8]) -> Self {
        Self { error: body[0] }
    }

    fn error_byte(&self) -> u8 {
        self.error
    }
}

impl ResponseRecord for DispenseRecord {
    const LAYOUT: ResponseLayout = ResponseLayout::SingleCassette;

    fn from_body(body: &[u8]) -> Self {
        Self {
            chk: decode_count(body[0], body[1]),
            exit: decode_count(body[2], body[3]),
            error: body[4],
            status: decode_digit(body[5]),
            reject: decode_count(body[6], body[7]),
        }
    }

    fn error_byte(&self) -> u8 {
        self.error
    }
}

impl ResponseRecord for DualDispenseRecord {
    const LAYOUT: ResponseLayout = ResponseLayout::DualCassette;

    fn from_body(body: &[u8]) -> Self {
        Self {
            chk_upper: decode_count(body[0], body[1]),
            chk_lower: decode_count(body[2], body[3]),
            exit_upper: decode_count(body[4], body[5]),
            exit_lower: decode_count(body[6], body[7]),
            error: body[8],
            status_upper: decode_digit(body[9]),
            status_lower: decode_digit(body[10]),
            reject_upper: decode_count(body[11], body[12]),
            reject_lower: decode_count(body[13], body[14]),
        }
    }

    fn error_byte(&self) -> u8 {
        self.error
    }
}

impl ResponseRecord for StatusRecord {
    const LAYOUT: ResponseLayout = ResponseLayout::Sensors;

    // body[0] is padding
    fn from_body(body: &[u8]) -> Self {
        Self {
            error: body[1],
            sensor0: Sensor0::from_byte(body[2]),
            sensor1: Sensor1::from_byte(body[3]),
            raw_sensors: [body[2], body[3]],
        }
    }

    fn error_byte(&self) -> u8 {
        self.error
    }
}

impl ResponseRecord for RomVersionRecord {
    const LAYOUT: ResponseLayout = ResponseLayout::RomVersion;

    fn from_body(body: &[u8]) -> Self {
        Self {
            rom: [body[1], body[2]],
            check: [body[4], body[5], body[6], body[7]],
        }
    }

    fn error_byte(&self) -> u8 {
        NO_ERROR
    }
}

/// Decoded response to any command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    Purge(PurgeRecord),
    Dispense(DispenseRecord),
    DualDispense(DualDispenseRecord),
    Status(StatusRecord),
    RomVersion(RomVersionRecord),
}

impl From<PurgeRecord> for Response {
    fn from(record: PurgeRecord) -> Self {
        Response::Purge(record)
    }
}

impl From<DispenseRecord> for Response {
    fn from(record: DispenseRecord) -> Self {
        Response::Dispense(record)
    }
}

impl From<DualDispenseRecord> for Response {
    fn from(record: DualDispenseRecord) -> Self {
        Response::DualDispense(record)
    }
}

impl From<StatusRecord> for Response {
    fn from(record: StatusRecord) -> Self {
        Response::Status(record)
    }
}

impl From<RomVersionRecord> for Response {
    fn from(record: RomVersionRecord) -> Self {
        Response::RomVersion(record)
    }
}

impl Response {
    /// Validate and decode a raw response to `command`
    ///
    /// `raw` must be exactly [`Command::response_size`] bytes with a
    /// correct BCC and a response code echoing the command.
    pub fn decode(raw: &[u8], command: &Command) -> Result<Self, FrameError> {
        match command.response_layout() {
            ResponseLayout::ErrorOnly => PurgeRecord::decode(raw, command).map(Into::into),
            ResponseLayout::SingleCassette => DispenseRecord::decode(raw, command).map(Into::into),
            ResponseLayout::DualCassette => {
                DualDispenseRecord::decode(raw, command).map(Into::into)
            }
            ResponseLayout::Sensors => StatusRecord::decode(raw, command).map(Into::into),
            ResponseLayout::RomVersion => RomVersionRecord::decode(raw, command).map(Into::into),
        }
    }

    /// Raw ERROR byte (`NO_ERROR` for responses without one)
    pub fn error_byte(&self) -> u8 {
        match self {
            Response::Purge(r) => r.error_byte(),
            Response::Dispense(r) => r.error_byte(),
            Response::DualDispense(r) => r.error_byte(),
            Response::Status(r) => r.error_byte(),
            Response::RomVersion(r) => r.error_byte(),
        }
    }

    /// Error code relative to `NO_ERROR`
    pub fn error_code(&self) -> u8 {
        error_code::code_from_byte(self.error_byte())
    }

    /// Whether the device reported success or a normal stop
    pub fn is_success(&self) -> bool {
        error_code::is_success_byte(self.error_byte())
    }
}
