//! Frame encoding and validation for the LCDM-2000 protocol.
//!
//! Command frame (host → dispenser):
//! - EOT (0x04), ID (0x50), STX (0x02)
//! - CMD (1 byte): command code
//! - PARAMS (0-4 bytes): command-specific
//! - ETX (0x03)
//! - BCC (1 byte): XOR of every byte from EOT through ETX
//!
//! Response frame (dispenser → host):
//! - SOH (0x01), ID (0x50), STX (0x02)
//! - RSP (1 byte): echo of the command code
//! - BODY: PARAMS1, ERROR, PARAMS2 (layout fixed per command)
//! - ETX (0x03)
//! - BCC (1 byte): XOR of every byte from SOH through ETX

use core::fmt;

use heapless::Vec;

/// Start of transmission, opens every command frame
pub const EOT: u8 = 0x04;
/// Start of header, opens every response frame
pub const SOH: u8 = 0x01;
/// Communications ID of the LCDM-2000
pub const ID: u8 = 0x50;
/// Start of text
pub const STX: u8 = 0x02;
/// End of text
pub const ETX: u8 = 0x03;

/// Positive acknowledgement of a frame
pub const ACK: u8 = 0x06;
/// Negative acknowledgement, asks the peer to resend
pub const NAK: u8 = 0x15;

/// Largest parameter list of any command (dual-cassette dispense)
pub const MAX_PARAMS: usize = 4;

/// Start byte, ID, STX and command/response code
pub const HEADER_LEN: usize = 4;

/// ETX and BCC
pub const TRAILER_LEN: usize = 2;

/// Maximum command frame size
pub const MAX_COMMAND_FRAME_SIZE: usize = HEADER_LEN + MAX_PARAMS + TRAILER_LEN;

/// Maximum response frame size (dual-cassette dispense)
pub const MAX_RESPONSE_FRAME_SIZE: usize = 21;

/// Maximum response body size
pub const MAX_RESPONSE_BODY: usize = MAX_RESPONSE_FRAME_SIZE - HEADER_LEN - TRAILER_LEN;

/// Block check character: running XOR over `bytes`
pub fn bcc(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &b| acc ^ b)
}

/// Errors that can occur while building or validating a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Parameter list exceeds [`MAX_PARAMS`]
    TooManyParams,
    /// Body exceeds [`MAX_RESPONSE_BODY`]
    BodyTooLarge,
    /// Received byte count differs from the fixed response size
    LengthMismatch { expected: usize, received: usize },
    /// A fixed framing byte (SOH, ID, STX or ETX) is wrong
    InvalidFraming { offset: usize, expected: u8, found: u8 },
    /// Trailing BCC does not match the bytes received
    Malformed { expected: u8, received: u8 },
    /// Intact frame that answers a different command
    UnexpectedResponse { expected: u8, received: u8 },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::TooManyParams => write!(f, "more than {} command parameters", MAX_PARAMS),
            FrameError::BodyTooLarge => write!(f, "response body exceeds {} bytes", MAX_RESPONSE_BODY),
            FrameError::LengthMismatch { expected, received } => {
                write!(f, "expected {} bytes, received {}", expected, received)
            }
            FrameError::InvalidFraming {
                offset,
                expected,
                found,
            } => write!(
                f,
                "framing byte at offset {}: expected {:#04x}, found {:#04x}",
                offset, expected, found
            ),
            FrameError::Malformed { expected, received } => write!(
                f,
                "BCC mismatch: computed {:#04x}, received {:#04x}",
                expected, received
            ),
            FrameError::UnexpectedResponse { expected, received } => write!(
                f,
                "response code {:#04x} does not answer command {:#04x}",
                received, expected
            ),
        }
    }
}

/// Outbound command frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandFrame {
    code: u8,
    params: Vec<u8, MAX_PARAMS>,
}

impl CommandFrame {
    /// Create a frame with the given command code and parameters
    pub fn new(code: u8, params: &[u8]) -> Result<Self, FrameError> {
        let params = Vec::from_slice(params).map_err(|_| FrameError::TooManyParams)?;
        Ok(Self { code, params })
    }

    /// Create a frame from parameters already bounded by `MAX_PARAMS`
    pub(crate) fn from_params(code: u8, params: Vec<u8, MAX_PARAMS>) -> Self {
        Self { code, params }
    }

    /// Create a frame with no parameters
    pub fn empty(code: u8) -> Self {
        Self {
            code,
            params: Vec::new(),
        }
    }

    /// Command code
    pub fn code(&self) -> u8 {
        self.code
    }

    /// Command parameters
    pub fn params(&self) -> &[u8] {
        &self.params
    }

    /// Block check character for this frame
    pub fn bcc(&self) -> u8 {
        EOT ^ ID ^ STX ^ self.code ^ bcc(&self.params) ^ ETX
    }

    /// Encode to the exact byte sequence sent on the wire
    pub fn encode(&self) -> Vec<u8, MAX_COMMAND_FRAME_SIZE> {
        let mut out = Vec::new();
        // Capacity covers MAX_PARAMS, none of these can fail
        let _ = out.extend_from_slice(&[EOT, ID, STX, self.code]);
        let _ = out.extend_from_slice(&self.params);
        let _ = out.extend_from_slice(&[ETX, self.bcc()]);
        out
    }
}

/// Validated view over a raw response frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame<'a> {
    raw: &'a [u8],
}

impl<'a> ResponseFrame<'a> {
    /// Validate `raw` as a response of exactly `expected_size` bytes
    ///
    /// Checks length, then the BCC, then the fixed framing bytes. The
    /// response code is not checked here since only the caller knows
    /// which command it answers.
    pub fn parse(raw: &'a [u8], expected_size: usize) -> Result<Self, FrameError> {
        if raw.len() != expected_size || raw.len() < HEADER_LEN + TRAILER_LEN {
            return Err(FrameError::LengthMismatch {
                expected: expected_size,
                received: raw.len(),
            });
        }

        let last = raw.len() - 1;
        let computed = bcc(&raw[..last]);
        if raw[last] != computed {
            return Err(FrameError::Malformed {
                expected: computed,
                received: raw[last],
            });
        }

        for (offset, expected) in [(0, SOH), (1, ID), (2, STX), (last - 1, ETX)] {
            if raw[offset] != expected {
                return Err(FrameError::InvalidFraming {
                    offset,
                    expected,
                    found: raw[offset],
                });
            }
        }

        Ok(Self { raw })
    }

    /// Response code (echo of the command code)
    pub fn rsp_code(&self) -> u8 {
        self.raw[3]
    }

    /// Bytes between the response code and ETX
    pub fn body(&self) -> &'a [u8] {
        &self.raw[HEADER_LEN..self.raw.len() - TRAILER_LEN]
    }

    /// Trailing block check character
    pub fn bcc(&self) -> u8 {
        self.raw[self.raw.len() - 1]
    }

    /// The complete frame as received
    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }
}

/// Build a well-formed response frame (for testing or device simulation)
pub fn encode_response(
    rsp_code: u8,
    body: &[u8],
) -> Result<Vec<u8, MAX_RESPONSE_FRAME_SIZE>, FrameError> {
    if body.len() > MAX_RESPONSE_BODY {
        return Err(FrameError::BodyTooLarge);
    }

    let mut out = Vec::new();
    let _ = out.extend_from_slice(&[SOH, ID, STX, rsp_code]);
    let _ = out.extend_from_slice(body);
    let _ = out.push(ETX);
    let check = bcc(&out);
    let _ = out.push(check);
    Ok(out)
}
