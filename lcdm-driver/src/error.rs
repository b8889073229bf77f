//! Error types for lcdm-driver.
//!
//! Every failure carries a numeric code and a message from the device
//! error table. Device errors also carry the decoded response so callers
//! can inspect counts and cassette state after a jam.

use lcdm_protocol::error_code::{self, ACK_TIMEOUT, RESPONSE_TIMEOUT, UNKNOWN_ERROR};
use lcdm_protocol::{FrameError, QuantityError, Response};
use thiserror::Error;

/// Handshake failures, raised only once the retry budget is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// No ACK after every send attempt
    #[error("ACK timed out after {attempts} attempts")]
    AckTimeout { attempts: u8 },

    /// No valid response frame after every read attempt
    ///
    /// Bad checksums, framing and foreign response codes are all NAKed and
    /// retried; the last such defect is kept for diagnostics.
    #[error("response timed out after {attempts} attempts")]
    ResponseTimeout {
        attempts: u8,
        /// Why the last attempt was rejected, `None` if nothing arrived
        last_error: Option<FrameError>,
    },
}

impl ProtocolError {
    /// Numeric code from the error table
    pub fn code(&self) -> u8 {
        match self {
            ProtocolError::AckTimeout { .. } => ACK_TIMEOUT,
            ProtocolError::ResponseTimeout { .. } => RESPONSE_TIMEOUT,
        }
    }
}

/// Non-success ERROR byte reported by the dispenser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("device error {code:#04x}: {message}")]
pub struct DeviceError {
    /// ERROR byte minus `NO_ERROR`
    pub code: u8,
    /// Description from the error table
    pub message: &'static str,
    /// The response that reported the error
    pub response: Response,
}

impl DeviceError {
    /// Build from a decoded response whose ERROR byte is not a success
    pub fn from_response(response: Response) -> Self {
        let code = response.error_code();
        Self {
            code,
            message: error_code::describe(code),
            response,
        }
    }
}

/// Caller asked for something the device cannot do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} = {value} is out of range, must be 1..=69")]
pub struct PreconditionError {
    /// Argument name
    pub field: &'static str,
    /// Rejected value
    pub value: u8,
}

impl PreconditionError {
    pub(crate) fn quantity(field: &'static str, err: QuantityError) -> Self {
        Self {
            field,
            value: err.value,
        }
    }
}

/// Any failure of a dispenser call
#[derive(Debug, Error)]
pub enum DispenserError<E: embedded_io::Error> {
    /// Handshake failed after retries
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Device reported an error condition
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Invalid argument, nothing was sent
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// The transport failed, the transaction was abandoned
    #[error("transport error: {0:?}")]
    Transport(E),

    /// An earlier transaction panicked while holding the transport
    #[error("transport unavailable after an aborted transaction")]
    TransportUnavailable,
}

impl<E: embedded_io::Error> DispenserError<E> {
    /// Numeric code: device code, synthetic timeout code or `UNKNOWN_ERROR`
    pub fn code(&self) -> u8 {
        match self {
            DispenserError::Protocol(err) => err.code(),
            DispenserError::Device(err) => err.code,
            _ => UNKNOWN_ERROR,
        }
    }

    /// Human-readable message for [`code`](Self::code)
    pub fn message(&self) -> &'static str {
        match self {
            DispenserError::Device(err) => err.message,
            DispenserError::Precondition(_) => "Quantity out of range",
            DispenserError::Transport(_) => "Transport error",
            DispenserError::TransportUnavailable => "Transport unavailable",
            DispenserError::Protocol(err) => error_code::describe(err.code()),
        }
    }

    /// Response attached to a device error
    pub fn response(&self) -> Option<&Response> {
        match self {
            DispenserError::Device(err) => Some(&err.response),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::ErrorKind;
    use lcdm_protocol::PurgeRecord;

    type Error = DispenserError<ErrorKind>;

    #[test]
    fn test_device_error_from_response() {
        let response = Response::Purge(PurgeRecord { error: 0x32 });
        let err = DeviceError::from_response(response);

        assert_eq!(err.code, 2);
        assert_eq!(err.message, "Pickup error");
        assert_eq!(err.to_string(), "device error 0x02: Pickup error");
    }

    #[test]
    fn test_codes_and_messages() {
        let ack: Error = ProtocolError::AckTimeout { attempts: 3 }.into();
        assert_eq!(ack.code(), 0xF1);
        assert_eq!(ack.message(), "ACK timed out");
        assert!(ack.response().is_none());

        let rsp: Error = ProtocolError::ResponseTimeout {
            attempts: 3,
            last_error: None,
        }
        .into();
        assert_eq!(rsp.code(), 0xF2);
        assert_eq!(rsp.message(), "Response timed out");

        let pre: Error = PreconditionError {
            field: "qty",
            value: 70,
        }
        .into();
        assert_eq!(pre.code(), 0xFF);
        assert_eq!(pre.to_string(), "qty = 70 is out of range, must be 1..=69");
    }

    #[test]
    fn test_low_error_byte_is_not_synthetic() {
        let response = Response::Purge(PurgeRecord { error: 0x21 });
        let err = DeviceError::from_response(response);

        assert_eq!(err.code, UNKNOWN_ERROR);
        assert_eq!(err.message, "Unknown Error");
    }

    #[test]
    fn test_device_error_keeps_response() {
        let response = Response::Purge(PurgeRecord { error: 0x4E });
        let err: Error = DeviceError::from_response(response).into();

        assert_eq!(err.code(), 0x1E);
        assert_eq!(err.message(), "Purge error (Jam at Div Sensor)");
        assert_eq!(err.response(), Some(&response));
    }
}
