//! Device error codes
//!
//! Every response carries an ERROR byte. `0x30` means no error, and
//! subtracting that base yields one of the codes below. The three codes
//! at the top of the range never come from the device: the driver
//! synthesizes them when the handshake itself fails.

/// ERROR byte for a successful operation
pub const NO_ERROR: u8 = 0x30;

/// ERROR byte for an operation that stopped normally
pub const NORMAL_STOP: u8 = 0x31;

/// Synthetic code: no ACK after every send attempt
pub const ACK_TIMEOUT: u8 = 0xF1;

/// Synthetic code: no valid response after every read attempt
pub const RESPONSE_TIMEOUT: u8 = 0xF2;

/// Catch-all for codes missing from the table
pub const UNKNOWN_ERROR: u8 = 0xFF;

/// Whether a raw ERROR byte reports success
pub const fn is_success_byte(byte: u8) -> bool {
    byte == NO_ERROR || byte == NORMAL_STOP
}

/// Code for a raw ERROR byte (`byte - NO_ERROR`)
///
/// Bytes below `NO_ERROR` have no table entry and map to `UNKNOWN_ERROR`,
/// so a device byte never resolves to a driver-only code.
pub const fn code_from_byte(byte: u8) -> u8 {
    match byte.checked_sub(NO_ERROR) {
        Some(code) => code,
        None => UNKNOWN_ERROR,
    }
}

/// Named device and protocol conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    NormalStop = 0x01,
    PickupError = 0x02,
    JamAtChk12 = 0x03,
    OverflowBill = 0x04,
    JamAtExitOrEjt = 0x05,
    JamAtDiv = 0x06,
    UndefinedCommand = 0x07,
    UpperBillEnd = 0x08,
    CountingErrorChk34Div = 0x0A,
    NoteRequestError = 0x0B,
    CountingErrorDivEjt = 0x0C,
    CountingErrorEjtExit = 0x0D,
    RejectTrayNotRecognized = 0x0F,
    LowerBillEnd = 0x10,
    MotorStop = 0x11,
    JamAtDivSensor = 0x12,
    TimeoutDivToEjt = 0x13,
    OverReject = 0x14,
    UpperCassetteNotRecognized = 0x15,
    LowerCassetteNotRecognized = 0x16,
    DispensingTimeout = 0x17,
    JamAtEjt = 0x18,
    DiverterSolenoidError = 0x19,
    SolSensorError = 0x1A,
    JamAtChk34 = 0x1C,
    PurgeError = 0x1E,
    AckTimeout = ACK_TIMEOUT,
    ResponseTimeout = RESPONSE_TIMEOUT,
    Unknown = UNKNOWN_ERROR,
}

impl ErrorCode {
    /// Every entry of the table, in code order
    pub const ALL: [ErrorCode; 29] = [
        ErrorCode::NormalStop,
        ErrorCode::PickupError,
        ErrorCode::JamAtChk12,
        ErrorCode::OverflowBill,
        ErrorCode::JamAtExitOrEjt,
        ErrorCode::JamAtDiv,
        ErrorCode::UndefinedCommand,
        ErrorCode::UpperBillEnd,
        ErrorCode::CountingErrorChk34Div,
        ErrorCode::NoteRequestError,
        ErrorCode::CountingErrorDivEjt,
        ErrorCode::CountingErrorEjtExit,
        ErrorCode::RejectTrayNotRecognized,
        ErrorCode::LowerBillEnd,
        ErrorCode::MotorStop,
        ErrorCode::JamAtDivSensor,
        ErrorCode::TimeoutDivToEjt,
        ErrorCode::OverReject,
        ErrorCode::UpperCassetteNotRecognized,
        ErrorCode::LowerCassetteNotRecognized,
        ErrorCode::DispensingTimeout,
        ErrorCode::JamAtEjt,
        ErrorCode::DiverterSolenoidError,
        ErrorCode::SolSensorError,
        ErrorCode::JamAtChk34,
        ErrorCode::PurgeError,
        ErrorCode::AckTimeout,
        ErrorCode::ResponseTimeout,
        ErrorCode::Unknown,
    ];

    /// Look up a numeric code
    pub const fn from_code(code: u8) -> Option<Self> {
        let code = match code {
            0x01 => ErrorCode::NormalStop,
            0x02 => ErrorCode::PickupError,
            0x03 => ErrorCode::JamAtChk12,
            0x04 => ErrorCode::OverflowBill,
            0x05 => ErrorCode::JamAtExitOrEjt,
            0x06 => ErrorCode::JamAtDiv,
            0x07 => ErrorCode::UndefinedCommand,
            0x08 => ErrorCode::UpperBillEnd,
            0x0A => ErrorCode::CountingErrorChk34Div,
            0x0B => ErrorCode::NoteRequestError,
            0x0C => ErrorCode::CountingErrorDivEjt,
            0x0D => ErrorCode::CountingErrorEjtExit,
            0x0F => ErrorCode::RejectTrayNotRecognized,
            0x10 => ErrorCode::LowerBillEnd,
            0x11 => ErrorCode::MotorStop,
            0x12 => ErrorCode::JamAtDivSensor,
            0x13 => ErrorCode::TimeoutDivToEjt,
            0x14 => ErrorCode::OverReject,
            0x15 => ErrorCode::UpperCassetteNotRecognized,
            0x16 => ErrorCode::LowerCassetteNotRecognized,
            0x17 => ErrorCode::DispensingTimeout,
            0x18 => ErrorCode::JamAtEjt,
            0x19 => ErrorCode::DiverterSolenoidError,
            0x1A => ErrorCode::SolSensorError,
            0x1C => ErrorCode::JamAtChk34,
            0x1E => ErrorCode::PurgeError,
            ACK_TIMEOUT => ErrorCode::AckTimeout,
            RESPONSE_TIMEOUT => ErrorCode::ResponseTimeout,
            UNKNOWN_ERROR => ErrorCode::Unknown,
            _ => return None,
        };
        Some(code)
    }

    /// Numeric code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable description
    pub const fn message(self) -> &'static str {
        match self {
            ErrorCode::NormalStop => "Normal stop",
            ErrorCode::PickupError => "Pickup error",
            ErrorCode::JamAtChk12 => "JAM at CHK1,2 Sensor",
            ErrorCode::OverflowBill => "Overflow bill",
            ErrorCode::JamAtExitOrEjt => "JAM at EXIT Sensor or EJT Sensor",
            ErrorCode::JamAtDiv => "JAM at DIV Sensor",
            ErrorCode::UndefinedCommand => "Undefined command",
            ErrorCode::UpperBillEnd => "Upper Bill-End",
            ErrorCode::CountingErrorChk34Div => {
                "Counting Error (between CHK3,4 Sensor and DIV Sensor)"
            }
            ErrorCode::NoteRequestError => "Note request error",
            ErrorCode::CountingErrorDivEjt => "Counting Error (between DIV Sensor and EJT Sensor)",
            ErrorCode::CountingErrorEjtExit => {
                "Counting Error (between EJT Sensor and EXIT Sensor)"
            }
            ErrorCode::RejectTrayNotRecognized => "Reject Tray is not recognized",
            ErrorCode::LowerBillEnd => "Lower Bill-End",
            ErrorCode::MotorStop => "Motor Stop",
            ErrorCode::JamAtDivSensor => "JAM at Div Sensor",
            ErrorCode::TimeoutDivToEjt => "Timeout (From DIV Sensor to EJT Sensor)",
            ErrorCode::OverReject => "Over Reject",
            ErrorCode::UpperCassetteNotRecognized => "Upper Cassette is not recognized",
            ErrorCode::LowerCassetteNotRecognized => "Lower Cassette is not recognized",
            ErrorCode::DispensingTimeout => "Dispensing timeout",
            ErrorCode::JamAtEjt => "JAM at EJT Sensor",
            ErrorCode::DiverterSolenoidError => "Diverter solenoid or SOL Sensor error",
            ErrorCode::SolSensorError => "SOL Sensor error",
            ErrorCode::JamAtChk34 => "JAM at CHK3,4 Sensor",
            ErrorCode::PurgeError => "Purge error (Jam at Div Sensor)",
            ErrorCode::AckTimeout => "ACK timed out",
            ErrorCode::ResponseTimeout => "Response timed out",
            ErrorCode::Unknown => "Unknown Error",
        }
    }

    /// Raised by the driver rather than reported by the device
    pub const fn is_synthetic(self) -> bool {
        matches!(
            self,
            ErrorCode::AckTimeout | ErrorCode::ResponseTimeout | ErrorCode::Unknown
        )
    }
}

/// Description for any numeric code, falling back to "Unknown Error"
pub const fn describe(code: u8) -> &'static str {
    match ErrorCode::from_code(code) {
        Some(known) => known.message(),
        None => ErrorCode::Unknown.message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_roundtrip() {
        for entry in ErrorCode::ALL {
            assert_eq!(ErrorCode::from_code(entry.code()), Some(entry));
        }
    }

    #[test]
    fn test_device_codes_in_range() {
        for entry in ErrorCode::ALL.iter().filter(|e| !e.is_synthetic()) {
            assert!((0x01..=0x1E).contains(&entry.code()));
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(0x02), "Pickup error");
        assert_eq!(describe(0xF1), "ACK timed out");
        assert_eq!(describe(0xF2), "Response timed out");
        // Gaps in the table
        assert_eq!(describe(0x09), "Unknown Error");
        assert_eq!(describe(0x40), "Unknown Error");
    }

    #[test]
    fn test_error_byte_helpers() {
        assert!(is_success_byte(0x30));
        assert!(is_success_byte(0x31));
        assert!(!is_success_byte(0x32));
        assert_eq!(code_from_byte(0x32), 0x02);
        assert_eq!(code_from_byte(0x4E), 0x1E);
    }

    #[test]
    fn test_low_bytes_never_synthetic() {
        assert_eq!(code_from_byte(0x21), UNKNOWN_ERROR);
        assert_eq!(code_from_byte(0x22), UNKNOWN_ERROR);
        assert_eq!(code_from_byte(0x2F), UNKNOWN_ERROR);
        assert_eq!(code_from_byte(0x00), UNKNOWN_ERROR);

        // Every byte the device can send stays out of the driver-only codes
        for byte in 0..=u8::MAX {
            let code = code_from_byte(byte);
            assert!(code != ACK_TIMEOUT && code != RESPONSE_TIMEOUT, "byte {byte:#04x}");
        }
    }
}
