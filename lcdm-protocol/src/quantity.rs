//! Note quantities and ASCII-digit count fields
//!
//! The dispenser exchanges counts as pairs of ASCII digits, tens first:
//! 12 notes travel as `0x31 0x32`. A count byte of `0x00` means the field
//! was never filled in and reads as zero.

use core::fmt;

/// Offset added to each decimal digit on the wire (ASCII '0')
pub const DIGIT_BASE: u8 = 0x30;

/// Smallest quantity a single dispense command accepts
pub const QTY_MIN: u8 = 1;

/// Largest quantity a single dispense command accepts
pub const QTY_MAX: u8 = 69;

/// Quantity outside `QTY_MIN..=QTY_MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuantityError {
    /// The rejected value
    pub value: u8,
}

impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "quantity {} out of range, must be {}..={}",
            self.value, QTY_MIN, QTY_MAX
        )
    }
}

/// Number of notes to dispense from one cassette, always in `1..=69`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Quantity(u8);

impl Quantity {
    /// Validate a requested quantity
    pub const fn new(value: u8) -> Result<Self, QuantityError> {
        if value >= QTY_MIN && value <= QTY_MAX {
            Ok(Self(value))
        } else {
            Err(QuantityError { value })
        }
    }

    /// The quantity as a plain integer
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Wire digits `[QTY_HIGH, QTY_LOW]`
    pub const fn to_digits(self) -> [u8; 2] {
        [self.0 / 10 + DIGIT_BASE, self.0 % 10 + DIGIT_BASE]
    }
}

impl TryFrom<u8> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u8 {
    fn from(qty: Quantity) -> Self {
        qty.0
    }
}

/// Decode one received digit byte
///
/// `0x00` reads as zero. Bytes below `DIGIT_BASE` saturate to zero.
pub const fn decode_digit(byte: u8) -> u8 {
    byte.saturating_sub(DIGIT_BASE)
}

/// Decode a `[HIGH, LOW]` digit pair into a count
pub const fn decode_count(high: u8, low: u8) -> u16 {
    decode_digit(high) as u16 * 10 + decode_digit(low) as u16
}
