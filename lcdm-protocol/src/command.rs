//! Command catalog
//!
//! The LCDM-2000 understands a fixed set of commands. Each one knows its
//! code, how its parameters are laid out and how long the answer is.

use heapless::Vec;

use crate::frame::{CommandFrame, MAX_PARAMS};
use crate::quantity::Quantity;
use crate::response::ResponseLayout;

// Command codes
pub const CMD_PURGE: u8 = 0x44;
pub const CMD_UPPER_DISPENSE: u8 = 0x45;
pub const CMD_STATUS: u8 = 0x46;
pub const CMD_ROM_VERSION: u8 = 0x47;
pub const CMD_LOWER_DISPENSE: u8 = 0x55;
pub const CMD_UPPER_AND_LOWER_DISPENSE: u8 = 0x56;
pub const CMD_UPPER_TEST_DISPENSE: u8 = 0x76;
pub const CMD_LOWER_TEST_DISPENSE: u8 = 0x77;

/// Commands accepted by the dispenser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Clear the note path by passing notes to the reject tray
    Purge,
    /// Report sensor states
    Status,
    /// Report the firmware ROM version
    RomVersion,
    /// Dispense notes from the upper cassette
    UpperDispense(Quantity),
    /// Dispense notes from the lower cassette
    LowerDispense(Quantity),
    /// Dispense notes from both cassettes in one operation
    UpperAndLowerDispense { upper: Quantity, lower: Quantity },
    /// Move one note from the upper cassette to the reject tray
    UpperTestDispense,
    /// Move one note from the lower cassette to the reject tray
    LowerTestDispense,
}

impl Command {
    /// Command code byte
    pub const fn code(&self) -> u8 {
        match self {
            Command::Purge => CMD_PURGE,
            Command::Status => CMD_STATUS,
            Command::RomVersion => CMD_ROM_VERSION,
            Command::UpperDispense(_) => CMD_UPPER_DISPENSE,
            Command::LowerDispense(_) => CMD_LOWER_DISPENSE,
            Command::UpperAndLowerDispense { .. } => CMD_UPPER_AND_LOWER_DISPENSE,
            Command::UpperTestDispense => CMD_UPPER_TEST_DISPENSE,
            Command::LowerTestDispense => CMD_LOWER_TEST_DISPENSE,
        }
    }

    /// Short name for logs
    pub const fn name(&self) -> &'static str {
        match self {
            Command::Purge => "PURGE",
            Command::Status => "STATUS",
            Command::RomVersion => "ROM_VERSION",
            Command::UpperDispense(_) => "UPPER_DISPENSE",
            Command::LowerDispense(_) => "LOWER_DISPENSE",
            Command::UpperAndLowerDispense { .. } => "UPPER_AND_LOWER_DISPENSE",
            Command::UpperTestDispense => "UPPER_TEST_DISPENSE",
            Command::LowerTestDispense => "LOWER_TEST_DISPENSE",
        }
    }

    /// Encoded parameter bytes
    pub fn params(&self) -> Vec<u8, MAX_PARAMS> {
        let mut params = Vec::new();
        // At most two digit pairs, fits MAX_PARAMS
        match self {
            Command::UpperDispense(qty) | Command::LowerDispense(qty) => {
                let [high, low] = qty.to_digits();
                params.extend([high, low]);
            }
            Command::UpperAndLowerDispense { upper, lower } => {
                let [upper_high, upper_low] = upper.to_digits();
                let [lower_high, lower_low] = lower.to_digits();
                params.extend([upper_high, upper_low, lower_high, lower_low]);
            }
            _ => {}
        }
        params
    }

    /// Layout of the response to this command
    pub const fn response_layout(&self) -> ResponseLayout {
        match self {
            Command::Purge => ResponseLayout::ErrorOnly,
            Command::Status => ResponseLayout::Sensors,
            Command::RomVersion => ResponseLayout::RomVersion,
            Command::UpperDispense(_)
            | Command::LowerDispense(_)
            | Command::UpperTestDispense
            | Command::LowerTestDispense => ResponseLayout::SingleCassette,
            Command::UpperAndLowerDispense { .. } => ResponseLayout::DualCassette,
        }
    }

    /// Fixed size in bytes of the response frame
    pub const fn response_size(&self) -> usize {
        self.response_layout().frame_size()
    }

    /// Build the outbound frame
    pub fn to_frame(&self) -> CommandFrame {
        CommandFrame::from_params(self.code(), self.params())
    }
}
