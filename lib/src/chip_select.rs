use core::fmt;

use crate::pins::{NCS0_PIN, NCS1_PIN, NCS3_PIN, PinBinding};

/// Chip select channel of the external bus.
///
/// NCS2 is not connected on the Arduino Due, so it has no variant:
///
/// ```compile_fail
/// let _ = sam3x_parallel_bus::ChipSelect::Cs2;
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelect {
    /// NCS0, Due pin AD4
    Cs0,
    /// NCS1, Due pin 31
    Cs1,
    /// NCS3, Due pin PWM13
    Cs3,
    /// No chip select line is driven. The bus still needs a memory window, so
    /// the NCS0 window and register set are used.
    None,
}

impl ChipSelect {
    /// Start of the NCS0 memory window, fixed by the SAM3X memory map.
    pub const CS0_BASE_ADDRESS: u32 = 0x6000_0000;
    /// Start of the NCS1 memory window.
    pub const CS1_BASE_ADDRESS: u32 = 0x6100_0000;
    /// Start of the NCS3 memory window.
    pub const CS3_BASE_ADDRESS: u32 = 0x6300_0000;

    /// First address of the memory window accessed through this channel.
    pub const fn base_address(self) -> u32 {
        match self {
            Self::Cs0 | Self::None => Self::CS0_BASE_ADDRESS,
            Self::Cs1 => Self::CS1_BASE_ADDRESS,
            Self::Cs3 => Self::CS3_BASE_ADDRESS,
        }
    }

    /// Pin carrying this chip select, if any.
    pub const fn pin(self) -> Option<&'static PinBinding> {
        match self {
            Self::Cs0 => Some(&NCS0_PIN),
            Self::Cs1 => Some(&NCS1_PIN),
            Self::Cs3 => Some(&NCS3_PIN),
            Self::None => None,
        }
    }

    /// Index of the SMC register set programmed for this channel.
    pub const fn register_set(self) -> usize {
        match self {
            Self::Cs0 | Self::None => 0,
            Self::Cs1 => 1,
            Self::Cs3 => 3,
        }
    }
}

/// Raw chip select number that does not name a usable channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelectError {
    /// NCS2 exists on the chip but is not wired out on the board.
    NotConnected,
    /// The SMC has four chip selects on this package.
    OutOfRange(u8),
}

impl fmt::Display for ChipSelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => f.write_str("chip select 2 is not connected"),
            Self::OutOfRange(n) => write!(f, "no chip select {n}"),
        }
    }
}

impl core::error::Error for ChipSelectError {}

impl TryFrom<u8> for ChipSelect {
    type Error = ChipSelectError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Cs0),
            1 => Ok(Self::Cs1),
            2 => Err(ChipSelectError::NotConnected),
            3 => Ok(Self::Cs3),
            n => Err(ChipSelectError::OutOfRange(n)),
        }
    }
}
