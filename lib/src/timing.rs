//! SMC timing parameters.
//!
//! All values are in MCK cycles and are written to the registers as given. The
//! datasheet's constraints between them (pulse plus setup not exceeding the
//! total cycle, the encoding of long setup times) are left to the caller.
//! Values wider than their register field are truncated to the field width.

use tock_registers::{
    fields::FieldValue,
    interfaces::Readable,
    registers::ReadWrite,
};

use crate::regs::{CYCLE, MODE, PULSE, SETUP};

/// Setup lengths, before the strobe or chip select is asserted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupTiming {
    /// Before NWE falls
    pub nwe: u8,
    /// Before NCS falls in a write access
    pub ncs_write: u8,
    /// Before NRD falls
    pub nrd: u8,
    /// Before NCS falls in a read access
    pub ncs_read: u8,
}

impl SetupTiming {
    /// Largest value the 6-bit fields hold
    pub const MAX: u8 = 63;

    pub const fn new(nwe: u8, ncs_write: u8, nrd: u8, ncs_read: u8) -> Self {
        Self {
            nwe,
            ncs_write,
            nrd,
            ncs_read,
        }
    }

    pub(crate) fn field_value(&self) -> FieldValue<u32, SETUP::Register> {
        SETUP::NWE_SETUP.val(self.nwe.into())
            + SETUP::NCS_WR_SETUP.val(self.ncs_write.into())
            + SETUP::NRD_SETUP.val(self.nrd.into())
            + SETUP::NCS_RD_SETUP.val(self.ncs_read.into())
    }

    pub(crate) fn read_from(register: &ReadWrite<u32, SETUP::Register>) -> Self {
        Self {
            nwe: register.read(SETUP::NWE_SETUP) as u8,
            ncs_write: register.read(SETUP::NCS_WR_SETUP) as u8,
            nrd: register.read(SETUP::NRD_SETUP) as u8,
            ncs_read: register.read(SETUP::NCS_RD_SETUP) as u8,
        }
    }
}

impl Default for SetupTiming {
    fn default() -> Self {
        Self::new(1, 1, 1, 1)
    }
}

/// Pulse lengths of the strobes and chip select.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTiming {
    /// NWE low time
    pub nwe: u8,
    /// NCS low time in a write access
    pub ncs_write: u8,
    /// NRD low time
    pub nrd: u8,
    /// NCS low time in a read access
    pub ncs_read: u8,
}

impl PulseTiming {
    /// Largest value the 7-bit fields hold
    pub const MAX: u8 = 127;

    pub const fn new(nwe: u8, ncs_write: u8, nrd: u8, ncs_read: u8) -> Self {
        Self {
            nwe,
            ncs_write,
            nrd,
            ncs_read,
        }
    }

    pub(crate) fn field_value(&self) -> FieldValue<u32, PULSE::Register> {
        PULSE::NWE_PULSE.val(self.nwe.into())
            + PULSE::NCS_WR_PULSE.val(self.ncs_write.into())
            + PULSE::NRD_PULSE.val(self.nrd.into())
            + PULSE::NCS_RD_PULSE.val(self.ncs_read.into())
    }

    pub(crate) fn read_from(register: &ReadWrite<u32, PULSE::Register>) -> Self {
        Self {
            nwe: register.read(PULSE::NWE_PULSE) as u8,
            ncs_write: register.read(PULSE::NCS_WR_PULSE) as u8,
            nrd: register.read(PULSE::NRD_PULSE) as u8,
            ncs_read: register.read(PULSE::NCS_RD_PULSE) as u8,
        }
    }
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self::new(1, 1, 1, 1)
    }
}

/// Total access cycle lengths.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleTiming {
    /// Length of a write access, NWE_CYCLE
    pub write_total: u16,
    /// Length of a read access, NRD_CYCLE
    pub read_total: u16,
}

impl CycleTiming {
    /// Largest value the 9-bit fields hold
    pub const MAX: u16 = 511;

    pub const fn new(write_total: u16, read_total: u16) -> Self {
        Self {
            write_total,
            read_total,
        }
    }

    pub(crate) fn field_value(&self) -> FieldValue<u32, CYCLE::Register> {
        CYCLE::NWE_CYCLE.val(self.write_total.into()) + CYCLE::NRD_CYCLE.val(self.read_total.into())
    }

    pub(crate) fn read_from(register: &ReadWrite<u32, CYCLE::Register>) -> Self {
        Self {
            write_total: register.read(CYCLE::NWE_CYCLE) as u16,
            read_total: register.read(CYCLE::NRD_CYCLE) as u16,
        }
    }
}

impl Default for CycleTiming {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

/// Signal that latches data on a read.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadMode {
    /// Data is latched on the rising edge of NCS
    NcsControlled,
    /// Data is latched on the rising edge of NRD
    #[default]
    NrdControlled,
}

/// Signal that ends a write.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteMode {
    /// The write ends on the rising edge of NCS
    NcsControlled,
    /// The write ends on the rising edge of NWE
    #[default]
    NweControlled,
}

/// SMC_MODE contents for the given latch signals on the 8-bit bus. Every other
/// field is cleared.
pub(crate) fn mode_value(read: ReadMode, write: WriteMode) -> FieldValue<u32, MODE::Register> {
    let read = match read {
        ReadMode::NcsControlled => MODE::READ_MODE::NcsControlled,
        ReadMode::NrdControlled => MODE::READ_MODE::NrdControlled,
    };
    let write = match write {
        WriteMode::NcsControlled => MODE::WRITE_MODE::NcsControlled,
        WriteMode::NweControlled => MODE::WRITE_MODE::NweControlled,
    };
    read + write + MODE::DBW::Bits8
}

/// Complete timing of one chip select.
///
/// The default is the SMC reset state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub setup: SetupTiming,
    pub pulse: PulseTiming,
    pub cycle: CycleTiming,
    pub read_mode: ReadMode,
    pub write_mode: WriteMode,
}

impl Timing {
    pub const fn new(
        setup: SetupTiming,
        pulse: PulseTiming,
        cycle: CycleTiming,
        read_mode: ReadMode,
        write_mode: WriteMode,
    ) -> Self {
        Self {
            setup,
            pulse,
            cycle,
            read_mode,
            write_mode,
        }
    }
}
