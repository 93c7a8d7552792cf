//! Register layout of the SAM3X Static Memory Controller, PIO controllers and
//! Power Management Controller.
//!
//! Bit positions follow the SAM3X/SAM3A datasheet, chapter "Static Memory
//! Controller (SMC)", section "SMC User Interface".

use core::{marker::PhantomData, ops};

use tock_registers::{
    register_bitfields, register_structs,
    registers::{ReadOnly, ReadWrite, WriteOnly},
};

register_bitfields! {
    u32,

    /// SMC Setup Register
    pub SETUP [
        /// NWE setup length, in MCK cycles
        NWE_SETUP OFFSET(0) NUMBITS(6) [],
        /// NCS setup length in write access
        NCS_WR_SETUP OFFSET(8) NUMBITS(6) [],
        /// NRD setup length
        NRD_SETUP OFFSET(16) NUMBITS(6) [],
        /// NCS setup length in read access
        NCS_RD_SETUP OFFSET(24) NUMBITS(6) []
    ],

    /// SMC Pulse Register
    pub PULSE [
        /// NWE pulse length
        NWE_PULSE OFFSET(0) NUMBITS(7) [],
        /// NCS pulse length in write access
        NCS_WR_PULSE OFFSET(8) NUMBITS(7) [],
        /// NRD pulse length
        NRD_PULSE OFFSET(16) NUMBITS(7) [],
        /// NCS pulse length in read access
        NCS_RD_PULSE OFFSET(24) NUMBITS(7) []
    ],

    /// SMC Cycle Register
    pub CYCLE [
        /// Total write cycle length
        NWE_CYCLE OFFSET(0) NUMBITS(9) [],
        /// Total read cycle length
        NRD_CYCLE OFFSET(16) NUMBITS(9) []
    ],

    /// SMC Mode Register
    pub MODE [
        /// Which signal latches read data
        READ_MODE OFFSET(0) NUMBITS(1) [
            NcsControlled = 0,
            NrdControlled = 1
        ],
        /// Which signal latches write data
        WRITE_MODE OFFSET(1) NUMBITS(1) [
            NcsControlled = 0,
            NweControlled = 1
        ],
        /// NWAIT mode
        EXNW_MODE OFFSET(4) NUMBITS(2) [
            Disabled = 0,
            Frozen = 2,
            Ready = 3
        ],
        /// Byte access type, only meaningful on a 16-bit bus
        BAT OFFSET(8) NUMBITS(1) [],
        /// Data bus width
        DBW OFFSET(12) NUMBITS(1) [
            Bits8 = 0,
            Bits16 = 1
        ],
        /// Data float time
        TDF_CYCLES OFFSET(16) NUMBITS(4) [],
        /// TDF optimization
        TDF_MODE OFFSET(20) NUMBITS(1) [],
        /// Page mode enable
        PMEN OFFSET(24) NUMBITS(1) [],
        /// Page size
        PS OFFSET(28) NUMBITS(2) []
    ]
}

register_structs! {
    /// Registers of one chip select.
    pub ChipSelectRegisters {
        (0x00 => pub setup: ReadWrite<u32, SETUP::Register>),
        (0x04 => pub pulse: ReadWrite<u32, PULSE::Register>),
        (0x08 => pub cycle: ReadWrite<u32, CYCLE::Register>),
        (0x0C => pub timings: ReadWrite<u32>),
        (0x10 => pub mode: ReadWrite<u32, MODE::Register>),
        (0x14 => @END),
    },

    /// SMC register block. NAND flash controller and ECC registers are not used
    /// and left out.
    pub SmcRegisterBlock {
        (0x000 => _reserved0),
        (0x070 => pub cs: [ChipSelectRegisters; 8]),
        (0x110 => @END),
    },

    /// Parallel I/O controller. Only the registers needed for routing pins to
    /// peripherals and driving plain outputs are described.
    pub PioRegisterBlock {
        (0x00 => pub per: WriteOnly<u32>),
        (0x04 => pub pdr: WriteOnly<u32>),
        (0x08 => pub psr: ReadOnly<u32>),
        (0x0C => _reserved0),
        (0x10 => pub oer: WriteOnly<u32>),
        (0x14 => _reserved1),
        (0x30 => pub sodr: WriteOnly<u32>),
        (0x34 => pub codr: WriteOnly<u32>),
        (0x38 => _reserved2),
        (0x44 => pub idr: WriteOnly<u32>),
        (0x48 => _reserved3),
        (0x60 => pub pudr: WriteOnly<u32>),
        (0x64 => pub puer: WriteOnly<u32>),
        (0x68 => pub pusr: ReadOnly<u32>),
        (0x6C => _reserved4),
        (0x70 => pub absr: ReadWrite<u32>),
        (0x74 => @END),
    },

    /// Power Management Controller, peripheral clock registers only.
    pub PmcRegisterBlock {
        (0x000 => _reserved0),
        (0x010 => pub pcer0: WriteOnly<u32>),
        (0x014 => pub pcdr0: WriteOnly<u32>),
        (0x018 => pub pcsr0: ReadOnly<u32>),
        (0x01C => _reserved1),
        (0x100 => pub pcer1: WriteOnly<u32>),
        (0x104 => pub pcdr1: WriteOnly<u32>),
        (0x108 => pub pcsr1: ReadOnly<u32>),
        (0x10C => @END),
    }
}

/// SMC_SETUP, SMC_PULSE, SMC_CYCLE and SMC_MODE values after reset.
pub const SETUP_RESET: u32 = 0x0101_0101;
pub const PULSE_RESET: u32 = 0x0101_0101;
pub const CYCLE_RESET: u32 = 0x0003_0003;
pub const MODE_RESET: u32 = 0x1000_0003;

/// Typed view of a memory-mapped register block.
///
/// Allows writing `smc.cs[1].mode.get()` instead of dereferencing a raw
/// pointer at every access.
pub struct Mmio<T> {
    base: usize,
    phantom: PhantomData<fn() -> T>,
}

impl<T> Mmio<T> {
    /// Creates a view of the register block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must point to a live block laid out as `T` for as long as the
    /// view exists, and nothing else may hold a conflicting view of it.
    pub const unsafe fn new(base: usize) -> Self {
        Self {
            base,
            phantom: PhantomData,
        }
    }

    /// Address of the register block.
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl<T> ops::Deref for Mmio<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*(self.base as *const _) }
    }
}

/// SMC register block.
pub type Smc = Mmio<SmcRegisterBlock>;
