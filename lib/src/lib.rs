#![cfg_attr(not(test), no_std)]

//! External parallel bus for the SAM3X Static Memory Controller
//!
//! The Arduino Due brings the SMC data bus, NWE, a few address lines and some
//! chip selects out to its headers. This crate routes those pins, programs
//! the SMC for an 8-bit bus and gives byte access to the memory window of the
//! selected chip select. Every load or store in the window becomes one bus
//! cycle with the programmed timing, which is enough to drive the low
//! resolution LCD controllers that use indexed addressing.
//!
//! The board limits what the bus can do:
//!
//! - only 8 data lines (D8 and D9 are not connected),
//! - at most 6 address lines (A0-A5; A5 is tied to NRD),
//! - NCS2 is not connected, so chip selects 0, 1 and 3 are available,
//! - NRD is shared with SPI chip select 1.
//!
//! # Example
//!
//! ```no_run
//! use sam3x_parallel_bus::{BusConfig, ChipSelect, DisplayBus, ParallelBus, sam3x};
//! use display_interface::{DataFormat, WriteOnlyDataCommand};
//!
//! // NCS1 as chip select, A0 as register select, write-only controller.
//! let bus = unsafe {
//!     ParallelBus::new(
//!         sam3x::smc(),
//!         sam3x::Pio::steal(),
//!         sam3x::Pmc::steal(),
//!         &BusConfig::new(ChipSelect::Cs1, 1, false, true),
//!     )
//! };
//!
//! let mut lcd = DisplayBus::new(bus, 0);
//! lcd.send_commands(DataFormat::U8(&[0x01])).unwrap();
//! ```

// This must go first so the macros are visible to the other modules.
mod fmt;

mod bus;
mod chip_select;
mod interface;
pub mod pins;
pub mod platform;
pub mod regs;
pub mod sam3x;
pub mod timing;

#[cfg(test)]
mod fake;

pub use bus::{BusAccess, BusConfig, BusWindow, ParallelBus, WINDOW_MASK};
pub use chip_select::{ChipSelect, ChipSelectError};
pub use interface::DisplayBus;
pub use pins::MAX_ADDRESS_LINES;
pub use platform::{PeripheralClock, PinMux};
pub use timing::{CycleTiming, PulseTiming, ReadMode, SetupTiming, Timing, WriteMode};
