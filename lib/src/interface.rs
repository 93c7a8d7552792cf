//! `display-interface` transport for 8080-style LCD controllers on the bus.
//!
//! The controller's RS (D/C) input is wired to one SMC address line. Commands
//! are written with that line low and data with it high, so both land in the
//! same chip select window at different offsets.

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};

use crate::{bus::BusAccess, pins::MAX_ADDRESS_LINES};

/// LCD controller behind an 8-bit bus.
///
/// Words are sent as two bus writes. `U16` and `U16BE` data go out high byte
/// first, `U16LE` low byte first.
pub struct DisplayBus<B> {
    bus: B,
    data_offset: u32,
}

impl<B: BusAccess> DisplayBus<B> {
    /// Wraps `bus`, with RS on address line `register_select_line`.
    ///
    /// The line must be one of the address lines routed when the bus was
    /// configured.
    pub fn new(bus: B, register_select_line: u8) -> Self {
        debug_assert!(register_select_line < MAX_ADDRESS_LINES);
        Self {
            bus,
            data_offset: 1 << register_select_line,
        }
    }

    /// Window offset of command writes: every address line low.
    pub const COMMAND_OFFSET: u32 = 0;

    /// Window offset of data accesses: the RS line high.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    /// Writes one command byte.
    #[inline]
    pub fn write_command(&mut self, value: u8) {
        self.bus.write(Self::COMMAND_OFFSET, value);
    }

    /// Writes one data byte.
    #[inline]
    pub fn write_data(&mut self, value: u8) {
        self.bus.write(self.data_offset, value);
    }

    /// Reads a data byte, for controllers that answer on the bus.
    #[inline]
    pub fn read_data(&mut self) -> u8 {
        self.bus.read(self.data_offset)
    }

    /// Returns the underlying bus.
    pub fn release(self) -> B {
        self.bus
    }

    fn send(&mut self, offset: u32, format: DataFormat<'_>) -> Result<(), DisplayError> {
        let mut put = |byte: u8| self.bus.write(offset, byte);
        match format {
            DataFormat::U8(items) => items.iter().copied().for_each(&mut put),
            DataFormat::U16(items) => {
                for item in items {
                    item.to_be_bytes().into_iter().for_each(&mut put);
                }
            }
            DataFormat::U16BE(items) => {
                for item in items {
                    item.to_be_bytes().into_iter().for_each(&mut put);
                }
            }
            DataFormat::U16LE(items) => {
                for item in items {
                    item.to_le_bytes().into_iter().for_each(&mut put);
                }
            }
            DataFormat::U8Iter(iterator) => iterator.for_each(&mut put),
            DataFormat::U16BEIter(iterator) => {
                for item in iterator {
                    item.to_be_bytes().into_iter().for_each(&mut put);
                }
            }
            DataFormat::U16LEIter(iterator) => {
                for item in iterator {
                    item.to_le_bytes().into_iter().for_each(&mut put);
                }
            }
            _ => return Err(DisplayError::DataFormatNotImplemented),
        }
        Ok(())
    }
}

impl<B: BusAccess> WriteOnlyDataCommand for DisplayBus<B> {
    fn send_commands(&mut self, cmd: DataFormat<'_>) -> Result<(), DisplayError> {
        self.send(Self::COMMAND_OFFSET, cmd)
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), DisplayError> {
        let offset = self.data_offset;
        self.send(offset, buf)
    }
}
