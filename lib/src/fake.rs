//! Memory-backed stand-ins for peripherals, used by unit tests.

use core::cell::UnsafeCell;

use crate::{
    bus::BusAccess,
    pins::PinBinding,
    platform::{PeripheralClock, PinMux},
};

/// Zeroed, word-aligned memory that a register block view can point at.
pub struct FakeBlock<const WORDS: usize> {
    words: Box<UnsafeCell<[u32; WORDS]>>,
}

impl<const WORDS: usize> FakeBlock<WORDS> {
    pub fn new() -> Self {
        Self {
            words: Box::new(UnsafeCell::new([0; WORDS])),
        }
    }

    pub fn addr(&self) -> usize {
        self.words.get() as usize
    }

    /// Word at byte offset `offset`.
    pub fn word(&self, offset: usize) -> u32 {
        assert!(offset % 4 == 0 && offset / 4 < WORDS);
        unsafe { core::ptr::read_volatile((self.words.get() as *const u32).add(offset / 4)) }
    }

    /// Stores `value` at byte offset `offset`, e.g. to fake a status register.
    pub fn set_word(&self, offset: usize, value: u32) {
        assert!(offset % 4 == 0 && offset / 4 < WORDS);
        unsafe { core::ptr::write_volatile((self.words.get() as *mut u32).add(offset / 4), value) }
    }
}

/// SMC-sized fake block.
pub type FakeSmc = FakeBlock<{ 0x110 / 4 }>;

/// Records every routed pin in call order.
#[derive(Default)]
pub struct RecordingPins {
    pub routed: Vec<PinBinding>,
}

impl PinMux for RecordingPins {
    fn route(&mut self, binding: &PinBinding) {
        self.routed.push(*binding);
    }
}

/// Counts clock enables per peripheral id.
#[derive(Default)]
pub struct RecordingClock {
    pub enabled: Vec<u32>,
}

impl PeripheralClock for RecordingClock {
    fn enable(&mut self, peripheral_id: u32) {
        self.enabled.push(peripheral_id);
    }
}

/// Transfer seen by [`RecordingBus`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    Write(u32, u8),
    Read(u32),
}

/// Records bus transfers; reads return `read_value`.
#[derive(Default)]
pub struct RecordingBus {
    pub transfers: Vec<Transfer>,
    pub read_value: u8,
}

impl BusAccess for RecordingBus {
    fn write(&mut self, offset: u32, value: u8) {
        self.transfers.push(Transfer::Write(offset, value));
    }

    fn read(&mut self, offset: u32) -> u8 {
        self.transfers.push(Transfer::Read(offset));
        self.read_value
    }
}
