//! Bus configuration and byte access.

use core::ptr;

use tock_registers::interfaces::{Readable, Writeable};

use crate::{
    chip_select::ChipSelect,
    pins::{ADDRESS_PINS, DATA_PINS, MAX_ADDRESS_LINES, READ_STROBE_PIN, WRITE_STROBE_PIN},
    platform::{PeripheralClock, PinMux, SMC_PERIPHERAL_ID},
    regs::{ChipSelectRegisters, Smc},
    timing::{self, CycleTiming, PulseTiming, ReadMode, SetupTiming, Timing, WriteMode},
};

/// Offsets are wrapped to the 16 MiB window of a chip select.
pub const WINDOW_MASK: u32 = 0x00FF_FFFF;

/// Byte-wide access to an external bus.
///
/// Protocol layers such as [`crate::DisplayBus`] are written against this
/// trait rather than against [`ParallelBus`].
pub trait BusAccess {
    /// Writes `value` at `offset` within the bus window.
    fn write(&mut self, offset: u32, value: u8);
    /// Reads the byte at `offset` within the bus window.
    fn read(&mut self, offset: u32) -> u8;
}

/// Which signals the bus drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    pub chip_select: ChipSelect,
    /// Requested number of address lines. Anything above
    /// [`MAX_ADDRESS_LINES`] is treated as [`MAX_ADDRESS_LINES`].
    pub address_lines: u8,
    /// Route NRD. Takes the pin away from SPI NPCS1.
    pub read_strobe: bool,
    /// Route NWE.
    pub write_strobe: bool,
}

impl BusConfig {
    /// Describes a bus on `chip_select` with `address_lines` address lines and
    /// the selected strobes.
    pub const fn new(chip_select: ChipSelect, address_lines: u8, read_strobe: bool, write_strobe: bool) -> Self {
        Self {
            chip_select,
            address_lines,
            read_strobe,
            write_strobe,
        }
    }

    /// Number of address lines that actually get routed.
    pub const fn effective_address_lines(&self) -> u8 {
        if self.address_lines > MAX_ADDRESS_LINES {
            MAX_ADDRESS_LINES
        } else {
            self.address_lines
        }
    }
}

/// Memory window of the active chip select.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BusWindow {
    base: usize,
}

impl BusWindow {
    const fn new(base: usize) -> Self {
        Self { base }
    }

    /// First address of the window.
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Address accessed for `offset`.
    pub const fn address_of(&self, offset: u32) -> usize {
        self.base + (offset & WINDOW_MASK) as usize
    }

    #[inline]
    fn write(&self, offset: u32, value: u8) {
        unsafe { ptr::write_volatile(self.address_of(offset) as *mut u8, value) }
    }

    #[inline]
    fn read(&self, offset: u32) -> u8 {
        unsafe { ptr::read_volatile(self.address_of(offset) as *const u8) }
    }
}

/// External 8-bit bus on the SAM3X Static Memory Controller.
///
/// Creating the bus configures it, so every access happens after the pins are
/// routed and the SMC is clocked. Timing starts at the SMC reset values until
/// one of the timing setters is called.
///
/// # Example
///
/// ```no_run
/// use sam3x_parallel_bus::{BusConfig, ChipSelect, ParallelBus, sam3x};
///
/// let mut bus = unsafe {
///     ParallelBus::new(
///         sam3x::smc(),
///         sam3x::Pio::steal(),
///         sam3x::Pmc::steal(),
///         &BusConfig::new(ChipSelect::Cs1, 1, true, true),
///     )
/// };
/// bus.set_address_setup_timing(1, 0, 1, 0);
/// bus.set_pulse_timing(4, 6, 4, 6);
/// bus.set_cycle_timing(6, 6);
///
/// bus.write(0, 0x2C);
/// let status = bus.read(1);
/// ```
pub struct ParallelBus<M, C> {
    smc: Smc,
    pins: M,
    clock: C,
    chip_select: ChipSelect,
    window: BusWindow,
}

impl<M: PinMux, C: PeripheralClock> ParallelBus<M, C> {
    /// Routes the pins named by `config`, enables the SMC clock and programs the
    /// chip select for an 8-bit bus.
    ///
    /// # Safety
    ///
    /// `smc` must view the SMC register block, and the pins routed here must not
    /// be in use by anything else.
    pub unsafe fn new(smc: Smc, pins: M, clock: C, config: &BusConfig) -> Self {
        let mut bus = Self {
            smc,
            pins,
            clock,
            chip_select: config.chip_select,
            window: BusWindow::new(config.chip_select.base_address() as usize),
        };
        bus.configure(config);
        bus
    }

    /// Reconfigures the bus.
    ///
    /// Routing is additive: switching to another chip select leaves the pin of
    /// the previous one routed to the SMC.
    pub fn configure(&mut self, config: &BusConfig) {
        let address_lines = config.effective_address_lines();

        for binding in &DATA_PINS {
            self.pins.route(binding);
        }
        for binding in &ADDRESS_PINS[..usize::from(address_lines)] {
            self.pins.route(binding);
        }
        if config.read_strobe {
            self.pins.route(&READ_STROBE_PIN);
        }
        if config.write_strobe {
            self.pins.route(&WRITE_STROBE_PIN);
        }
        if let Some(binding) = config.chip_select.pin() {
            self.pins.route(binding);
        }

        // A5 (PC26) and NRD (PA29) are tied together on the Due.
        if config.read_strobe && address_lines == MAX_ADDRESS_LINES {
            warn!("A5 and NRD share a trace on the Arduino Due; reads will drive A5");
        }

        self.chip_select = config.chip_select;
        self.window = BusWindow::new(config.chip_select.base_address() as usize);

        self.clock.enable(SMC_PERIPHERAL_ID);
        self.registers()
            .mode
            .write(timing::mode_value(ReadMode::NrdControlled, WriteMode::NweControlled));

        debug!(
            "SMC bus on {}: window {=u32:#x}, {=u8} address lines, NRD {=bool}, NWE {=bool}",
            config.chip_select,
            self.address(),
            address_lines,
            config.read_strobe,
            config.write_strobe,
        );
    }

    /// Releases the parts the bus was built from. Pin routing and register
    /// contents are left as they are.
    pub fn release(self) -> (Smc, M, C) {
        (self.smc, self.pins, self.clock)
    }
}

impl<M, C> ParallelBus<M, C> {
    fn registers(&self) -> &ChipSelectRegisters {
        &self.smc.cs[self.chip_select.register_set()]
    }

    /// The SMC only applies new setup, pulse and cycle values once SMC_MODE is
    /// written.
    fn latch_timing(&self) {
        let mode = &self.registers().mode;
        mode.set(mode.get());
    }

    /// Sets the address setup lengths, in MCK cycles, before NWE, NCS in a
    /// write, NRD and NCS in a read.
    pub fn set_address_setup_timing(&mut self, nwe: u8, ncs_write: u8, nrd: u8, ncs_read: u8) {
        self.set_setup(&SetupTiming::new(nwe, ncs_write, nrd, ncs_read));
    }

    /// Sets the pulse lengths, in MCK cycles, of NWE, NCS in a write, NRD and
    /// NCS in a read.
    pub fn set_pulse_timing(&mut self, nwe: u8, ncs_write: u8, nrd: u8, ncs_read: u8) {
        self.set_pulse(&PulseTiming::new(nwe, ncs_write, nrd, ncs_read));
    }

    /// Sets the total write and read cycle lengths, in MCK cycles.
    pub fn set_cycle_timing(&mut self, write_total: u16, read_total: u16) {
        self.set_cycle(&CycleTiming::new(write_total, read_total));
    }

    /// Selects which signals latch data. Clears every other SMC_MODE option
    /// and keeps the bus 8 bits wide.
    pub fn set_mode(&mut self, read: ReadMode, write: WriteMode) {
        trace!("SMC mode: read {}, write {}", read, write);
        self.registers().mode.write(timing::mode_value(read, write));
    }

    /// Same as [`Self::set_address_setup_timing`].
    pub fn set_setup(&mut self, setup: &SetupTiming) {
        trace!("SMC setup: {}", setup);
        self.registers().setup.write(setup.field_value());
        self.latch_timing();
    }

    /// Same as [`Self::set_pulse_timing`].
    pub fn set_pulse(&mut self, pulse: &PulseTiming) {
        trace!("SMC pulse: {}", pulse);
        self.registers().pulse.write(pulse.field_value());
        self.latch_timing();
    }

    /// Same as [`Self::set_cycle_timing`].
    pub fn set_cycle(&mut self, cycle: &CycleTiming) {
        trace!("SMC cycle: {}", cycle);
        self.registers().cycle.write(cycle.field_value());
        self.latch_timing();
    }

    /// Programs a complete timing, mode last.
    pub fn set_timing(&mut self, timing: &Timing) {
        let registers = self.registers();
        registers.setup.write(timing.setup.field_value());
        registers.pulse.write(timing.pulse.field_value());
        registers.cycle.write(timing.cycle.field_value());
        self.set_mode(timing.read_mode, timing.write_mode);
    }

    /// Reads the timing of the active chip select back from the SMC.
    pub fn timing(&self) -> Timing {
        use crate::regs::MODE;

        let registers = self.registers();
        let read_mode = if registers.mode.is_set(MODE::READ_MODE) {
            ReadMode::NrdControlled
        } else {
            ReadMode::NcsControlled
        };
        let write_mode = if registers.mode.is_set(MODE::WRITE_MODE) {
            WriteMode::NweControlled
        } else {
            WriteMode::NcsControlled
        };
        Timing::new(
            SetupTiming::read_from(&registers.setup),
            PulseTiming::read_from(&registers.pulse),
            CycleTiming::read_from(&registers.cycle),
            read_mode,
            write_mode,
        )
    }

    /// Channel the bus was last configured for.
    pub fn chip_select(&self) -> ChipSelect {
        self.chip_select
    }

    /// Base address of the memory window. Without a chip select this is the
    /// NCS0 window.
    pub fn address(&self) -> u32 {
        self.window.base() as u32
    }

    /// The memory window accesses go to.
    pub fn window(&self) -> BusWindow {
        self.window
    }

    /// Writes one byte at `offset` within the window, using the programmed
    /// write cycle. Only the low 24 bits of `offset` are used.
    #[inline]
    pub fn write(&self, offset: u32, value: u8) {
        self.window.write(offset, value);
    }

    /// Reads one byte at `offset` within the window. Whatever is on the data
    /// lines at the end of the read cycle is returned; there is no way to tell
    /// whether a device answered.
    #[inline]
    pub fn read(&self, offset: u32) -> u8 {
        self.window.read(offset)
    }
}

impl<M, C> BusAccess for ParallelBus<M, C> {
    #[inline]
    fn write(&mut self, offset: u32, value: u8) {
        ParallelBus::write(self, offset, value);
    }

    #[inline]
    fn read(&mut self, offset: u32) -> u8 {
        ParallelBus::read(self, offset)
    }
}

impl<B: BusAccess + ?Sized> BusAccess for &mut B {
    fn write(&mut self, offset: u32, value: u8) {
        B::write(self, offset, value)
    }

    fn read(&mut self, offset: u32) -> u8 {
        B::read(self, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fake::{FakeBlock, FakeSmc, RecordingClock, RecordingPins},
        pins::{NCS0_PIN, NCS1_PIN, PinBinding, Signal},
        regs::{CYCLE, MODE, PULSE, SETUP},
    };

    // Offsets of the NCS1 registers inside the SMC block.
    const CS1_SETUP: usize = 0x84;
    const CS1_PULSE: usize = 0x88;
    const CS1_CYCLE: usize = 0x8C;
    const CS1_MODE: usize = 0x94;

    fn bus<'a>(
        fake: &FakeSmc,
        pins: &'a mut RecordingPins,
        clock: &'a mut RecordingClock,
        config: BusConfig,
    ) -> ParallelBus<&'a mut RecordingPins, &'a mut RecordingClock> {
        unsafe { ParallelBus::new(Smc::new(fake.addr()), pins, clock, &config) }
    }

    fn signals(routed: &[PinBinding]) -> Vec<Signal> {
        routed.iter().map(|binding| binding.signal).collect()
    }

    #[test]
    fn routes_data_then_address_then_strobes_then_chip_select() {
        let fake = FakeSmc::new();
        let (mut pins, mut clock) = Default::default();
        bus(&fake, &mut pins, &mut clock, BusConfig::new(ChipSelect::Cs1, 2, true, true));

        let mut expected: Vec<Signal> = (0..8).map(Signal::Data).collect();
        expected.extend([
            Signal::Address(0),
            Signal::Address(1),
            Signal::ReadStrobe,
            Signal::WriteStrobe,
            Signal::ChipSelect(1),
        ]);
        assert_eq!(signals(&pins.routed), expected);
        assert_eq!(clock.enabled, [SMC_PERIPHERAL_ID]);
    }

    #[test]
    fn address_lines_are_clamped() {
        let fake = FakeSmc::new();
        let (mut clamped, mut clock) = Default::default();
        bus(&fake, &mut clamped, &mut clock, BusConfig::new(ChipSelect::Cs0, 200, false, false));

        let mut exact = RecordingPins::default();
        bus(&fake, &mut exact, &mut clock, BusConfig::new(ChipSelect::Cs0, MAX_ADDRESS_LINES, false, false));

        assert_eq!(clamped.routed, exact.routed);
        assert_eq!(clamped.routed[8..14], ADDRESS_PINS);
    }

    #[test]
    fn strobes_are_optional() {
        let fake = FakeSmc::new();
        let (mut pins, mut clock) = Default::default();
        bus(&fake, &mut pins, &mut clock, BusConfig::new(ChipSelect::Cs0, 0, false, true));

        let routed = signals(&pins.routed);
        assert!(!routed.contains(&Signal::ReadStrobe));
        assert!(routed.contains(&Signal::WriteStrobe));
    }

    #[test]
    fn configure_programs_an_eight_bit_read_write_mode() {
        let fake = FakeSmc::new();
        let (mut pins, mut clock) = Default::default();
        let bus = bus(&fake, &mut pins, &mut clock, BusConfig::new(ChipSelect::Cs1, 0, true, true));

        assert_eq!(fake.word(CS1_MODE), 0b11);
        assert!(!bus.registers().mode.is_set(MODE::DBW));
        assert_eq!(bus.address(), 0x6100_0000);
    }

    #[test]
    fn no_chip_select_uses_the_first_window_and_register_set() {
        let fake = FakeSmc::new();
        let (mut pins, mut clock) = Default::default();
        let bus = bus(&fake, &mut pins, &mut clock, BusConfig::new(ChipSelect::None, 0, false, false));

        assert_eq!(bus.address(), 0x6000_0000);
        assert_eq!(fake.word(0x80), 0b11);
        assert!(pins.routed.iter().all(|binding| !matches!(binding.signal, Signal::ChipSelect(_))));
    }

    #[test]
    fn reconfiguring_rebinds_without_unrouting() {
        let fake = FakeSmc::new();
        let (mut pins, mut clock) = Default::default();
        let mut bus = bus(&fake, &mut pins, &mut clock, BusConfig::new(ChipSelect::Cs0, 0, false, true));
        bus.configure(&BusConfig::new(ChipSelect::Cs1, 0, false, true));

        assert_eq!(bus.address(), 0x6100_0000);
        assert_eq!(bus.chip_select(), ChipSelect::Cs1);
        drop(bus);
        assert!(pins.routed.contains(&NCS0_PIN));
        assert!(pins.routed.contains(&NCS1_PIN));
    }

    #[test]
    fn setters_write_the_active_register_set() {
        let fake = FakeSmc::new();
        let (mut pins, mut clock) = Default::default();
        let mut bus = bus(&fake, &mut pins, &mut clock, BusConfig::new(ChipSelect::Cs1, 0, true, true));

        bus.set_address_setup_timing(1, 2, 3, 4);
        bus.set_pulse_timing(5, 6, 7, 8);
        bus.set_cycle_timing(300, 12);
        bus.set_mode(ReadMode::NcsControlled, WriteMode::NweControlled);

        assert_eq!(fake.word(CS1_SETUP), 0x0403_0201);
        assert_eq!(fake.word(CS1_PULSE), 0x0807_0605);
        assert_eq!(fake.word(CS1_CYCLE), 0x000C_012C);
        assert_eq!(fake.word(CS1_MODE), 0b10);

        let registers = bus.registers();
        assert_eq!(registers.setup.read(SETUP::NCS_RD_SETUP), 4);
        assert_eq!(registers.pulse.read(PULSE::NRD_PULSE), 7);
        assert_eq!(registers.cycle.read(CYCLE::NWE_CYCLE), 300);

        // NCS0 untouched
        assert_eq!(fake.word(0x70), 0);
    }

    #[test]
    fn timing_setters_leave_mode_unchanged() {
        let fake = FakeSmc::new();
        let (mut pins, mut clock) = Default::default();
        let mut bus = bus(&fake, &mut pins, &mut clock, BusConfig::new(ChipSelect::Cs1, 0, true, true));

        bus.set_mode(ReadMode::NcsControlled, WriteMode::NcsControlled);
        bus.set_address_setup_timing(2, 2, 2, 2);
        bus.set_pulse_timing(3, 3, 3, 3);
        bus.set_cycle_timing(8, 8);

        assert_eq!(fake.word(CS1_MODE), 0);
    }

    #[test]
    fn cycle_lengths_wrap_at_nine_bits() {
        let fake = FakeSmc::new();
        let (mut pins, mut clock) = Default::default();
        let mut bus = bus(&fake, &mut pins, &mut clock, BusConfig::new(ChipSelect::None, 0, true, true));

        bus.set_cycle_timing(600, 600);

        // NCS0 SMC_CYCLE
        assert_eq!(fake.word(0x78), 0x0058_0058);
        assert_eq!(fake.word(0x80), 0b11);
        assert_eq!(bus.timing().cycle, CycleTiming::new(600 & CycleTiming::MAX, 600 & CycleTiming::MAX));
    }

    #[test]
    fn timing_round_trips() {
        let fake = FakeSmc::new();
        let (mut pins, mut clock) = Default::default();
        let mut bus = bus(&fake, &mut pins, &mut clock, BusConfig::new(ChipSelect::Cs3, 0, true, true));

        let timing = Timing::new(
            SetupTiming::new(0, 1, 2, 3),
            PulseTiming::new(10, 20, 30, 40),
            CycleTiming::new(50, 60),
            ReadMode::NcsControlled,
            WriteMode::NcsControlled,
        );
        bus.set_timing(&timing);
        assert_eq!(bus.timing(), timing);
    }

    #[test]
    fn accesses_wrap_at_the_window_size() {
        let window = BusWindow::new(0x6100_0000);
        assert_eq!(window.address_of(0x12), 0x6100_0012);
        assert_eq!(window.address_of(0x0100_0012), 0x6100_0012);
        assert_eq!(window.address_of(0xFFFF_FFFF), 0x61FF_FFFF);
    }

    #[test]
    fn read_and_write_touch_exactly_one_byte() {
        let fake = FakeSmc::new();
        let memory = FakeBlock::<4>::new();
        let (mut pins, mut clock) = Default::default();
        let mut bus = bus(&fake, &mut pins, &mut clock, BusConfig::new(ChipSelect::Cs0, 0, true, true));
        bus.window = BusWindow::new(memory.addr());

        bus.write(0x0500_0001, 0xA5);
        bus.write(2, 0x5A);

        assert_eq!(memory.word(0).to_ne_bytes(), [0x00, 0xA5, 0x5A, 0x00]);
        assert_eq!(bus.read(1), 0xA5);
        assert_eq!(bus.read(0xFF00_0002), 0x5A);
    }
}
