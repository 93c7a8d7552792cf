//! ILI9341 Display Example on the Arduino Due SMC bus
//!
//! This example drives an ILI9341 LCD controller through the Static Memory
//! Controller in 8-bit 8080 mode. It continuously fills the screen with red,
//! green and blue to show how fast the bus is.
//!
//! # Hardware Setup
//!
//! The display's RD input is tied high, so NRD stays free for SPI.
//!
//! ## Pin Connections
//!
//! | Function | SAM3X Pin | Due Pin | SMC Signal | Description        |
//! |----------|-----------|---------|------------|--------------------|
//! | CS       | PA7       | 31      | NCS1       | Chip Select        |
//! | WR       | PC18      | 45      | NWE        | Write Enable       |
//! | RS/DC    | PC21      | 9       | A0         | Register Select    |
//! | RST      | PB26      | 22      | GPIO       | Reset              |
//! | RD       |           | 3V3     |            | Read (unused)      |
//! | D0       | PC2       | 34      | D0         | Data bit 0         |
//! | D1       | PC3       | 35      | D1         | Data bit 1         |
//! | D2       | PC4       | 36      | D2         | Data bit 2         |
//! | D3       | PC5       | 37      | D3         | Data bit 3         |
//! | D4       | PC6       | 38      | D4         | Data bit 4         |
//! | D5       | PC7       | 39      | D5         | Data bit 5         |
//! | D6       | PC8       | 40      | D6         | Data bit 6         |
//! | D7       | PC9       | 41      | D7         | Data bit 7         |

#![no_std]
#![no_main]

use core::convert::Infallible;

use cortex_m::peripheral::DWT;
use cortex_m_rt::entry;
use defmt::info;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, OutputPin},
};
use ili9341::{DisplaySize240x320, Ili9341, Orientation};
use sam3x_parallel_bus::{
    BusConfig, ChipSelect, DisplayBus, ParallelBus, ReadMode, WriteMode, pins::Port, sam3x,
};
use tock_registers::interfaces::Writeable;
use {defmt_rtt as _, panic_probe as _};

/// Master clock out of reset: the 4 MHz internal RC oscillator.
const MCK_HZ: u32 = 4_000_000;

const WDT_MR: *mut u32 = 0x400E_1A54 as *mut u32;
const WDT_MR_WDDIS: u32 = 1 << 15;

/// Busy-wait delay counted in core cycles.
struct Delay;

impl DelayNs for Delay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = u64::from(ns) * u64::from(MCK_HZ) / 1_000_000_000;
        cortex_m::asm::delay((cycles as u32).max(1));
    }
}

/// A PIO pin driven as a plain output.
struct PioOutput {
    pio: sam3x::Pio,
    port: Port,
    mask: u32,
}

impl PioOutput {
    /// # Safety
    ///
    /// Nothing else may drive `port`/`pin`.
    unsafe fn new(port: Port, pin: u8) -> Self {
        let pio = unsafe { sam3x::Pio::steal() };
        let mask = 1 << pin;
        let registers = pio.port(port);
        registers.codr.set(mask);
        registers.oer.set(mask);
        registers.per.set(mask);
        Self { pio, port, mask }
    }
}

impl ErrorType for PioOutput {
    type Error = Infallible;
}

impl OutputPin for PioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pio.port(self.port).codr.set(self.mask);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pio.port(self.port).sodr.set(self.mask);
        Ok(())
    }
}

#[entry]
fn main() -> ! {
    // The watchdog is enabled out of reset and would fire during the first fill.
    unsafe { WDT_MR.write_volatile(WDT_MR_WDDIS) };

    let mut core = cortex_m::Peripherals::take().unwrap();
    core.DCB.enable_trace();
    core.DWT.enable_cycle_counter();
    info!("SAM3X initialized!");

    // NCS1 as chip select, A0 drives RS, write-only.
    let mut bus = unsafe {
        ParallelBus::new(
            sam3x::smc(),
            sam3x::Pio::steal(),
            sam3x::Pmc::steal(),
            &BusConfig::new(ChipSelect::Cs1, 1, false, true),
        )
    };
    // One MCK period is 250 ns, well above the controller's write cycle.
    bus.set_address_setup_timing(0, 0, 0, 0);
    bus.set_pulse_timing(1, 2, 1, 2);
    bus.set_cycle_timing(2, 2);
    bus.set_mode(ReadMode::NrdControlled, WriteMode::NweControlled);
    info!("Bus mapped at {=u32:#x}", bus.address());

    let lcd_interface = DisplayBus::new(bus, 0);

    // The ILI9341 driver will handle the reset sequence
    let reset_pin = unsafe { PioOutput::new(Port::B, 26) };

    let mut display = Ili9341::new(
        lcd_interface,
        reset_pin,
        &mut Delay,
        Orientation::Landscape, // 320x240 orientation
        DisplaySize240x320,
    )
    .unwrap();
    info!("Display initialized!");

    let colors = [
        ("RED", Rgb565::RED),
        ("GREEN", Rgb565::GREEN),
        ("BLUE", Rgb565::BLUE),
    ];

    loop {
        for (color_name, color) in colors.iter() {
            let start = DWT::cycle_count();
            display.clear(*color).unwrap();
            let cycles = DWT::cycle_count().wrapping_sub(start);
            let millis = cycles / (MCK_HZ / 1000);

            // 320x240 pixels at 16 bits per pixel = 153,600 bytes
            info!(
                "Filled screen with {} in {} ms (~{} KB/s)",
                color_name,
                millis,
                if millis > 0 { 153_600 * 1000 / (millis * 1024) } else { 0 }
            );

            Delay.delay_ms(1000);
        }
    }
}
