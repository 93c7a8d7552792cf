//! Arduino Due pin bindings for the SMC signals.
//!
//! The Due was not designed for external memories: D8/D9 (PC10/PC11) and A6
//! (PC27) are not connected, NCS2 (PB24) is not connected, A5 (PC26) is wired
//! to NRD (PA29), NRD doubles as SPI NPCS1 and NCS3 (PB27) drives the "L" LED.

use core::fmt;

use bitflags::bitflags;

/// Number of address lines that are usable on the board (A0-A5).
pub const MAX_ADDRESS_LINES: u8 = 6;

/// PIO controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
}

/// Peripheral selected in PIO_ABSR.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Function {
    A,
    B,
}

bitflags! {
    /// Electrical attributes applied when routing a pin.
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct PinAttributes: u8 {
        const PULL_UP = 1 << 0;
        const DIGITAL = 1 << 1;
    }
}

/// Logical SMC signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    Data(u8),
    Address(u8),
    ReadStrobe,
    WriteStrobe,
    ChipSelect(u8),
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Data(n) => write!(f, "D{n}"),
            Signal::Address(n) => write!(f, "A{n}"),
            Signal::ReadStrobe => f.write_str("NRD"),
            Signal::WriteStrobe => f.write_str("NWE"),
            Signal::ChipSelect(n) => write!(f, "NCS{n}"),
        }
    }
}

/// Where a signal lives and how its pin has to be set up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinBinding {
    pub signal: Signal,
    pub port: Port,
    pub pin: u8,
    pub function: Function,
    pub attributes: PinAttributes,
}

impl PinBinding {
    /// Bit of this pin in the PIO registers.
    pub const fn mask(&self) -> u32 {
        1 << self.pin
    }
}

const fn bus_pin(signal: Signal, port: Port, pin: u8, function: Function) -> PinBinding {
    PinBinding {
        signal,
        port,
        pin,
        function,
        attributes: PinAttributes::PULL_UP.union(PinAttributes::DIGITAL),
    }
}

/// D0-D7 on PC2-PC9 (Due pins 34-41).
pub const DATA_PINS: [PinBinding; 8] = [
    bus_pin(Signal::Data(0), Port::C, 2, Function::A),
    bus_pin(Signal::Data(1), Port::C, 3, Function::A),
    bus_pin(Signal::Data(2), Port::C, 4, Function::A),
    bus_pin(Signal::Data(3), Port::C, 5, Function::A),
    bus_pin(Signal::Data(4), Port::C, 6, Function::A),
    bus_pin(Signal::Data(5), Port::C, 7, Function::A),
    bus_pin(Signal::Data(6), Port::C, 8, Function::A),
    bus_pin(Signal::Data(7), Port::C, 9, Function::A),
];

/// A0-A5 on PC21-PC26 (Due PWM9 down to PWM4), routed low to high.
pub const ADDRESS_PINS: [PinBinding; MAX_ADDRESS_LINES as usize] = [
    bus_pin(Signal::Address(0), Port::C, 21, Function::A),
    bus_pin(Signal::Address(1), Port::C, 22, Function::A),
    bus_pin(Signal::Address(2), Port::C, 23, Function::A),
    bus_pin(Signal::Address(3), Port::C, 24, Function::A),
    bus_pin(Signal::Address(4), Port::C, 25, Function::A),
    bus_pin(Signal::Address(5), Port::C, 26, Function::A),
];

/// NRD on PA29. Shared with SPI NPCS1.
pub const READ_STROBE_PIN: PinBinding = bus_pin(Signal::ReadStrobe, Port::A, 29, Function::B);

/// NWE on PC18 (Due pin 45).
pub const WRITE_STROBE_PIN: PinBinding = bus_pin(Signal::WriteStrobe, Port::C, 18, Function::A);

/// NCS0 on PA6 (Due AD4).
pub const NCS0_PIN: PinBinding = bus_pin(Signal::ChipSelect(0), Port::A, 6, Function::B);

/// NCS1 on PA7 (Due pin 31).
pub const NCS1_PIN: PinBinding = bus_pin(Signal::ChipSelect(1), Port::A, 7, Function::B);

/// NCS2 on PB24. Not connected on the Due, never routed.
pub const NCS2_PIN: PinBinding = bus_pin(Signal::ChipSelect(2), Port::B, 24, Function::B);

/// NCS3 on PB27 (Due PWM13, shared with the "L" LED).
pub const NCS3_PIN: PinBinding = bus_pin(Signal::ChipSelect(3), Port::B, 27, Function::A);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_pins_are_ordered_low_to_high() {
        for (n, binding) in ADDRESS_PINS.iter().enumerate() {
            assert_eq!(binding.signal, Signal::Address(n as u8));
            assert_eq!(binding.port, Port::C);
            assert_eq!(binding.pin, 21 + n as u8);
        }
    }

    #[test]
    fn every_bus_pin_is_a_pulled_up_digital_pin() {
        let control = [READ_STROBE_PIN, WRITE_STROBE_PIN, NCS0_PIN, NCS1_PIN, NCS2_PIN, NCS3_PIN];
        for binding in DATA_PINS.iter().chain(&ADDRESS_PINS).chain(&control) {
            assert!(binding.attributes.contains(PinAttributes::PULL_UP | PinAttributes::DIGITAL));
        }
    }

    #[test]
    fn signal_names() {
        assert_eq!(Signal::Data(7).to_string(), "D7");
        assert_eq!(Signal::Address(5).to_string(), "A5");
        assert_eq!(Signal::ReadStrobe.to_string(), "NRD");
        assert_eq!(Signal::ChipSelect(3).to_string(), "NCS3");
        assert_eq!(NCS3_PIN.mask(), 1 << 27);
    }
}
