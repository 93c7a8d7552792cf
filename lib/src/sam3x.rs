//! SAM3X8E implementations of the platform services.

use tock_registers::interfaces::{Readable, Writeable};

use crate::{
    pins::{Function, PinAttributes, PinBinding, Port},
    platform::{PeripheralClock, PinMux},
    regs::{Mmio, PioRegisterBlock, PmcRegisterBlock, Smc},
};

/// Static Memory Controller registers.
pub const SMC_BASE: usize = 0x400E_0000;
/// Power Management Controller registers.
pub const PMC_BASE: usize = 0x400E_0600;
/// PIO controller A to D registers.
pub const PIOA_BASE: usize = 0x400E_0E00;
pub const PIOB_BASE: usize = 0x400E_1000;
pub const PIOC_BASE: usize = 0x400E_1200;
pub const PIOD_BASE: usize = 0x400E_1400;

/// The SMC register block.
///
/// # Safety
///
/// Only one owner of the SMC may exist at a time.
pub const unsafe fn smc() -> Smc {
    unsafe { Smc::new(SMC_BASE) }
}

/// The four PIO controllers.
pub struct Pio {
    a: Mmio<PioRegisterBlock>,
    b: Mmio<PioRegisterBlock>,
    c: Mmio<PioRegisterBlock>,
    d: Mmio<PioRegisterBlock>,
}

impl Pio {
    /// # Safety
    ///
    /// The pins routed through this value must not be driven by other code.
    pub const unsafe fn steal() -> Self {
        unsafe { Self::new(PIOA_BASE, PIOB_BASE, PIOC_BASE, PIOD_BASE) }
    }

    /// PIO controllers at arbitrary addresses.
    ///
    /// # Safety
    ///
    /// Each address must point to a PIO register block that stays valid for
    /// the lifetime of the value.
    pub const unsafe fn new(a: usize, b: usize, c: usize, d: usize) -> Self {
        unsafe {
            Self {
                a: Mmio::new(a),
                b: Mmio::new(b),
                c: Mmio::new(c),
                d: Mmio::new(d),
            }
        }
    }

    /// Registers of the controller for `port`.
    pub fn port(&self, port: Port) -> &PioRegisterBlock {
        match port {
            Port::A => &*self.a,
            Port::B => &*self.b,
            Port::C => &*self.c,
            Port::D => &*self.d,
        }
    }
}

impl PinMux for Pio {
    fn route(&mut self, binding: &PinBinding) {
        let registers = self.port(binding.port);
        let mask = binding.mask();

        registers.idr.set(mask);
        if binding.attributes.contains(PinAttributes::PULL_UP) {
            registers.puer.set(mask);
        } else {
            registers.pudr.set(mask);
        }
        let absr = registers.absr.get();
        match binding.function {
            Function::A => registers.absr.set(absr & !mask),
            Function::B => registers.absr.set(absr | mask),
        }
        // Hand the pin to the peripheral last, once its function is selected.
        registers.pdr.set(mask);
    }
}

/// Power Management Controller.
pub struct Pmc {
    registers: Mmio<PmcRegisterBlock>,
}

impl Pmc {
    /// # Safety
    ///
    /// Only one owner of the PMC may exist at a time.
    pub const unsafe fn steal() -> Self {
        unsafe { Self::new(PMC_BASE) }
    }

    /// # Safety
    ///
    /// `base` must point to a PMC register block that stays valid for the
    /// lifetime of the value.
    pub const unsafe fn new(base: usize) -> Self {
        Self {
            registers: unsafe { Mmio::new(base) },
        }
    }

    /// Whether the clock of `peripheral_id` is running. Identifiers the PMC
    /// does not have read as disabled.
    pub fn is_enabled(&self, peripheral_id: u32) -> bool {
        match peripheral_id {
            0..32 => self.registers.pcsr0.get() & (1 << peripheral_id) != 0,
            32..64 => self.registers.pcsr1.get() & (1 << (peripheral_id - 32)) != 0,
            _ => false,
        }
    }
}

impl PeripheralClock for Pmc {
    /// Identifiers the PMC does not have are ignored.
    fn enable(&mut self, peripheral_id: u32) {
        match peripheral_id {
            0..32 => self.registers.pcer0.set(1 << peripheral_id),
            32..64 => self.registers.pcer1.set(1 << (peripheral_id - 32)),
            _ => warn!("no peripheral {=u32} in the PMC", peripheral_id),
        }
    }
}
