//! Platform services the bus relies on: pin multiplexing and peripheral clock
//! gating. [`crate::sam3x`] implements both for the real chip.

use crate::pins::PinBinding;

/// SMC peripheral identifier in the PMC.
pub const SMC_PERIPHERAL_ID: u32 = 9;

/// Hands a pin over to the peripheral function named in its binding.
pub trait PinMux {
    fn route(&mut self, binding: &PinBinding);
}

/// Enables the clock of a peripheral.
pub trait PeripheralClock {
    fn enable(&mut self, peripheral_id: u32);
}

impl<T: PinMux + ?Sized> PinMux for &mut T {
    fn route(&mut self, binding: &PinBinding) {
        T::route(self, binding)
    }
}

impl<T: PeripheralClock + ?Sized> PeripheralClock for &mut T {
    fn enable(&mut self, peripheral_id: u32) {
        T::enable(self, peripheral_id)
    }
}
