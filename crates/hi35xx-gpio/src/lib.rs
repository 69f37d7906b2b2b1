#![no_std]
//! Bit-level control of HI35xx GPIO bank registers.
//!
//! The operations here are pure read-modify-write sequences over a bank's
//! direction and data registers. They are generic over [`Reg32`] so the
//! same code drives mapped hardware registers and simulated ones in tests.
//! Callers are responsible for serializing access to a bank: two unlocked
//! read-modify-write sequences on the same register can lose an update.

pub mod regs;

mod errors;

pub use errors::Error;
pub use reg_window::Reg32;

/// A validated pin index within a 32-bit GPIO bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(u8);

impl Pin {
    /// Validate a raw pin index against the bank width.
    pub const fn new(index: u8) -> Result<Self, Error> {
        if index < regs::BANK_PINS {
            Ok(Self(index))
        } else {
            Err(Error::InvalidPin(index))
        }
    }

    /// The raw pin index.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Single-bit register mask for this pin.
    pub const fn mask(self) -> u32 {
        1 << self.0
    }
}

/// Configure `pin` for output drive.
///
/// Read-modify-write on the direction register; all other pins keep their
/// configuration.
pub fn ensure_output<R: Reg32>(dir: &R, pin: Pin) {
    let cur = dir.read();
    dir.write(cur | pin.mask());
}

/// Drive `pin`'s data bit high or low.
///
/// Read-modify-write on the data register; all other pins keep their
/// level.
pub fn set_bit<R: Reg32>(data: &R, pin: Pin, on: bool) {
    let cur = data.read();
    let next = if on {
        cur | pin.mask()
    } else {
        cur & !pin.mask()
    };
    data.write(next);
}

/// The level currently held in the data register for `pin`.
pub fn read_bit<R: Reg32>(data: &R, pin: Pin) -> bool {
    data.read() & pin.mask() != 0
}

/// Configure `pin` as output, then drive its level.
///
/// The direction bit is re-asserted on every call, before the data
/// register is touched.
pub fn drive<R: Reg32>(dir: &R, data: &R, pin: Pin, on: bool) {
    ensure_output(dir, pin);
    set_bit(data, pin, on);
}
