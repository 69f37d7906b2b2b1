//! HI35xx GPIO bank 0 register map.
//!
//! Each bank exposes 32 pins through two 32-bit registers: a data register
//! holding the driven level per pin and a direction register selecting
//! output drive per pin. Both live in the bank's 4 KiB register page.

use reg_window::PhysRange;

/// Physical base address of GPIO bank 0.
pub const GPIO0_BASE: usize = 0x1215_0000;

/// Byte offset of the data register within a bank.
pub const DATA_OFFSET: usize = 0x3fc;

/// Byte offset of the direction register within a bank.
pub const DIR_OFFSET: usize = 0x400;

/// Pins per bank.
pub const BANK_PINS: u8 = 32;

/// Range of bank 0's data register.
pub const DATA_RANGE: PhysRange = PhysRange::reg32(GPIO0_BASE + DATA_OFFSET);

/// Range of bank 0's direction register.
pub const DIR_RANGE: PhysRange = PhysRange::reg32(GPIO0_BASE + DIR_OFFSET);
