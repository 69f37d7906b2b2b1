#![no_std]
//! Lazily-mapped windows onto memory-mapped peripheral registers.
//!
//! A [`Window`] tracks whether one 32-bit register's physical range is
//! currently addressable. The range is mapped on first `acquire()`, repeat
//! acquires hand back the existing accessor unchanged, and `release()` fully
//! unmaps. How a physical range becomes addressable is platform policy and
//! sits behind the [`MapPhysical`] trait, so bare-metal targets, hosted
//! platforms, and tests each plug in their own mechanism.

// This mod MUST go first, so that the others see its macros.
mod fmt;

mod cell;
mod error;
mod mapper;
mod range;
mod window;

pub use cell::{Reg32, RegCell};
pub use error::MapError;
pub use mapper::{IdentityMap, MapPhysical};
pub use range::PhysRange;
pub use window::Window;
