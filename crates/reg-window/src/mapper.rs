use core::convert::Infallible;
use core::ptr::NonNull;

use crate::cell::RegCell;
use crate::range::PhysRange;

/// Makes physical register ranges addressable.
///
/// Implementors own the platform's mapping mechanism. A failed `map` must
/// leave the mapper reusable so a later use-cycle can retry the same range.
pub trait MapPhysical {
    /// Error type for mapping failures.
    type Error: core::fmt::Debug;

    /// Map `range` and return the live accessor to its register.
    fn map(&mut self, range: PhysRange) -> Result<RegCell, Self::Error>;

    /// Reverse a previous `map`, consuming the accessor.
    fn unmap(&mut self, range: PhysRange, cell: RegCell);
}

/// Mapper for targets where register ranges are addressable at their
/// physical address (bare metal, or an uncached 1:1 alias).
pub struct IdentityMap(());

impl IdentityMap {
    /// Create the identity mapper.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that every range later passed to `map`
    /// is addressable at its physical address on this target.
    pub const unsafe fn new() -> Self {
        Self(())
    }
}

impl MapPhysical for IdentityMap {
    type Error = Infallible;

    fn map(&mut self, range: PhysRange) -> Result<RegCell, Self::Error> {
        debug_assert!(range.base() != 0);
        // SAFETY: addressability is guaranteed by the `new()` contract,
        // and no register bank sits at address zero.
        let cell = unsafe {
            RegCell::new(NonNull::new_unchecked(range.base() as *mut u32))
        };
        Ok(cell)
    }

    fn unmap(&mut self, _range: PhysRange, cell: RegCell) {
        drop(cell);
    }
}
