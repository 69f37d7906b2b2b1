use core::ptr::NonNull;

/// Register access as seen by bit-level operations.
///
/// Implemented by [`RegCell`] for mapped hardware registers and by
/// simulated registers in tests.
pub trait Reg32 {
    /// Read the register's current 32-bit value.
    fn read(&self) -> u32;

    /// Write a 32-bit value to the register.
    fn write(&self, value: u32);
}

/// Live accessor to one mapped 4-byte register.
///
/// The only place raw MMIO pointers are dereferenced. All accesses are
/// volatile so the compiler neither elides nor reorders them against other
/// register traffic.
#[derive(Debug)]
pub struct RegCell {
    ptr: NonNull<u32>,
}

impl RegCell {
    /// Wrap a mapped register address.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a mapped, 4-byte-aligned 32-bit register that
    /// stays valid until the cell is surrendered back to its mapper.
    pub const unsafe fn new(ptr: NonNull<u32>) -> Self {
        Self { ptr }
    }

    /// The mapped address, for diagnostics.
    pub fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }
}

impl Reg32 for RegCell {
    #[inline]
    fn read(&self) -> u32 {
        // SAFETY: mapped and aligned per the `new()` contract.
        unsafe { self.ptr.as_ptr().read_volatile() }
    }

    #[inline]
    fn write(&self, value: u32) {
        // SAFETY: mapped and aligned per the `new()` contract.
        unsafe { self.ptr.as_ptr().write_volatile(value) }
    }
}

// SAFETY: the cell is an address plus volatile accesses. Serializing
// read-modify-write sequences across threads is the owner's lock
// discipline, not the cell's.
unsafe impl Send for RegCell {}
unsafe impl Sync for RegCell {}
