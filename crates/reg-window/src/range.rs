const REG32_LEN: usize = core::mem::size_of::<u32>();

/// A physical register address range.
///
/// Plain description of the span a window covers: base address and byte
/// length. Ranges are built from bank constants and compared by value when
/// a mapper hands a mapping back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhysRange {
    base: usize,
    len: usize,
}

impl PhysRange {
    /// Range covering exactly one 32-bit register at `base`.
    pub const fn reg32(base: usize) -> Self {
        Self { base, len: REG32_LEN }
    }

    /// Physical base address of the range.
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Length of the range in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
