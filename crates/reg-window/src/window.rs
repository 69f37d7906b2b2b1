use core::marker::PhantomData;

use crate::cell::RegCell;
use crate::error::MapError;
use crate::mapper::MapPhysical;
use crate::range::PhysRange;

/// Phase state machine for the window lifecycle.
enum Phase {
    /// Range is not mapped; no accessor exists.
    Unmapped,
    /// Range is mapped; the accessor stays valid until `release()`.
    Mapped(RegCell),
}

/// A lazily-mapped window onto one 32-bit register.
///
/// The window tracks whether its range currently holds a live mapping.
/// `acquire()` maps on first use and is idempotent for the rest of the
/// use-cycle; `release()` is a full unmap and may be called any number of
/// times. The window performs no locking of its own: callers serialize
/// acquire/release and all register accesses behind one lock.
pub struct Window<P: MapPhysical> {
    range: PhysRange,
    phase: Phase,
    _mapper: PhantomData<fn() -> P>,
}

impl<P: MapPhysical> Window<P> {
    /// Create a window over `range`, initially unmapped.
    pub const fn new(range: PhysRange) -> Self {
        Self {
            range,
            phase: Phase::Unmapped,
            _mapper: PhantomData,
        }
    }

    /// The physical range this window covers.
    pub const fn range(&self) -> PhysRange {
        self.range
    }

    /// Returns `true` while the window holds a live mapping.
    pub fn is_mapped(&self) -> bool {
        matches!(self.phase, Phase::Mapped(_))
    }

    /// Map the window if needed and return the live accessor.
    ///
    /// A second call while mapped performs no new mapping and returns the
    /// existing accessor unchanged. On failure the window stays unmapped,
    /// the error is reported, and a later call may retry.
    pub fn acquire(
        &mut self,
        mapper: &mut P,
    ) -> Result<&RegCell, MapError<P::Error>> {
        if let Phase::Unmapped = self.phase {
            match mapper.map(self.range) {
                Ok(cell) => {
                    info!(
                        "mapped {:#x} -> cell at {:#x}",
                        self.range.base(),
                        cell.addr()
                    );
                    self.phase = Phase::Mapped(cell);
                }
                Err(err) => {
                    warn!("mapping {:#x} failed", self.range.base());
                    return Err(MapError::MapFailed(err));
                }
            }
        }

        match &self.phase {
            Phase::Mapped(cell) => Ok(cell),
            Phase::Unmapped => unreachable!(),
        }
    }

    /// Unmap the window, handing the accessor back to the mapper.
    ///
    /// A no-op when the window is already unmapped, so callers may release
    /// unconditionally at the end of a use-cycle.
    pub fn release(&mut self, mapper: &mut P) {
        if let Phase::Mapped(cell) =
            core::mem::replace(&mut self.phase, Phase::Unmapped)
        {
            info!("unmapping {:#x}", self.range.base());
            mapper.unmap(self.range, cell);
        }
    }

    /// The live accessor, if the window is currently mapped.
    pub fn cell(&self) -> Option<&RegCell> {
        match &self.phase {
            Phase::Mapped(cell) => Some(cell),
            Phase::Unmapped => None,
        }
    }
}
