/// Errors that can occur during window lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MapError<E: core::fmt::Debug> {
    /// The mapper could not make the physical range addressable.
    MapFailed(E),
}

impl<E: core::fmt::Debug + core::fmt::Display> core::fmt::Display
    for MapError<E>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MapError::MapFailed(err) => {
                write!(f, "mapping physical range failed: {}", err)
            }
        }
    }
}
