/// Requested state of the disk power rail.
///
/// Decoded from a command byte: zero is off, any nonzero value is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    Off,
    On,
}

impl PowerState {
    /// Whether this state drives the rail's data bit high.
    pub const fn is_on(self) -> bool {
        matches!(self, PowerState::On)
    }
}

impl From<u8> for PowerState {
    fn from(byte: u8) -> Self {
        if byte == 0 {
            PowerState::Off
        } else {
            PowerState::On
        }
    }
}
