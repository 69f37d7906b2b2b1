/// Attach-time configuration resolved from the platform's hardware
/// description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Bank pin wired to the disk power rail. Zero is the value an absent
    /// property resolves to and is refused at attach.
    pub pin: u8,
}
