use core::fmt;

use reg_window::MapError;

/// Errors surfaced across the attach/open/write/close lifecycle.
#[derive(derive_more::From, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E: fmt::Debug> {
    /// A register window could not be made addressable.
    #[from]
    Map(MapError<E>),
    /// The resolved pin cannot address the power rail.
    InvalidPin(u8),
    /// The write carried no command byte.
    ShortWrite,
}

impl<E: fmt::Debug + fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Map(err) => write!(f, "{}", err),
            Error::InvalidPin(index) => {
                write!(f, "no usable power pin at index {}", index)
            }
            Error::ShortWrite => {
                write!(f, "power command carries no byte")
            }
        }
    }
}

impl<E: fmt::Debug> From<hi35xx_gpio::Error> for Error<E> {
    fn from(err: hi35xx_gpio::Error) -> Self {
        match err {
            hi35xx_gpio::Error::InvalidPin(index) => Error::InvalidPin(index),
        }
    }
}

impl<E: fmt::Debug> embedded_hal::digital::Error for Error<E> {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
