#![no_std]
//! Disk power rail control over one HI35xx GPIO pin.
//!
//! The platform resolves which bank pin feeds the disk rail and attaches a
//! [`DiskPower`] context for it. From then on the context owns the bank's
//! two register windows: `open()` maps them on first use, `write()`
//! consumes one command byte (zero powers the disk off, anything else
//! powers it on) and performs the direction/data read-modify-write pair,
//! `close()` unmaps both. Every window transition and register sequence
//! runs under the context's lock, so concurrent opens and writes can
//! neither double-map a window nor lose an update.

// This mod MUST go first, so that the others see its macros.
mod fmt;

mod config;
mod errors;
mod power;

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use hi35xx_gpio::{regs, Pin};
use reg_window::{MapPhysical, Window};

pub use config::Config;
pub use errors::Error;
pub use power::PowerState;

/// Mapper plus both windows: everything the lock guards.
struct Shared<P: MapPhysical> {
    mapper: P,
    dir: Window<P>,
    data: Window<P>,
}

/// Driver context for one disk power rail.
///
/// Generic over the lock flavor `M` and the platform mapper `P`, so the
/// same context serves interrupt-safe firmware builds and host tests.
pub struct DiskPower<M: RawMutex, P: MapPhysical> {
    pin: Pin,
    shared: Mutex<M, RefCell<Shared<P>>>,
}

impl<M: RawMutex, P: MapPhysical> DiskPower<M, P> {
    /// Attach a context for the rail described by `config`.
    ///
    /// Fails with [`Error::InvalidPin`] when the hardware description
    /// resolved no usable pin: zero (the value an absent property reads
    /// back as) or an index beyond the bank.
    pub fn attach(
        config: Config,
        mapper: P,
    ) -> Result<Self, Error<P::Error>> {
        if config.pin == 0 {
            return Err(Error::InvalidPin(config.pin));
        }
        let pin = Pin::new(config.pin)?;

        info!("disk power rail attached on bank pin {}", pin.index());
        Ok(Self {
            pin,
            shared: Mutex::new(RefCell::new(Shared {
                mapper,
                dir: Window::new(regs::DIR_RANGE),
                data: Window::new(regs::DATA_RANGE),
            })),
        })
    }

    /// The bank pin this context drives.
    pub const fn pin(&self) -> Pin {
        self.pin
    }

    /// Begin a use-cycle: make both register windows addressable.
    ///
    /// Idempotent while open. A window that failed to map earlier is
    /// simply retried; on failure nothing is rolled back and `close()`
    /// releases whatever did map.
    pub fn open(&self) -> Result<(), Error<P::Error>> {
        self.shared.lock(|cell| {
            let mut guard = cell.borrow_mut();
            let shared = &mut *guard;
            shared.dir.acquire(&mut shared.mapper)?;
            shared.data.acquire(&mut shared.mapper)?;
            Ok(())
        })
    }

    /// Whether both register windows currently hold live mappings.
    pub fn is_open(&self) -> bool {
        self.shared.lock(|cell| {
            let guard = cell.borrow();
            guard.dir.is_mapped() && guard.data.is_mapped()
        })
    }

    /// Apply one power command byte and report how many bytes were
    /// consumed.
    ///
    /// Exactly the first byte counts: zero powers the disk off, any other
    /// value powers it on, extra bytes are ignored. An empty buffer fails
    /// with [`Error::ShortWrite`] before any register activity. The
    /// direction bit is re-asserted before every level write, and a window
    /// that is not yet mapped is mapped on the spot.
    pub fn write(&self, buf: &[u8]) -> Result<usize, Error<P::Error>> {
        let byte = match buf.first() {
            Some(byte) => *byte,
            None => return Err(Error::ShortWrite),
        };
        let state = PowerState::from(byte);

        self.shared.lock(|cell| {
            let mut guard = cell.borrow_mut();
            let shared = &mut *guard;
            let dir = shared.dir.acquire(&mut shared.mapper)?;
            let data = shared.data.acquire(&mut shared.mapper)?;
            hi35xx_gpio::drive(dir, data, self.pin, state.is_on());
            info!(
                "disk rail pin {} -> {}",
                self.pin.index(),
                if state.is_on() { "on" } else { "off" }
            );
            Ok(1)
        })
    }

    /// Current level of the rail's data bit, or `None` while the data
    /// window is unmapped.
    pub fn is_powered(&self) -> Option<bool> {
        self.shared.lock(|cell| {
            let guard = cell.borrow();
            guard
                .data
                .cell()
                .map(|data| hi35xx_gpio::read_bit(data, self.pin))
        })
    }

    /// End the use-cycle: release both windows.
    ///
    /// Callable any number of times, including when only one window (or
    /// neither) ever mapped.
    pub fn close(&self) {
        self.shared.lock(|cell| {
            let mut guard = cell.borrow_mut();
            let shared = &mut *guard;
            shared.dir.release(&mut shared.mapper);
            shared.data.release(&mut shared.mapper);
        });
    }

    /// Adapter exposing the rail as an `embedded-hal` output pin.
    pub fn power_pin(&self) -> PowerPin<'_, M, P> {
        PowerPin { rail: self }
    }
}

/// Borrowing adapter implementing [`embedded_hal::digital::OutputPin`].
///
/// `set_high` powers the disk on, `set_low` powers it off.
pub struct PowerPin<'a, M: RawMutex, P: MapPhysical> {
    rail: &'a DiskPower<M, P>,
}

impl<M: RawMutex, P: MapPhysical> embedded_hal::digital::ErrorType
    for PowerPin<'_, M, P>
{
    type Error = Error<P::Error>;
}

impl<M: RawMutex, P: MapPhysical> embedded_hal::digital::OutputPin
    for PowerPin<'_, M, P>
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.rail.write(&[0]).map(|_| ())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.rail.write(&[1]).map(|_| ())
    }
}
