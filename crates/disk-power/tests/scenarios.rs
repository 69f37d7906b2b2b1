use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use disk_power::{Config, DiskPower, Error, PowerState};
use embassy_sync::blocking_mutex::raw::{
    CriticalSectionRawMutex, NoopRawMutex,
};
use embedded_hal::digital::OutputPin;
use hi35xx_gpio::regs;
use reg_window::{MapError, MapPhysical, PhysRange, RegCell};

// ---------------------------------------------------------------------------
// Simulated bank
// ---------------------------------------------------------------------------

/// The bank's two registers plus counters, backed by host memory.
struct SimBank {
    dir: AtomicU32,
    data: AtomicU32,
    map_calls: AtomicUsize,
    unmap_calls: AtomicUsize,
    /// If set to true, the next attempt to map that register fails.
    fail_dir: AtomicBool,
    fail_data: AtomicBool,
}

impl SimBank {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            dir: AtomicU32::new(0),
            data: AtomicU32::new(0),
            map_calls: AtomicUsize::new(0),
            unmap_calls: AtomicUsize::new(0),
            fail_dir: AtomicBool::new(false),
            fail_data: AtomicBool::new(false),
        })
    }

    fn dir_bits(&self) -> u32 {
        self.dir.load(Ordering::SeqCst)
    }

    fn data_bits(&self) -> u32 {
        self.data.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SimMapError(usize);

impl std::fmt::Display for SimMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "simulated mapping refused at {:#x}", self.0)
    }
}

/// Mapper handing out accessors into the simulated bank.
struct SimMap {
    bank: Arc<SimBank>,
}

impl MapPhysical for SimMap {
    type Error = SimMapError;

    fn map(&mut self, range: PhysRange) -> Result<RegCell, SimMapError> {
        self.bank.map_calls.fetch_add(1, Ordering::SeqCst);
        let (reg, fail) = if range == regs::DIR_RANGE {
            (&self.bank.dir, &self.bank.fail_dir)
        } else if range == regs::DATA_RANGE {
            (&self.bank.data, &self.bank.fail_data)
        } else {
            panic!("unexpected range: {:#x}", range.base());
        };
        if fail.swap(false, Ordering::SeqCst) {
            return Err(SimMapError(range.base()));
        }
        let ptr = NonNull::new(reg.as_ptr()).unwrap();
        // SAFETY: the Arc keeps the simulated register alive for as long
        // as any accessor into it exists.
        Ok(unsafe { RegCell::new(ptr) })
    }

    fn unmap(&mut self, _range: PhysRange, cell: RegCell) {
        self.bank.unmap_calls.fetch_add(1, Ordering::SeqCst);
        drop(cell);
    }
}

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

const PIN: u8 = 2;
const PIN_MASK: u32 = 1 << PIN;

fn make_rail(pin: u8) -> (DiskPower<NoopRawMutex, SimMap>, Arc<SimBank>) {
    let bank = SimBank::new();
    let rail =
        DiskPower::attach(Config { pin }, SimMap { bank: bank.clone() })
            .unwrap();
    (rail, bank)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn attach_rejects_an_absent_pin() {
    let bank = SimBank::new();
    let result = DiskPower::<NoopRawMutex, _>::attach(
        Config { pin: 0 },
        SimMap { bank },
    );
    assert!(matches!(result, Err(Error::InvalidPin(0))));
}

#[test]
fn attach_rejects_a_pin_beyond_the_bank() {
    let bank = SimBank::new();
    let result = DiskPower::<NoopRawMutex, _>::attach(
        Config { pin: 35 },
        SimMap { bank },
    );
    assert!(matches!(result, Err(Error::InvalidPin(35))));
}

#[test]
fn attach_reports_the_bound_pin() {
    let (rail, _) = make_rail(PIN);
    assert_eq!(rail.pin().index(), PIN);
}

#[test]
fn errors_render_for_diagnostics() {
    let err: Error<SimMapError> = Error::ShortWrite;
    assert_eq!(format!("{}", err), "power command carries no byte");

    let err: Error<SimMapError> = Error::InvalidPin(35);
    assert_eq!(format!("{}", err), "no usable power pin at index 35");

    let err: Error<SimMapError> =
        Error::Map(MapError::MapFailed(SimMapError(0x1215_0400)));
    assert_eq!(
        format!("{}", err),
        "mapping physical range failed: simulated mapping refused at 0x12150400"
    );
}

#[test]
fn power_state_decodes_command_bytes() {
    assert_eq!(PowerState::from(0), PowerState::Off);
    assert_eq!(PowerState::from(1), PowerState::On);
    assert_eq!(PowerState::from(0x20), PowerState::On);
    assert!(!PowerState::Off.is_on());
    assert!(PowerState::On.is_on());
}

#[test]
fn power_on_asserts_direction_then_level() {
    let (rail, bank) = make_rail(PIN);
    rail.open().unwrap();

    assert_eq!(rail.write(&[1]), Ok(1));
    assert_eq!(bank.dir_bits(), PIN_MASK);
    assert_eq!(bank.data_bits(), PIN_MASK);

    assert_eq!(rail.write(&[0]), Ok(1));
    assert_eq!(bank.data_bits(), 0);
    // The pin stays configured as an output.
    assert_eq!(bank.dir_bits(), PIN_MASK);
}

#[test]
fn other_pins_keep_their_state() {
    let (rail, bank) = make_rail(PIN);
    bank.dir.store(0x0000_ff00, Ordering::SeqCst);
    bank.data.store(0x0000_a500, Ordering::SeqCst);
    rail.open().unwrap();

    rail.write(&[1]).unwrap();
    assert_eq!(bank.dir_bits(), 0x0000_ff00 | PIN_MASK);
    assert_eq!(bank.data_bits(), 0x0000_a500 | PIN_MASK);

    rail.write(&[0]).unwrap();
    assert_eq!(bank.data_bits(), 0x0000_a500);
}

#[test]
fn any_nonzero_byte_powers_on() {
    let (rail, bank) = make_rail(PIN);
    rail.open().unwrap();

    rail.write(&[0x20]).unwrap();
    assert_eq!(bank.data_bits(), PIN_MASK);
}

#[test]
fn only_the_first_byte_counts() {
    let (rail, bank) = make_rail(PIN);
    rail.open().unwrap();

    assert_eq!(rail.write(&[0, 1, 1]), Ok(1));
    assert_eq!(bank.data_bits(), 0);
}

#[test]
fn empty_write_is_rejected_before_any_register_activity() {
    let (rail, bank) = make_rail(PIN);

    assert_eq!(rail.write(&[]), Err(Error::ShortWrite));
    assert_eq!(bank.map_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn open_maps_each_window_once() {
    let (rail, bank) = make_rail(PIN);

    rail.open().unwrap();
    assert!(rail.is_open());
    assert_eq!(bank.map_calls.load(Ordering::SeqCst), 2);

    // Second open performs no new mapping.
    rail.open().unwrap();
    assert_eq!(bank.map_calls.load(Ordering::SeqCst), 2);

    // Neither does a write against the open context.
    rail.write(&[1]).unwrap();
    assert_eq!(bank.map_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn close_unmaps_and_a_new_cycle_remaps() {
    let (rail, bank) = make_rail(PIN);

    rail.open().unwrap();
    rail.close();
    assert!(!rail.is_open());
    assert_eq!(bank.unmap_calls.load(Ordering::SeqCst), 2);

    // Close again: nothing left to release.
    rail.close();
    assert_eq!(bank.unmap_calls.load(Ordering::SeqCst), 2);

    rail.open().unwrap();
    assert_eq!(bank.map_calls.load(Ordering::SeqCst), 4);
}

#[test]
fn write_before_open_maps_on_the_spot() {
    let (rail, bank) = make_rail(PIN);

    assert_eq!(rail.write(&[1]), Ok(1));
    assert!(rail.is_open());
    assert_eq!(bank.map_calls.load(Ordering::SeqCst), 2);
    assert_eq!(bank.data_bits(), PIN_MASK);
}

#[test]
fn failed_write_performs_no_register_access() {
    let (rail, bank) = make_rail(PIN);
    bank.fail_dir.store(true, Ordering::SeqCst);

    let result = rail.write(&[1]);
    assert_eq!(
        result,
        Err(Error::Map(MapError::MapFailed(SimMapError(
            regs::DIR_RANGE.base()
        ))))
    );
    // The direction window failed first; the data register was never
    // even mapped.
    assert_eq!(bank.map_calls.load(Ordering::SeqCst), 1);
    assert_eq!(bank.dir_bits(), 0);
    assert_eq!(bank.data_bits(), 0);

    // A later cycle is free to retry and succeed.
    assert_eq!(rail.write(&[1]), Ok(1));
    assert_eq!(bank.dir_bits(), PIN_MASK);
    assert_eq!(bank.data_bits(), PIN_MASK);
}

#[test]
fn open_retries_only_the_window_that_failed() {
    let (rail, bank) = make_rail(PIN);
    bank.fail_data.store(true, Ordering::SeqCst);

    let result = rail.open();
    assert_eq!(
        result,
        Err(Error::Map(MapError::MapFailed(SimMapError(
            regs::DATA_RANGE.base()
        ))))
    );
    assert!(!rail.is_open());
    assert_eq!(bank.map_calls.load(Ordering::SeqCst), 2);

    // The direction window is kept; only the data window maps again.
    rail.open().unwrap();
    assert!(rail.is_open());
    assert_eq!(bank.map_calls.load(Ordering::SeqCst), 3);
}

#[test]
fn close_releases_a_partially_mapped_context() {
    let (rail, bank) = make_rail(PIN);
    bank.fail_data.store(true, Ordering::SeqCst);

    assert!(rail.open().is_err());
    rail.close();
    assert!(!rail.is_open());
    assert_eq!(bank.unmap_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn is_powered_reflects_the_data_bit() {
    let (rail, _bank) = make_rail(PIN);
    assert_eq!(rail.is_powered(), None);

    rail.open().unwrap();
    assert_eq!(rail.is_powered(), Some(false));
    rail.write(&[1]).unwrap();
    assert_eq!(rail.is_powered(), Some(true));
    rail.write(&[0]).unwrap();
    assert_eq!(rail.is_powered(), Some(false));

    rail.close();
    assert_eq!(rail.is_powered(), None);
}

#[test]
fn power_pin_adapter_drives_the_rail() {
    let (rail, bank) = make_rail(PIN);
    rail.open().unwrap();

    let mut pin = rail.power_pin();
    pin.set_high().unwrap();
    assert_eq!(bank.data_bits(), PIN_MASK);
    pin.set_low().unwrap();
    assert_eq!(bank.data_bits(), 0);
    assert_eq!(bank.dir_bits(), PIN_MASK);
}

#[test]
fn concurrent_writes_settle_in_a_requested_state() {
    let bank = SimBank::new();
    // Unrelated pins keep a recognizable pattern through the race.
    bank.data.store(0x5a5a_0000, Ordering::SeqCst);
    let rail: DiskPower<CriticalSectionRawMutex, SimMap> =
        DiskPower::attach(Config { pin: PIN }, SimMap { bank: bank.clone() })
            .unwrap();
    rail.open().unwrap();
    let rail = Arc::new(rail);

    let writers: Vec<_> = [0u8, 1]
        .iter()
        .map(|&cmd| {
            let rail = rail.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    rail.write(&[cmd]).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let data = bank.data_bits();
    assert!(data == 0x5a5a_0000 || data == (0x5a5a_0000 | PIN_MASK));
    assert_eq!(bank.dir_bits(), PIN_MASK);
}
