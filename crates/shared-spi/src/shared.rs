use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::hal::{ClockController, PeripheralDriver, PinController};
use crate::manager::SpiManager;

/// A [`SpiManager`] behind a blocking mutex.
///
/// The manager itself assumes a single caller. Sharing it between tasks and
/// interrupts goes through `lock`, e.g. with a `CriticalSectionRawMutex`:
///
/// ```ignore
/// shared.lock(|spi| spi.borrow_mut().select(radio));
/// ```
pub type SharedSpiManager<
    M,
    P,
    C,
    D,
    const BUSES: usize = 4,
    const SLAVES: usize = 4,
    const PER_BUS: usize = 4,
> = Mutex<M, RefCell<SpiManager<P, C, D, BUSES, SLAVES, PER_BUS>>>;

impl<P, C, D, const BUSES: usize, const SLAVES: usize, const PER_BUS: usize>
    SpiManager<P, C, D, BUSES, SLAVES, PER_BUS>
where
    P: PinController,
    C: ClockController,
    D: PeripheralDriver,
{
    /// Move the manager behind a blocking mutex.
    pub const fn into_shared<M: RawMutex>(
        self,
    ) -> SharedSpiManager<M, P, C, D, BUSES, SLAVES, PER_BUS> {
        Mutex::new(RefCell::new(self))
    }
}
