//! [`embedded_hal::spi::SpiDevice`] view of a managed slave.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

use crate::config::DataBits;
use crate::hal::{ClockController, PeripheralDriver, PinController};
use crate::manager::SpiManager;
use crate::slave::SlaveId;

/// A registered slave on an 8-bit bus, borrowed together with its manager.
///
/// A transaction selects the slave, runs the operations through the manager
/// and deselects it again, so the bus is powered only for the duration of the
/// transaction unless another slave holds it. A slave that was already
/// selected when the transaction started stays selected afterwards.
pub struct SlaveDevice<
    'a,
    P,
    C,
    D,
    Dl,
    const BUSES: usize,
    const SLAVES: usize,
    const PER_BUS: usize,
> {
    manager: &'a mut SpiManager<P, C, D, BUSES, SLAVES, PER_BUS>,
    slave: SlaveId,
    delay: Dl,
}

impl<P, C, D, const BUSES: usize, const SLAVES: usize, const PER_BUS: usize>
    SpiManager<P, C, D, BUSES, SLAVES, PER_BUS>
where
    P: PinController,
    C: ClockController,
    D: PeripheralDriver,
{
    /// Borrow `slave` as an `embedded-hal` SPI device.
    ///
    /// `delay` serves [`Operation::DelayNs`]. Returns `None` when the slave's
    /// bus runs 9-bit units, which do not fit the device's `u8` words.
    pub fn device<Dl: DelayNs>(
        &mut self,
        slave: SlaveId,
        delay: Dl,
    ) -> Option<SlaveDevice<'_, P, C, D, Dl, BUSES, SLAVES, PER_BUS>> {
        let bus = self.bus_of(slave);
        if self.bus_config(bus).data_bits != DataBits::Eight {
            return None;
        }
        Some(SlaveDevice { manager: self, slave, delay })
    }
}

impl<P, C, D, Dl, const BUSES: usize, const SLAVES: usize, const PER_BUS: usize>
    SlaveDevice<'_, P, C, D, Dl, BUSES, SLAVES, PER_BUS>
{
    pub fn slave(&self) -> SlaveId {
        self.slave
    }
}

impl<P, C, D, Dl, const BUSES: usize, const SLAVES: usize, const PER_BUS: usize>
    ErrorType for SlaveDevice<'_, P, C, D, Dl, BUSES, SLAVES, PER_BUS>
{
    type Error = Infallible;
}

impl<P, C, D, Dl, const BUSES: usize, const SLAVES: usize, const PER_BUS: usize>
    SpiDevice<u8> for SlaveDevice<'_, P, C, D, Dl, BUSES, SLAVES, PER_BUS>
where
    P: PinController,
    C: ClockController,
    D: PeripheralDriver,
    Dl: DelayNs,
{
    fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        let slave = self.slave;
        let held = self.manager.is_selected(slave);
        self.manager.select(slave);

        for op in operations {
            match op {
                Operation::Read(buf) => {
                    for word in buf.iter_mut() {
                        *word = self.manager.exchange_unit(slave, 0) as u8;
                    }
                }
                Operation::Write(buf) => {
                    for word in buf.iter() {
                        self.manager.exchange_unit(slave, *word as u16);
                    }
                }
                Operation::Transfer(read, write) => {
                    // Clock out zeros past the end of `write`, drop replies
                    // past the end of `read`.
                    let len = read.len().max(write.len());
                    for i in 0..len {
                        let out = write.get(i).copied().unwrap_or(0);
                        let inp = self.manager.exchange_unit(slave, out as u16);
                        if let Some(word) = read.get_mut(i) {
                            *word = inp as u8;
                        }
                    }
                }
                Operation::TransferInPlace(buf) => {
                    for word in buf.iter_mut() {
                        *word =
                            self.manager.exchange_unit(slave, *word as u16) as u8;
                    }
                }
                Operation::DelayNs(ns) => self.delay.delay_ns(*ns),
            }
        }

        if !held {
            self.manager.deselect(slave);
        }
        Ok(())
    }
}
