use embedded_hal::spi::MODE_0;

use crate::bus::{Bus, BusId, BusState, ResolvedBus};
use crate::config::{BusConfig, DataBits};
use crate::error::Error;
use crate::hal::{
    ClockController, PeripheralDriver, PinController, PinStatus, Route,
    SyncConfig,
};
use crate::pin::{Level, PinId, PinMode};
use crate::pool::{Handle, Pool};
use crate::route::{self, Usart, LOCATIONS};
use crate::slave::{Slave, SlaveId};

/// Owner of every bus and slave slot, and of the hardware they drive.
///
/// A bus is powered only while at least one user holds it: the first
/// [`enable`](Self::enable) (usually through [`select`](Self::select)) brings
/// the USART up, the last [`disable`](Self::disable) takes it down again.
/// Chip-select lines of all slaves on a bus are parked at their idle level
/// around every power transition.
///
/// Slots are never freed. `BUSES` and `SLAVES` bound the pools, `PER_BUS`
/// bounds the slaves registered on a single bus.
///
/// The manager does no locking and every operation blocks until done.
/// Callers must not use it from an interrupt while it is in use elsewhere;
/// wrap it in a [`SharedSpiManager`](crate::SharedSpiManager) if several
/// execution contexts need it.
pub struct SpiManager<
    P,
    C,
    D,
    const BUSES: usize = 4,
    const SLAVES: usize = 4,
    const PER_BUS: usize = 4,
> {
    pins: P,
    clocks: C,
    driver: D,
    buses: Pool<Bus<PER_BUS>, BUSES>,
    slaves: Pool<Slave, SLAVES>,
}

impl<P, C, D, const BUSES: usize, const SLAVES: usize, const PER_BUS: usize>
    SpiManager<P, C, D, BUSES, SLAVES, PER_BUS>
where
    P: PinController,
    C: ClockController,
    D: PeripheralDriver,
{
    /// Create an empty manager driving the given hardware.
    pub const fn new(pins: P, clocks: C, driver: D) -> Self {
        Self {
            pins,
            clocks,
            driver,
            buses: Pool::new(),
            slaves: Pool::new(),
        }
    }

    /// Give back the hardware collaborators.
    pub fn release(self) -> (P, C, D) {
        (self.pins, self.clocks, self.driver)
    }

    /// Register a bus on the pins of `config.location`.
    ///
    /// The data-out and clock pins become push-pull outputs and the data-in
    /// pin an input. A pin that is already configured the same way is
    /// accepted, so two buses may share pins and differ only in e.g. baud
    /// rate. The bus starts powered down.
    pub fn init_bus(
        &mut self,
        config: BusConfig,
    ) -> Result<BusId, Error<P::Error>> {
        if self.buses.is_full() {
            return Err(Error::BusPoolExhausted);
        }
        let data_bits = DataBits::from_bits(config.data_bits)
            .ok_or(Error::UnsupportedDataBits(config.data_bits))?;
        let usart = Usart::from_index(config.instance)
            .ok_or(Error::InvalidInstance(config.instance))?;
        if config.location as usize >= LOCATIONS {
            return Err(Error::InvalidLocation(config.location));
        }
        let pins = route::resolve(usart, config.location).ok_or(
            Error::UndefinedLocation { usart, location: config.location },
        )?;

        self.configure_bus_pin(pins.mosi, PinMode::PushPull)?;
        if let Some(miso) = pins.miso {
            self.configure_bus_pin(miso, PinMode::Input)?;
        }
        self.configure_bus_pin(pins.clk, PinMode::PushPull)?;

        let resolved = ResolvedBus {
            usart,
            pins,
            baud_rate: config.baud_rate,
            data_bits,
            bit_order: config.bit_order,
        };
        let index = self
            .buses
            .alloc(Bus::new(resolved))
            .map_err(|_| Error::BusPoolExhausted)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "spi: bus {} on {} location {}",
            index,
            usart,
            config.location
        );
        Ok(Handle::new(index))
    }

    fn configure_bus_pin(
        &mut self,
        pin: PinId,
        mode: PinMode,
    ) -> Result<(), Error<P::Error>> {
        match self.pins.configure_pin(pin, false, mode, Level::Low) {
            Ok(PinStatus::Configured | PinStatus::AlreadyConfigured) => Ok(()),
            Err(e) => Err(Error::PinConfig(pin, e)),
        }
    }

    /// Register a slave with chip-select line `cs` on `bus`.
    ///
    /// On a powered bus an active-low slave starts deselected (high). In
    /// every other case the line starts low: with the bus down its signals
    /// sit low too, and a high chip-select would feed current into the
    /// unpowered slave.
    pub fn register_slave(
        &mut self,
        bus: BusId,
        cs: PinId,
        active_low: bool,
    ) -> Result<SlaveId, Error<P::Error>> {
        if self.slaves.is_full() {
            return Err(Error::SlavePoolExhausted);
        }
        let slot = &self.buses[bus.index()];
        if slot.slaves.is_full() {
            return Err(Error::SlaveListFull);
        }

        let initial = if slot.users > 0 && active_low {
            Level::High
        } else {
            Level::Low
        };
        match self.pins.configure_pin(cs, false, PinMode::PushPull, initial) {
            Ok(PinStatus::Configured) => {}
            Ok(PinStatus::AlreadyConfigured) => {
                return Err(Error::ChipSelectInUse(cs));
            }
            Err(e) => return Err(Error::PinConfig(cs, e)),
        }

        let index = self
            .slaves
            .alloc(Slave { bus, cs, active_low, selected: false })
            .map_err(|_| Error::SlavePoolExhausted)?;
        let id = Handle::new(index);
        self.buses[bus.index()]
            .slaves
            .push(id)
            .map_err(|_| Error::SlaveListFull)?;
        Ok(id)
    }

    /// Add a user to `bus`, powering it up if it was idle.
    ///
    /// Returns `true` when this call powered the bus up. Prefer
    /// [`select`](Self::select), which keeps the user count paired with the
    /// chip-select state.
    pub fn enable(&mut self, bus: BusId) -> bool {
        let slot = &mut self.buses[bus.index()];
        slot.users += 1;
        if slot.users > 1 {
            return false;
        }
        let config = slot.config;

        // Park every chip-select before the clock starts toggling.
        self.force_idle(bus);

        let usart = config.usart;
        self.clocks.set_clock_enabled(usart.clock(), true);
        self.driver.init_synchronous(
            usart,
            &SyncConfig {
                data_bits: config.data_bits,
                baud_rate: config.baud_rate,
                master: true,
                bit_order: config.bit_order,
                mode: MODE_0,
            },
        );
        self.driver.set_enabled(usart, true);
        self.driver.set_route(
            usart,
            Route {
                location: config.pins.location,
                tx: true,
                rx: !config.pins.is_transmit_only(),
                clk: true,
            },
        );

        #[cfg(feature = "defmt")]
        defmt::trace!("spi: {} powered up", usart);
        true
    }

    /// Drop a user from `bus`, powering it down when it was the last one.
    ///
    /// Returns `true` when this call powered the bus down. Calling it on an
    /// idle bus does nothing.
    pub fn disable(&mut self, bus: BusId) -> bool {
        let slot = &mut self.buses[bus.index()];
        if slot.users == 0 {
            return false;
        }
        slot.users -= 1;
        if slot.users > 0 {
            return false;
        }
        let usart = slot.config.usart;

        // Reset route so data-out is driven low instead of floating.
        self.driver.reset_route(usart);
        self.driver.set_enabled(usart, false);
        self.clocks.set_clock_enabled(usart.clock(), false);

        self.force_idle(bus);

        #[cfg(feature = "defmt")]
        defmt::trace!("spi: {} powered down", usart);
        true
    }

    fn force_idle(&mut self, bus: BusId) {
        let Self { pins, buses, slaves, .. } = self;
        for id in buses[bus.index()].slaves.iter() {
            let slave = &slaves[id.index()];
            pins.set_level(slave.cs, slave.idle_level());
        }
    }

    /// Power the slave's bus if needed, then assert its chip-select.
    ///
    /// Does nothing if the slave is already selected.
    pub fn select(&mut self, slave: SlaveId) {
        let slot = &self.slaves[slave.index()];
        if slot.selected {
            return;
        }
        let (bus, cs, level) = (slot.bus, slot.cs, slot.active_level());

        self.enable(bus);
        self.pins.set_level(cs, level);
        self.slaves[slave.index()].selected = true;
    }

    /// Release the slave's chip-select, then drop its use of the bus.
    ///
    /// Does nothing if the slave is not selected.
    pub fn deselect(&mut self, slave: SlaveId) {
        let slot = &self.slaves[slave.index()];
        if !slot.selected {
            return;
        }
        let (bus, cs, level) = (slot.bus, slot.cs, slot.idle_level());

        self.pins.set_level(cs, level);
        self.disable(bus);
        self.slaves[slave.index()].selected = false;
    }

    fn usart_of(&self, slave: SlaveId) -> Usart {
        self.buses[self.slaves[slave.index()].bus.index()].config.usart
    }

    /// Exchange one unit with the slave and return the unit shifted in.
    ///
    /// Bits of `value` above the bus data width are cleared before the unit
    /// is handed to the driver. The slave should be selected.
    pub fn exchange_unit(&mut self, slave: SlaveId, value: u16) -> u16 {
        let config = &self.buses[self.slaves[slave.index()].bus.index()].config;
        let (usart, mask) = (config.usart, config.data_bits.mask());
        self.driver.transfer_unit(usart, value & mask)
    }

    /// Exchange up to `len` units, one at a time, in index order.
    ///
    /// With both buffers `rx[i]` receives the reply to `tx[i]`. With only
    /// `tx` the replies are dropped. With only `rx` zeros are clocked out.
    /// With neither nothing is sent. The count is further bounded by the
    /// buffers given.
    pub fn exchange_buffer(
        &mut self,
        slave: SlaveId,
        tx: Option<&[u16]>,
        rx: Option<&mut [u16]>,
        len: usize,
    ) {
        match (tx, rx) {
            (Some(tx), Some(rx)) => {
                for (out, inp) in tx.iter().zip(rx.iter_mut()).take(len) {
                    *inp = self.exchange_unit(slave, *out);
                }
            }
            (Some(tx), None) => {
                for out in tx.iter().take(len) {
                    self.exchange_unit(slave, *out);
                }
            }
            (None, Some(rx)) => {
                for inp in rx.iter_mut().take(len) {
                    *inp = self.exchange_unit(slave, 0);
                }
            }
            (None, None) => {}
        }
    }

    /// Transmit one unit together with its control bits, ignoring the reply.
    pub fn send_with_control(&mut self, slave: SlaveId, value: u16) {
        let usart = self.usart_of(slave);
        self.driver.transmit_extended(usart, value);
    }

    /// Number of users currently holding `bus`.
    pub fn user_count(&self, bus: BusId) -> usize {
        self.buses[bus.index()].users
    }

    pub fn bus_state(&self, bus: BusId) -> BusState {
        self.buses[bus.index()].state()
    }

    pub fn is_powered(&self, bus: BusId) -> bool {
        self.bus_state(bus) == BusState::Powered
    }

    pub fn bus_config(&self, bus: BusId) -> &ResolvedBus {
        &self.buses[bus.index()].config
    }

    /// Slaves registered on `bus`, in registration order.
    pub fn slaves(&self, bus: BusId) -> &[SlaveId] {
        &self.buses[bus.index()].slaves
    }

    pub fn bus_of(&self, slave: SlaveId) -> BusId {
        self.slaves[slave.index()].bus
    }

    pub fn is_selected(&self, slave: SlaveId) -> bool {
        self.slaves[slave.index()].selected
    }

    pub fn chip_select(&self, slave: SlaveId) -> PinId {
        self.slaves[slave.index()].cs
    }

    /// Number of buses registered so far.
    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    /// Number of slaves registered so far, over all buses.
    pub fn slave_count(&self) -> usize {
        self.slaves.len()
    }

    /// Iterate over every registered bus.
    pub fn buses(&self) -> impl Iterator<Item = BusId> + '_ {
        (0..self.buses.len()).map(Handle::new)
    }
}
