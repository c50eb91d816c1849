//! Hardware capabilities consumed by the bus manager.
//!
//! These traits sit where the vendor register sequences would otherwise be
//! called directly, so the state machine can run against real peripherals or
//! a software fake.

use embedded_hal::spi::Mode;

use crate::config::{BitOrder, DataBits};
use crate::pin::{Level, PinId, PinMode};
use crate::route::{Clock, Usart};

/// Successful outcomes of [`PinController::configure_pin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinStatus {
    /// The pin was configured by this call.
    Configured,
    /// The pin already had an identical configuration.
    AlreadyConfigured,
}

/// GPIO configuration and level control.
pub trait PinController {
    /// Error reported when a pin cannot be configured.
    type Error: core::fmt::Debug;

    fn configure_pin(
        &mut self,
        pin: PinId,
        open_drain: bool,
        mode: PinMode,
        initial: Level,
    ) -> Result<PinStatus, Self::Error>;

    fn set_high(&mut self, pin: PinId);

    fn set_low(&mut self, pin: PinId);

    fn set_level(&mut self, pin: PinId, level: Level) {
        match level {
            Level::High => self.set_high(pin),
            Level::Low => self.set_low(pin),
        }
    }
}

/// Peripheral clock gating.
pub trait ClockController {
    fn set_clock_enabled(&mut self, clock: Clock, on: bool);
}

/// Synchronous (master) configuration applied on power-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncConfig {
    pub data_bits: DataBits,
    pub baud_rate: u32,
    pub master: bool,
    pub bit_order: BitOrder,
    pub mode: Mode,
}

/// Signals routed to the pins of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Route {
    pub location: u8,
    pub tx: bool,
    pub rx: bool,
    pub clk: bool,
}

/// USART operated in synchronous mode.
///
/// All calls block until the hardware has completed them.
pub trait PeripheralDriver {
    fn init_synchronous(&mut self, usart: Usart, config: &SyncConfig);

    fn set_enabled(&mut self, usart: Usart, on: bool);

    fn set_route(&mut self, usart: Usart, route: Route);

    /// Restores the reset route, leaving the data-out line driven low.
    fn reset_route(&mut self, usart: Usart);

    /// Shifts out `value` and returns the unit shifted in on the same clocks.
    fn transfer_unit(&mut self, usart: Usart, value: u16) -> u16;

    /// Writes `value` through the extended transmit register, control bits
    /// included.
    fn transmit_extended(&mut self, usart: Usart, value: u16);
}
