use heapless::Vec;

use crate::config::{BitOrder, DataBits};
use crate::pool::Handle;
use crate::route::{PinLocation, Usart};
use crate::slave::SlaveId;

#[doc(hidden)]
pub enum BusTag {}

/// Handle to a bus registered with a [`SpiManager`](crate::SpiManager).
pub type BusId = Handle<BusTag>;

/// Power state of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    /// No user; the USART is unclocked and unrouted.
    PoweredDown,
    /// At least one user; the USART is clocked, configured and routed.
    Powered,
}

/// Validated configuration held by a bus slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolvedBus {
    pub usart: Usart,
    pub pins: &'static PinLocation,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub bit_order: BitOrder,
}

/// Bus slot: configuration, registered slaves and the user count.
pub(crate) struct Bus<const PER_BUS: usize> {
    pub config: ResolvedBus,
    pub slaves: Vec<SlaveId, PER_BUS>,
    pub users: usize,
}

impl<const PER_BUS: usize> Bus<PER_BUS> {
    pub fn new(config: ResolvedBus) -> Self {
        Self { config, slaves: Vec::new(), users: 0 }
    }

    pub fn state(&self) -> BusState {
        if self.users > 0 {
            BusState::Powered
        } else {
            BusState::PoweredDown
        }
    }
}
