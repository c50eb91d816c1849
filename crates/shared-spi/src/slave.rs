use crate::bus::BusId;
use crate::pin::{Level, PinId};
use crate::pool::Handle;

#[doc(hidden)]
pub enum SlaveTag {}

/// Handle to a slave registered with a [`SpiManager`](crate::SpiManager).
pub type SlaveId = Handle<SlaveTag>;

/// Slave slot: the owning bus and the chip-select line.
pub(crate) struct Slave {
    pub bus: BusId,
    pub cs: PinId,
    pub active_low: bool,
    pub selected: bool,
}

impl Slave {
    /// Level that selects the slave.
    pub fn active_level(&self) -> Level {
        if self.active_low {
            Level::Low
        } else {
            Level::High
        }
    }

    /// Level that leaves the slave deselected.
    pub fn idle_level(&self) -> Level {
        if self.active_low {
            Level::High
        } else {
            Level::Low
        }
    }
}
