#![no_std]
//! Shared SPI bus management for EFM32 USARTs in synchronous mode.
//!
//! Several slaves, each with its own chip-select line, share one USART routed
//! to one of its fixed pin locations. The USART is clocked and routed only
//! while at least one slave is selected, and every chip-select line is kept
//! at a safe level: deselected while the bus is live, low while it is down so
//! no current flows into unpowered slaves.
//!
//! ```ignore
//! let mut spi: SpiManager<_, _, _> = SpiManager::new(gpio, cmu, usarts);
//! let bus = spi
//!     .init_bus(BusConfig::default().baud_rate(6_000_000))
//!     .unwrap_or_else(Error::fatal);
//! let radio = spi
//!     .register_slave(bus, PinId::new(Port::E, 13), true)
//!     .unwrap_or_else(Error::fatal);
//!
//! spi.select(radio);
//! let status = spi.exchange_unit(radio, 0x3d);
//! spi.deselect(radio);
//! ```

mod bus;
mod config;
mod device;
mod error;
pub mod hal;
mod manager;
pub mod pin;
mod pool;
pub mod route;
mod shared;
mod slave;

pub use bus::{BusId, BusState, ResolvedBus};
pub use config::{BitOrder, BusConfig, DataBits};
pub use device::SlaveDevice;
pub use error::Error;
pub use manager::SpiManager;
pub use pin::{Level, PinId, PinMode, Port};
pub use pool::Handle;
pub use route::{PinLocation, Usart};
pub use shared::SharedSpiManager;
pub use slave::SlaveId;
