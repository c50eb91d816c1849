use crate::pin::PinId;
use crate::route::Usart;

/// Configuration errors raised while setting up buses and slaves.
///
/// These are programmer errors caught at boot. Callers that cannot continue
/// without the bus hand them to [`Error::fatal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E: core::fmt::Debug> {
    /// Every bus slot is taken.
    BusPoolExhausted,
    /// Every slave slot is taken.
    SlavePoolExhausted,
    /// Only 8 and 9 bit units are supported.
    UnsupportedDataBits(u8),
    /// No USART with this index.
    InvalidInstance(u8),
    /// Location index beyond the route table.
    InvalidLocation(u8),
    /// The location exists but is not bonded out for this USART.
    UndefinedLocation { usart: Usart, location: u8 },
    /// The bus already has the maximum number of slaves.
    SlaveListFull,
    /// The chip-select pin was already configured by someone else.
    ChipSelectInUse(PinId),
    /// The pin controller rejected a pin.
    PinConfig(PinId, E),
}

impl<E: core::fmt::Debug> Error<E> {
    /// Stable reason code reported when the error is fatal.
    pub const fn code(&self) -> u8 {
        match self {
            Error::BusPoolExhausted => 1,
            Error::SlavePoolExhausted => 2,
            Error::UnsupportedDataBits(_) => 3,
            Error::InvalidInstance(_) => 4,
            Error::InvalidLocation(_) => 5,
            Error::UndefinedLocation { .. } => 6,
            Error::SlaveListFull => 7,
            Error::ChipSelectInUse(_) => 8,
            Error::PinConfig(..) => 9,
        }
    }

    /// Aborts with this error's reason code.
    ///
    /// Meant for boot-time setup, e.g.
    /// `manager.init_bus(config).unwrap_or_else(Error::fatal)`.
    #[track_caller]
    pub fn fatal<T>(self) -> T {
        #[cfg(feature = "defmt")]
        defmt::error!("spi: fatal configuration error {}", self.code());
        panic!("spi configuration error (code {}): {:?}", self.code(), self)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::BusPoolExhausted => write!(f, "No free SPI bus handle"),
            Error::SlavePoolExhausted => {
                write!(f, "No free SPI slave handle")
            }
            Error::UnsupportedDataBits(bits) => {
                write!(f, "Unsupported data width: {} bits", bits)
            }
            Error::InvalidInstance(index) => {
                write!(f, "Invalid USART instance: {}", index)
            }
            Error::InvalidLocation(location) => {
                write!(f, "Invalid route location: {}", location)
            }
            Error::UndefinedLocation { usart, location } => {
                write!(f, "Location {} is not available on {:?}", location, usart)
            }
            Error::SlaveListFull => write!(f, "SPI bus has no room for another slave"),
            Error::ChipSelectInUse(pin) => {
                write!(f, "Chip-select pin {:?} is already in use", pin)
            }
            Error::PinConfig(pin, err) => {
                write!(f, "Failed to configure pin {:?}: {:?}", pin, err)
            }
        }
    }
}
