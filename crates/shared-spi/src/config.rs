/// Bits per transferred unit supported by the USART in synchronous mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Eight,
    Nine,
}

impl DataBits {
    /// Maps a bit count to a supported width.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(DataBits::Eight),
            9 => Some(DataBits::Nine),
            _ => None,
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            DataBits::Eight => 8,
            DataBits::Nine => 9,
        }
    }

    /// Mask covering one unit of this width.
    pub const fn mask(self) -> u16 {
        (1 << self.bits()) - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Requested configuration of a bus.
///
/// `data_bits` and the indices are kept raw so that an unsupported value is
/// reported by [`SpiManager::init_bus`](crate::SpiManager::init_bus) with its
/// own reason code.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// USART instance index.
    pub instance: u8,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub bit_order: BitOrder,
    /// Route location index, see [`route`](crate::route).
    pub location: u8,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            instance: 0,
            baud_rate: 1_000_000,
            data_bits: 8,
            bit_order: BitOrder::MsbFirst,
            location: 0,
        }
    }
}

impl BusConfig {
    pub const fn new(
        instance: u8,
        baud_rate: u32,
        data_bits: u8,
        bit_order: BitOrder,
        location: u8,
    ) -> Self {
        Self { instance, baud_rate, data_bits, bit_order, location }
    }

    pub const fn instance(mut self, instance: u8) -> Self {
        self.instance = instance;
        self
    }

    pub const fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub const fn data_bits(mut self, data_bits: u8) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub const fn bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    pub const fn location(mut self, location: u8) -> Self {
        self.location = location;
        self
    }
}
