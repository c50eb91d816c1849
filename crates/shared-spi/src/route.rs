//! USART pin routing table.
//!
//! Each USART can drive its data and clock signals on one of a few fixed pin
//! sets ("locations"). Not every package exposes every location, so some
//! entries are undefined and must be rejected by the caller.

use crate::pin::Port::{B, C, D, E, F};
use crate::pin::{PinId, Port};

/// Number of USART instances usable in synchronous mode.
pub const USARTS: usize = 3;
/// Number of route locations per USART.
pub const LOCATIONS: usize = 6;

/// A USART instance backing an SPI bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Usart {
    Usart0,
    Usart1,
    Usart2,
}

impl Usart {
    /// Returns the instance with the given index, if it exists.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Usart::Usart0),
            1 => Some(Usart::Usart1),
            2 => Some(Usart::Usart2),
            _ => None,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Peripheral clock gating this instance.
    pub const fn clock(self) -> Clock {
        match self {
            Usart::Usart0 => Clock::Usart0,
            Usart::Usart1 => Clock::Usart1,
            Usart::Usart2 => Clock::Usart2,
        }
    }
}

/// Clock branches handed to the clock controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Clock {
    Usart0,
    Usart1,
    Usart2,
}

/// Pins used by one route location of a USART.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinLocation {
    /// Location index written to the route register.
    pub location: u8,
    pub mosi: PinId,
    /// `None` when the package has no data-in pin for this location.
    pub miso: Option<PinId>,
    pub clk: PinId,
}

impl PinLocation {
    /// True when the location cannot receive.
    pub const fn is_transmit_only(&self) -> bool {
        self.miso.is_none()
    }
}

const fn loc(
    location: u8,
    mosi: (Port, u8),
    miso: Option<(Port, u8)>,
    clk: (Port, u8),
) -> Option<PinLocation> {
    Some(PinLocation {
        location,
        mosi: PinId::new(mosi.0, mosi.1),
        miso: match miso {
            Some((port, pin)) => Some(PinId::new(port, pin)),
            None => None,
        },
        clk: PinId::new(clk.0, clk.1),
    })
}

static ROUTES: [[Option<PinLocation>; LOCATIONS]; USARTS] = [
    // USART0
    [
        loc(0, (E, 10), Some((E, 11)), (E, 12)),
        loc(1, (E, 7), Some((E, 6)), (E, 5)),
        loc(2, (C, 11), Some((C, 10)), (C, 9)),
        None,
        loc(4, (B, 7), Some((B, 8)), (B, 13)),
        loc(5, (C, 0), Some((C, 1)), (B, 13)),
    ],
    // USART1
    [
        loc(0, (C, 0), Some((C, 1)), (B, 7)),
        loc(1, (D, 0), Some((D, 1)), (D, 2)),
        loc(2, (D, 7), Some((D, 6)), (F, 0)),
        None,
        None,
        None,
    ],
    // USART2
    [
        loc(0, (C, 2), Some((C, 3)), (C, 4)),
        loc(1, (B, 3), None, (B, 5)),
        None,
        None,
        None,
        None,
    ],
];

/// Looks up the pins of `location` on `usart`.
///
/// Returns `None` for locations that are out of range or not bonded out.
pub fn resolve(usart: Usart, location: u8) -> Option<&'static PinLocation> {
    ROUTES[usart.index() as usize]
        .get(location as usize)
        .and_then(Option::as_ref)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_defined_locations() {
        let pins = resolve(Usart::Usart0, 2).unwrap();
        assert_eq!(pins.location, 2);
        assert_eq!(pins.mosi, PinId::new(Port::C, 11));
        assert_eq!(pins.miso, Some(PinId::new(Port::C, 10)));
        assert_eq!(pins.clk, PinId::new(Port::C, 9));
    }

    #[test]
    fn rejects_missing_locations() {
        assert!(resolve(Usart::Usart0, 3).is_none());
        assert!(resolve(Usart::Usart1, 5).is_none());
        assert!(resolve(Usart::Usart2, 2).is_none());
        assert!(resolve(Usart::Usart0, LOCATIONS as u8).is_none());
    }

    #[test]
    fn location_index_matches_slot() {
        for index in 0..USARTS as u8 {
            let usart = Usart::from_index(index).unwrap();
            for location in 0..LOCATIONS as u8 {
                if let Some(pins) = resolve(usart, location) {
                    assert_eq!(pins.location, location);
                }
            }
        }
    }

    #[test]
    fn usart2_location1_is_transmit_only() {
        let pins = resolve(Usart::Usart2, 1).unwrap();
        assert!(pins.is_transmit_only());
        assert!(!resolve(Usart::Usart2, 0).unwrap().is_transmit_only());
    }

    #[test]
    fn instance_index_round_trips() {
        assert_eq!(Usart::from_index(1), Some(Usart::Usart1));
        assert_eq!(Usart::from_index(3), None);
        assert_eq!(Usart::Usart2.clock(), Clock::Usart2);
    }
}
