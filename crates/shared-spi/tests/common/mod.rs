#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use shared_spi::hal::{
    ClockController, PeripheralDriver, PinController, PinStatus, Route,
    SyncConfig,
};
use shared_spi::route::Clock;
use shared_spi::{Level, PinId, PinMode, SpiManager, Usart};

// ---------------------------------------------------------------------------
// Fake hardware
// ---------------------------------------------------------------------------

/// Everything the fake hardware was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Configure { pin: PinId, mode: PinMode, initial: Level },
    Set(PinId, Level),
    Clock(Clock, bool),
    Init(Usart, SyncConfig),
    Enable(Usart, bool),
    Route(Usart, Route),
    ResetRoute(Usart),
    Transfer(Usart, u16),
    TransmitExtended(Usart, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakePinError {
    /// The pin was injected to fail.
    Broken,
    /// The pin is already configured with another mode.
    Conflict,
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    modes: HashMap<PinId, PinMode>,
    levels: HashMap<PinId, Level>,
    broken: Option<PinId>,
    replies: VecDeque<u16>,
}

/// Inspection side of the fake; the three collaborators share its state.
#[derive(Clone, Default)]
pub struct Hardware {
    state: Rc<RefCell<State>>,
}

pub struct FakePins(Hardware);
pub struct FakeClocks(Hardware);
pub struct FakeUsart(Hardware);

pub type Manager = SpiManager<FakePins, FakeClocks, FakeUsart>;

impl Hardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manager<const B: usize, const S: usize, const PB: usize>(
        &self,
    ) -> SpiManager<FakePins, FakeClocks, FakeUsart, B, S, PB> {
        SpiManager::new(
            FakePins(self.clone()),
            FakeClocks(self.clone()),
            FakeUsart(self.clone()),
        )
    }

    fn push(&self, event: Event) {
        self.state.borrow_mut().events.push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.state.borrow().events.iter().filter(|e| f(e)).count()
    }

    /// Number of times a bus clock was switched on.
    pub fn power_ups(&self) -> usize {
        self.count(|e| matches!(e, Event::Clock(_, true)))
    }

    /// Number of times a bus clock was switched off.
    pub fn power_downs(&self) -> usize {
        self.count(|e| matches!(e, Event::Clock(_, false)))
    }

    pub fn level(&self, pin: PinId) -> Option<Level> {
        self.state.borrow().levels.get(&pin).copied()
    }

    pub fn break_pin(&self, pin: PinId) {
        self.state.borrow_mut().broken = Some(pin);
    }

    /// Queue replies for the next transfers; afterwards the fake answers
    /// `value ^ 0x5a`.
    pub fn reply_with(&self, replies: &[u16]) {
        self.state.borrow_mut().replies.extend(replies.iter().copied());
    }

    pub fn position(&self, event: &Event) -> Option<usize> {
        self.state.borrow().events.iter().position(|e| e == event)
    }
}

impl PinController for FakePins {
    type Error = FakePinError;

    fn configure_pin(
        &mut self,
        pin: PinId,
        _open_drain: bool,
        mode: PinMode,
        initial: Level,
    ) -> Result<PinStatus, Self::Error> {
        let mut state = self.0.state.borrow_mut();
        if state.broken == Some(pin) {
            return Err(FakePinError::Broken);
        }
        match state.modes.get(&pin) {
            Some(existing) if *existing == mode => {
                return Ok(PinStatus::AlreadyConfigured);
            }
            Some(_) => return Err(FakePinError::Conflict),
            None => {}
        }
        state.modes.insert(pin, mode);
        state.levels.insert(pin, initial);
        state.events.push(Event::Configure { pin, mode, initial });
        Ok(PinStatus::Configured)
    }

    fn set_high(&mut self, pin: PinId) {
        let mut state = self.0.state.borrow_mut();
        state.levels.insert(pin, Level::High);
        state.events.push(Event::Set(pin, Level::High));
    }

    fn set_low(&mut self, pin: PinId) {
        let mut state = self.0.state.borrow_mut();
        state.levels.insert(pin, Level::Low);
        state.events.push(Event::Set(pin, Level::Low));
    }
}

impl ClockController for FakeClocks {
    fn set_clock_enabled(&mut self, clock: Clock, on: bool) {
        self.0.push(Event::Clock(clock, on));
    }
}

impl PeripheralDriver for FakeUsart {
    fn init_synchronous(&mut self, usart: Usart, config: &SyncConfig) {
        self.0.push(Event::Init(usart, *config));
    }

    fn set_enabled(&mut self, usart: Usart, on: bool) {
        self.0.push(Event::Enable(usart, on));
    }

    fn set_route(&mut self, usart: Usart, route: Route) {
        self.0.push(Event::Route(usart, route));
    }

    fn reset_route(&mut self, usart: Usart) {
        self.0.push(Event::ResetRoute(usart));
    }

    fn transfer_unit(&mut self, usart: Usart, value: u16) -> u16 {
        self.0.push(Event::Transfer(usart, value));
        self.0.state.borrow_mut().replies.pop_front().unwrap_or(value ^ 0x5a)
    }

    fn transmit_extended(&mut self, usart: Usart, value: u16) {
        self.0.push(Event::TransmitExtended(usart, value));
    }
}
