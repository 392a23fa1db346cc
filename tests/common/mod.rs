//! Recording fakes shared by the integration tests.
//!
//! Every fake appends to one ordered event log so tests can assert on the
//! interleaving of pulses, delays, housekeeping and display traffic.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use stepper_timing::{
    Button, ControlLoop, DisplayAdapter, EngineConfig, Housekeeping, MonotonicClock,
    StepPulseDriverBuilder,
};

/// One observable side effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StepHigh,
    StepLow,
    DirHigh,
    DirLow,
    DelayUs(u32),
    DelayMs(u32),
    Service,
    Display(String),
}

impl Event {
    pub fn is_display(&self) -> bool {
        matches!(self, Event::Display(_))
    }
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Rising edges a pin accepts before its next one fails (`None` = never).
pub type FaultCountdown = Rc<Cell<Option<u32>>>;

/// Output pin that logs its transitions.
pub struct RecPin {
    log: Log,
    high: Event,
    low: Event,
    fault: FaultCountdown,
}

impl RecPin {
    pub fn step(log: &Log, fault: &FaultCountdown) -> Self {
        Self {
            log: log.clone(),
            high: Event::StepHigh,
            low: Event::StepLow,
            fault: fault.clone(),
        }
    }

    pub fn dir(log: &Log) -> Self {
        Self {
            log: log.clone(),
            high: Event::DirHigh,
            low: Event::DirLow,
            fault: Rc::new(Cell::new(None)),
        }
    }
}

impl ErrorType for RecPin {
    type Error = ErrorKind;
}

impl OutputPin for RecPin {
    fn set_high(&mut self) -> Result<(), ErrorKind> {
        match self.fault.get() {
            Some(0) => {
                self.fault.set(None);
                return Err(ErrorKind::Other);
            }
            Some(n) => self.fault.set(Some(n - 1)),
            None => {}
        }
        self.log.borrow_mut().push(self.high.clone());
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), ErrorKind> {
        self.log.borrow_mut().push(self.low.clone());
        Ok(())
    }
}

/// Delay that logs instead of sleeping.
pub struct RecDelay {
    log: Log,
}

impl DelayNs for RecDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayUs(ns / 1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

/// Housekeeping hook that logs each service call.
pub struct RecHousekeeping {
    log: Log,
}

impl Housekeeping for RecHousekeeping {
    fn service(&mut self) {
        self.log.borrow_mut().push(Event::Service);
    }
}

/// Active-low button whose level is set by the test.
pub struct FakeButton {
    pressed: Rc<Cell<bool>>,
}

impl ErrorType for FakeButton {
    type Error = Infallible;
}

impl InputPin for FakeButton {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.pressed.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.pressed.get())
    }
}

/// Clock whose time is set by the test.
pub struct FakeClock {
    now: Rc<Cell<u32>>,
}

impl MonotonicClock for FakeClock {
    fn now_ms(&mut self) -> u32 {
        self.now.get()
    }
}

/// Panel that logs every call as text.
pub struct RecDisplay {
    log: Log,
    fail_init: bool,
}

impl RecDisplay {
    fn push(&self, op: String) {
        self.log.borrow_mut().push(Event::Display(op));
    }
}

impl DisplayAdapter for RecDisplay {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        if self.fail_init {
            Err(())
        } else {
            Ok(())
        }
    }

    fn clear(&mut self) -> Result<(), ()> {
        self.push("clear".to_string());
        Ok(())
    }

    fn draw_text(&mut self, _x: i32, _y: i32, _size: u8, text: &str) -> Result<(), ()> {
        self.push(text.to_string());
        Ok(())
    }

    fn draw_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32) -> Result<(), ()> {
        self.push("rect".to_string());
        Ok(())
    }

    fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32) -> Result<(), ()> {
        self.push("fill".to_string());
        Ok(())
    }

    fn present(&mut self) -> Result<(), ()> {
        self.push("present".to_string());
        Ok(())
    }
}

pub type TestLoop =
    ControlLoop<RecPin, RecPin, RecDelay, RecHousekeeping, FakeButton, FakeClock, RecDisplay>;

/// A control loop on recording fakes plus the handles that steer it.
pub struct Rig {
    pub control: TestLoop,
    pub log: Log,
    pub pressed: Rc<Cell<bool>>,
    pub now: Rc<Cell<u32>>,
    pub step_fault: FaultCountdown,
}

impl Rig {
    pub fn new(config: EngineConfig) -> Self {
        Self::build(config, false)
    }

    pub fn with_broken_display(config: EngineConfig) -> Self {
        Self::build(config, true)
    }

    fn build(config: EngineConfig, fail_init: bool) -> Self {
        let log = new_log();
        let pressed = Rc::new(Cell::new(false));
        let now = Rc::new(Cell::new(0));
        let step_fault = Rc::new(Cell::new(None));

        let driver = StepPulseDriverBuilder::new()
            .step_pin(RecPin::step(&log, &step_fault))
            .dir_pin(RecPin::dir(&log))
            .delay(RecDelay { log: log.clone() })
            .housekeeping(RecHousekeeping { log: log.clone() })
            .from_config(&config)
            .build()
            .unwrap();
        let button = Button::active_low(
            FakeButton {
                pressed: pressed.clone(),
            },
            config.debounce_ms as u32,
        );
        let clock = FakeClock { now: now.clone() };
        let display = RecDisplay {
            log: log.clone(),
            fail_init,
        };

        Self {
            control: ControlLoop::new(config, driver, button, clock, display),
            log,
            pressed,
            now,
            step_fault,
        }
    }

    /// Take and clear the event log.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Fail the STEP pin once, after `pulses` more successful pulses.
    pub fn fail_step_after(&self, pulses: u32) {
        self.step_fault.set(Some(pulses));
    }

    /// Tick once at time `now_ms`.
    pub fn tick_at(&mut self, now_ms: u32) {
        self.now.set(now_ms);
        self.control.tick().unwrap();
    }
}

/// Full step intervals (pulse plus low period) in emission order.
pub fn step_intervals(events: &[Event]) -> Vec<u32> {
    let mut intervals = Vec::new();
    let mut i = 0;
    while i < events.len() {
        if events[i] == Event::StepHigh {
            let high = match events.get(i + 1) {
                Some(Event::DelayUs(us)) => *us,
                _ => 0,
            };
            let low = match events.get(i + 3) {
                Some(Event::DelayUs(us)) if events.get(i + 2) == Some(&Event::StepLow) => *us,
                _ => 0,
            };
            intervals.push(high + low);
        }
        i += 1;
    }
    intervals
}

/// For each gap between consecutive pulses, whether a display call sits in it.
pub fn display_gaps(events: &[Event]) -> Vec<bool> {
    let highs: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| **e == Event::StepHigh)
        .map(|(i, _)| i)
        .collect();
    highs
        .windows(2)
        .map(|w| events[w[0]..w[1]].iter().any(Event::is_display))
        .collect()
}
