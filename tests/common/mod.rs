#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use nixie_tube::{IndexPolicy, NixieTube};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Clk,
    Cs,
    Din,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Set(Line, bool),
    DelayNs(u32),
}

pub type Trace = Rc<RefCell<Vec<Event>>>;

pub struct RecordingPin {
    line: Line,
    trace: Trace,
    broken: Rc<Cell<bool>>,
}

impl RecordingPin {
    fn record(&mut self, high: bool) -> Result<(), ErrorKind> {
        if self.broken.get() {
            return Err(ErrorKind::Other);
        }
        self.trace.borrow_mut().push(Event::Set(self.line, high));
        Ok(())
    }
}

impl ErrorType for RecordingPin {
    type Error = ErrorKind;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true)
    }
}

pub struct RecordingDelay {
    trace: Trace,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.trace.borrow_mut().push(Event::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_ns(us * 1_000);
    }
}

pub type TestTube = NixieTube<RecordingPin, RecordingPin, RecordingPin, RecordingDelay>;

pub struct Bus {
    pub trace: Trace,
    /// Makes every data-line write fail while set.
    pub din_broken: Rc<Cell<bool>>,
}

impl Bus {
    pub fn new() -> Self {
        Self {
            trace: Rc::new(RefCell::new(Vec::new())),
            din_broken: Rc::new(Cell::new(false)),
        }
    }

    pub fn parts(&self) -> (RecordingPin, RecordingPin, RecordingPin, RecordingDelay) {
        let pin = |line, broken: Rc<Cell<bool>>| RecordingPin {
            line,
            trace: self.trace.clone(),
            broken,
        };
        (
            pin(Line::Clk, Rc::new(Cell::new(false))),
            pin(Line::Cs, Rc::new(Cell::new(false))),
            pin(Line::Din, self.din_broken.clone()),
            RecordingDelay {
                trace: self.trace.clone(),
            },
        )
    }

    pub fn clear(&self) {
        self.trace.borrow_mut().clear();
    }

    pub fn events(&self) -> Vec<Event> {
        self.trace.borrow().clone()
    }

    pub fn transactions(&self) -> Vec<(u8, u8)> {
        decode(&self.trace.borrow())
    }
}

pub fn tube(digit_count: u8) -> (TestTube, Bus) {
    tube_with_policy(digit_count, IndexPolicy::Ignore)
}

pub fn tube_with_policy(digit_count: u8, policy: IndexPolicy) -> (TestTube, Bus) {
    let bus = Bus::new();
    let (clk, cs, din, delay) = bus.parts();
    let tube = NixieTube::with_policy(clk, cs, din, delay, digit_count, policy).unwrap();
    (tube, bus)
}

/// Bits on the data line sampled at each rising clock edge while chip-select
/// is low, one entry per completed transaction.
pub fn sampled_bits(events: &[Event]) -> Vec<Vec<bool>> {
    let mut frames = Vec::new();
    let mut selected = false;
    let mut clk = true;
    let mut din = false;
    let mut bits = Vec::new();

    for event in events {
        match *event {
            Event::Set(Line::Cs, false) => {
                selected = true;
                bits.clear();
            }
            Event::Set(Line::Cs, true) => {
                if selected {
                    frames.push(bits.clone());
                }
                selected = false;
            }
            Event::Set(Line::Din, level) => din = level,
            Event::Set(Line::Clk, level) => {
                if selected && level && !clk {
                    bits.push(din);
                }
                clk = level;
            }
            Event::DelayNs(_) => {}
        }
    }
    frames
}

pub fn decode(events: &[Event]) -> Vec<(u8, u8)> {
    sampled_bits(events)
        .into_iter()
        .map(|bits| {
            assert_eq!(bits.len(), 16, "transaction is not 16 bits");
            let word = bits
                .iter()
                .fold(0u16, |acc, bit| (acc << 1) | u16::from(*bit));
            ((word >> 8) as u8, word as u8)
        })
        .collect()
}
