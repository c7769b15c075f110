//! Hardware access for the input core.
//!
//! The decoder and the debouncer never touch GPIO peripherals directly.
//! They read line levels and the time through one [`InputHardware`]
//! object that the application constructs once and lends to both.
//!
//! [`LatchedBoard`] is the stock implementation: edge handlers latch the
//! level they observed, the decoder reads the latched levels back. This
//! keeps the pins owned by whoever waits on their edges.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{InputPin, PinState};
use portable_atomic::AtomicU64;

use crate::input::Button;

/// The GPIO lines the input core listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    PhaseA,
    PhaseB,
    EncoderButton,
    UserButton,
    PowerButton,
}

impl Line {
    pub const COUNT: usize = 5;

    pub const ALL: [Line; Line::COUNT] = [
        Line::PhaseA,
        Line::PhaseB,
        Line::EncoderButton,
        Line::UserButton,
        Line::PowerButton,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

impl From<Button> for Line {
    fn from(button: Button) -> Self {
        match button {
            Button::Encoder => Line::EncoderButton,
            Button::User => Line::UserButton,
            Button::Power => Line::PowerButton,
        }
    }
}

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<C: Clock> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Read access to line levels and time, shared by edge handlers and the
/// poll loop. Both methods must be callable from interrupt context.
pub trait InputHardware {
    /// Current (or last latched) level of `line`.
    fn is_high(&self, line: Line) -> bool;

    /// Monotonic time in milliseconds.
    fn now_ms(&self) -> u64;
}

/// Line levels latched by edge handlers plus a clock.
///
/// All lines start high, matching active-low inputs with pull-ups.
pub struct LatchedBoard<C> {
    levels: [AtomicBool; Line::COUNT],
    clock: C,
}

impl<C: Clock> LatchedBoard<C> {
    pub const fn new(clock: C) -> Self {
        Self {
            levels: [
                AtomicBool::new(true),
                AtomicBool::new(true),
                AtomicBool::new(true),
                AtomicBool::new(true),
                AtomicBool::new(true),
            ],
            clock,
        }
    }

    /// Record the level an edge handler observed on `line`.
    pub fn latch(&self, line: Line, state: PinState) {
        self.levels[line.index()].store(state == PinState::High, Ordering::Release);
    }

    /// Read `pin`, latch its level for `line` and return it.
    ///
    /// # Errors
    ///
    /// Propagates the pin's read error; the latched level is left untouched.
    pub fn sample<P: InputPin>(&self, line: Line, pin: &mut P) -> Result<PinState, P::Error> {
        let state = PinState::from(pin.is_high()?);
        self.latch(line, state);
        Ok(state)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> InputHardware for LatchedBoard<C> {
    fn is_high(&self, line: Line) -> bool {
        self.levels[line.index()].load(Ordering::Acquire)
    }

    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

/// A clock that only moves when told to. Used for simulation and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub const fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::Release);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}
