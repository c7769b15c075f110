//! Application-wide constants and runtime input configuration.
//!
//! Timing parameters, capacities and the pin map live here so they can be
//! tuned in one place. [`InputConfig`] carries the subset that can be
//! changed at start-up without recompiling.

use crate::input::{Button, PressKind};

// Press classification

/// Holds at or below this duration are short presses; longer ones are long (ms).
pub const LONG_PRESS_MS: u64 = 2000;

/// Settle time the firmware edge task waits before sampling a button (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Number of raw press records kept between two polls.
///
/// Bounds how many presses can be in flight at once; a release whose press
/// record was evicted is dropped.
pub const BUTTON_LOG_CAPACITY: usize = 5;

// Rotary encoder

/// Encoder edges closer than this to the previous accepted edge are ignored (ms).
pub const ENCODER_MIN_EDGE_INTERVAL_MS: u64 = 2;

// Screen

/// Maximum number of components a screen can hold.
pub const MAX_COMPONENTS: usize = 16;

/// Maximum title length (bytes).
pub const TITLE_CAPACITY: usize = 32;

/// Vertical offset of the screen title (px).
pub const TITLE_Y_OFFSET: i32 = 5;

/// UI tick period of the firmware main loop (ms).
pub const UI_TICK_MS: u64 = 20;

// GPIO pin assignments (nRF52840-DK defaults)
//
// Logical names only; the concrete `embassy_nrf::peripherals::*` are
// picked in `main.rs`. Adjust for your custom PCB.
//
//   Encoder phase A → P0.03
//   Encoder phase B → P0.04
//   Encoder button  → P0.28
//   User button     → P0.11
//   Power button    → P0.12
//   I²C SDA         → P0.26
//   I²C SCL         → P0.27

/// How the quadrature decoder resolves rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeStrategy {
    /// Only phase-A transitions are decoded: one step per A edge, direction
    /// from whether A and B differ afterwards. Half the resolution of a
    /// textbook decoder.
    #[default]
    HalfResolution,
    /// Four-state gray-code decode of every A and B transition. Invalid
    /// transitions (both lines changed) count as zero.
    FullQuadrature,
}

/// Start-up configuration of the input core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    pub(crate) long_press_ms: u64,
    pub(crate) encoder_min_edge_interval_ms: u64,
    pub(crate) decode_strategy: DecodeStrategy,
    pub(crate) focus_button: Button,
    pub(crate) focus_kind: PressKind,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl InputConfig {
    /// Configuration built from the compile-time constants above.
    pub const fn new() -> Self {
        Self {
            long_press_ms: LONG_PRESS_MS,
            encoder_min_edge_interval_ms: ENCODER_MIN_EDGE_INTERVAL_MS,
            decode_strategy: DecodeStrategy::HalfResolution,
            focus_button: Button::User,
            focus_kind: PressKind::Short,
        }
    }

    pub const fn with_long_press_ms(mut self, long_press_ms: u64) -> Self {
        self.long_press_ms = long_press_ms;
        self
    }

    pub const fn with_encoder_min_edge_interval_ms(mut self, interval_ms: u64) -> Self {
        self.encoder_min_edge_interval_ms = interval_ms;
        self
    }

    pub const fn with_decode_strategy(mut self, decode_strategy: DecodeStrategy) -> Self {
        self.decode_strategy = decode_strategy;
        self
    }

    /// Which button press advances focus to the next component.
    pub const fn with_focus_binding(mut self, button: Button, kind: PressKind) -> Self {
        self.focus_button = button;
        self.focus_kind = kind;
        self
    }

    pub const fn long_press_ms(&self) -> u64 {
        self.long_press_ms
    }

    pub const fn encoder_min_edge_interval_ms(&self) -> u64 {
        self.encoder_min_edge_interval_ms
    }

    pub const fn decode_strategy(&self) -> DecodeStrategy {
        self.decode_strategy
    }

    pub const fn focus_binding(&self) -> (Button, PressKind) {
        (self.focus_button, self.focus_kind)
    }
}
