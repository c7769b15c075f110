//! Input and UI core for a rotary-encoder driven display device.
//!
//! A quadrature encoder and three active-low push-buttons are turned into
//! rotation steps and short/long presses, routed to callbacks and finally
//! to the focused component of a small pixel screen.
//!
//! Everything here is host-testable (no embedded hardware required):
//! hardware access goes through [`hal::InputHardware`], drawing through an
//! `embedded-graphics` `DrawTarget`.
//!
//! Usage: `cargo test --lib`
//!
//! Note: The firmware binary lives in main.rs (`--features embedded`) with
//! #![no_std] and #![no_main] and wires these modules to embassy-nrf GPIO
//! and an SSD1306 OLED.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod hal;
pub mod input;
pub mod ui;

pub use config::{DecodeStrategy, InputConfig};
pub use error::Error;
pub use hal::{Clock, InputHardware, LatchedBoard, Line, ManualClock};
pub use input::{
    Button, ButtonDebouncer, Direction, EventRouter, PressEvent, PressKind, QuadratureDecoder,
};
pub use ui::{Component, ComponentId, ComponentState, FocusShell, Screen, Theme};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
