//! Input subsystem - rotary encoder + three push-buttons.
//!
//! Edge handlers feed raw transitions into the [`QuadratureDecoder`] and
//! the [`ButtonDebouncer`]. Once per UI tick the [`EventRouter`] drains
//! both and dispatches the resulting events to registered callbacks.
//!
//! ## Buttons
//!
//! - **Encoder**: push switch integrated in the rotary encoder ("activate")
//! - **User**: general purpose button (advances focus by default)
//! - **Power**: power / back button

pub mod buttons;
pub mod encoder;
pub mod router;


use core::str::FromStr;

use crate::error::Error;

pub use buttons::{ButtonDebouncer, DebouncerStats, PressBatch};
pub use encoder::QuadratureDecoder;
pub use router::{EventRouter, PressAction, RotationAction};

/// Rotation direction of the encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Clockwise => "clockwise",
            Direction::CounterClockwise => "counterclockwise",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clockwise" => Ok(Direction::Clockwise),
            "counterclockwise" => Ok(Direction::CounterClockwise),
            _ => Err(Error::InvalidKey),
        }
    }
}

/// Logical push-buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Encoder,
    User,
    Power,
}

impl Button {
    pub const COUNT: usize = 3;

    pub const ALL: [Button; Button::COUNT] = [Button::Encoder, Button::User, Button::Power];

    pub const fn name(self) -> &'static str {
        match self {
            Button::Encoder => "encoder",
            Button::User => "user",
            Button::Power => "power",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Button {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "encoder" => Ok(Button::Encoder),
            "user" => Ok(Button::User),
            "power" => Ok(Button::Power),
            _ => Err(Error::InvalidKey),
        }
    }
}

/// Press classification by hold duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    Short,
    Long,
}

impl PressKind {
    pub const COUNT: usize = 2;

    /// Classify a hold of `duration_ms` against `long_press_ms`.
    ///
    /// Only holds strictly longer than the threshold are long.
    pub const fn classify(duration_ms: u64, long_press_ms: u64) -> Self {
        if duration_ms > long_press_ms {
            PressKind::Long
        } else {
            PressKind::Short
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PressKind::Short => "short",
            PressKind::Long => "long",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for PressKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(PressKind::Short),
            "long" => Ok(PressKind::Long),
            _ => Err(Error::InvalidKey),
        }
    }
}

/// A completed, classified button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressEvent {
    pub kind: PressKind,
    pub button: Button,
    pub duration_ms: u64,
}
