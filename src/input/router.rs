//! Callback routing for decoded input.
//!
//! The router owns a fixed table of optional function pointers, one slot
//! per rotation direction and one per (button, press kind). Every callback
//! receives a mutable context `Ctx` supplied by whoever polls - usually the
//! screen the events are meant for.
//!
//! One `poll()` per UI tick:
//! 1. net rotation since the last poll -> at most one rotation callback
//! 2. finished presses, most recent first -> one press callback each

use crate::config::BUTTON_LOG_CAPACITY;
use crate::error::Error;
use crate::hal::InputHardware;
use crate::input::{Button, ButtonDebouncer, Direction, PressKind, QuadratureDecoder};

/// Rotation callback; receives the step magnitude (always > 0).
pub type RotationAction<Ctx> = fn(&mut Ctx, u32);

/// Button press callback.
pub type PressAction<Ctx> = fn(&mut Ctx);

/// Dispatches drained encoder steps and button presses to callbacks.
pub struct EventRouter<'a, H, Ctx, const N: usize = BUTTON_LOG_CAPACITY> {
    encoder: &'a QuadratureDecoder<'a, H>,
    buttons: &'a ButtonDebouncer<'a, H, N>,
    rotation: [Option<RotationAction<Ctx>>; 2],
    presses: [[Option<PressAction<Ctx>>; PressKind::COUNT]; Button::COUNT],
}

impl<'a, H: InputHardware, Ctx, const N: usize> EventRouter<'a, H, Ctx, N> {
    pub fn new(encoder: &'a QuadratureDecoder<'a, H>, buttons: &'a ButtonDebouncer<'a, H, N>) -> Self {
        Self {
            encoder,
            buttons,
            rotation: [None; 2],
            presses: [[None; PressKind::COUNT]; Button::COUNT],
        }
    }

    /// Set the callback for `direction`, replacing any previous one.
    pub fn on_rotation(&mut self, direction: Direction, action: RotationAction<Ctx>) {
        self.rotation[direction_slot(direction)] = Some(action);
    }

    /// Set the callback for `kind` presses of `button`, replacing any previous one.
    pub fn on_press(&mut self, button: Button, kind: PressKind, action: PressAction<Ctx>) {
        self.presses[button.index()][kind.index()] = Some(action);
    }

    /// Name-keyed variant of [`on_rotation`](Self::on_rotation).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKey`] if `direction` is neither `"clockwise"` nor
    /// `"counterclockwise"`. The table is left unchanged.
    pub fn register_rotation(&mut self, direction: &str, action: RotationAction<Ctx>) -> Result<(), Error> {
        let direction: Direction = direction.parse()?;
        self.on_rotation(direction, action);
        Ok(())
    }

    /// Name-keyed variant of [`on_press`](Self::on_press).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKey`] for an unknown button or press kind. The table
    /// is left unchanged.
    pub fn register_press(&mut self, button: &str, kind: &str, action: PressAction<Ctx>) -> Result<(), Error> {
        let button: Button = button.parse()?;
        let kind: PressKind = kind.parse()?;
        self.on_press(button, kind, action);
        Ok(())
    }

    /// Remove the callback for `direction`.
    pub fn clear_rotation(&mut self, direction: Direction) {
        self.rotation[direction_slot(direction)] = None;
    }

    /// Remove the callback for `kind` presses of `button`.
    pub fn clear_press(&mut self, button: Button, kind: PressKind) {
        self.presses[button.index()][kind.index()] = None;
    }

    pub fn has_press(&self, button: Button, kind: PressKind) -> bool {
        self.presses[button.index()][kind.index()].is_some()
    }

    /// Drain both decoders and invoke the matching callbacks.
    ///
    /// Returns the number of callbacks invoked. Never blocks.
    pub fn poll(&mut self, ctx: &mut Ctx) -> usize {
        let mut invoked = 0;

        let steps = self.encoder.drain_steps();
        let direction = match steps {
            0 => None,
            s if s > 0 => Some(Direction::Clockwise),
            _ => Some(Direction::CounterClockwise),
        };
        if let Some(direction) = direction {
            if let Some(action) = self.rotation[direction_slot(direction)] {
                action(ctx, steps.unsigned_abs());
                invoked += 1;
            }
        }

        for event in self.buttons.drain_events() {
            if let Some(action) = self.presses[event.button.index()][event.kind.index()] {
                action(ctx);
                invoked += 1;
            }
        }

        invoked
    }
}

const fn direction_slot(direction: Direction) -> usize {
    match direction {
        Direction::Clockwise => 0,
        Direction::CounterClockwise => 1,
    }
}
