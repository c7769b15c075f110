//! User interface subsystem - focusable components on a pixel display.
//!
//! A [`Screen`] owns the component list and tracks the one focused
//! component. The [`FocusShell`] wires a screen to an
//! [`EventRouter`](crate::input::EventRouter) so that encoder rotation and
//! encoder presses reach the focused component and the advance-focus
//! button moves focus along.
//!
//! Drawing goes through `embedded-graphics`; the shell never knows which
//! display driver sits behind the `DrawTarget`.

pub mod input_logic;
pub mod screen;


use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::input::{Button, Direction, PressKind};

pub use screen::{FocusShell, Screen};

/// Identity of a component on its screen.
///
/// Assigned by the screen when the component is added: 1, 2, 3, ...
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComponentId(u16);

impl ComponentId {
    /// Id of a component that was never added to a screen.
    pub const UNASSIGNED: ComponentId = ComponentId(0);

    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

/// Foreground/background colours used by the screen itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme<C> {
    pub foreground: C,
    pub background: C,
}

impl Theme<BinaryColor> {
    pub const MONOCHROME: Self = Self {
        foreground: BinaryColor::On,
        background: BinaryColor::Off,
    };
}

/// Position and redraw flags shared by every component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentState {
    id: ComponentId,
    bounds: Rectangle,
    visible: bool,
    focused: bool,
    dirty: bool,
}

impl ComponentState {
    /// New components are visible, unfocused and need a first draw.
    pub const fn new(bounds: Rectangle) -> Self {
        Self {
            id: ComponentId::UNASSIGNED,
            bounds,
            visible: true,
            focused: false,
            dirty: true,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Update focus; marks dirty only on change.
    pub fn set_focus(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.dirty = true;
        }
    }

    /// Update visibility; marks dirty only on change.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty = true;
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(crate) fn assign_id(&mut self, id: ComponentId) {
        self.id = id;
    }
}

/// Capability every focusable widget implements.
pub trait Component<D: DrawTarget> {
    fn state(&self) -> &ComponentState;

    fn state_mut(&mut self) -> &mut ComponentState;

    /// Render the current state into `target`.
    ///
    /// Called with the dirty flag already cleared; a component that
    /// animates (blinking cursor) may mark itself dirty again.
    fn draw(&mut self, target: &mut D);

    /// Encoder turned while this component had focus. `steps` > 0.
    fn handle_rotation(&mut self, _direction: Direction, _steps: u32) {}

    /// A routed button press while this component had focus.
    fn handle_activation(&mut self, _button: Button, _kind: PressKind) {}
}
