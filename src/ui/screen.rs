//! Screen: component list, focus tracking and conditional redraw.
//!
//! Focus state machine:
//! ```text
//! Unfocused (no components) --add_component--> Focused(first)
//! Focused(a) --set_focus(b) / cycle_focus--> Focused(b)
//! ```
//! Components are never removed, so ids stay dense (1..=max).

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::{String, Vec};

use crate::config::{InputConfig, BUTTON_LOG_CAPACITY, MAX_COMPONENTS, TITLE_CAPACITY, TITLE_Y_OFFSET};
use crate::error::Error;
use crate::hal::InputHardware;
use crate::input::{Button, ButtonDebouncer, Direction, EventRouter, PressKind, QuadratureDecoder};
use crate::ui::input_logic::next_focus_id;
use crate::ui::{Component, ComponentId, Theme};

/// Ordered components with exactly one of them focused.
pub struct Screen<'c, D: DrawTarget> {
    components: Vec<&'c mut dyn Component<D>, MAX_COMPONENTS>,
    focused: Option<ComponentId>,
    next_id: u16,
    title: String<TITLE_CAPACITY>,
    theme: Theme<D::Color>,
}

impl<'c, D: DrawTarget> Screen<'c, D> {
    pub fn new(theme: Theme<D::Color>) -> Self {
        Self {
            components: Vec::new(),
            focused: None,
            next_id: 1,
            title: String::new(),
            theme,
        }
    }

    /// Set the title drawn centered at the top. Truncated to fit.
    pub fn set_title(&mut self, title: &str) {
        self.title.clear();
        for c in title.chars() {
            if self.title.push(c).is_err() {
                break;
            }
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Add `component`, assign its id and focus it if nothing is focused.
    ///
    /// # Errors
    ///
    /// [`Error::ComponentsFull`] when the screen already holds
    /// `MAX_COMPONENTS` components; `component` is not added.
    pub fn add_component(&mut self, component: &'c mut dyn Component<D>) -> Result<ComponentId, Error> {
        if self.components.is_full() {
            return Err(Error::ComponentsFull);
        }

        let id = ComponentId::new(self.next_id);
        self.next_id += 1;
        component.state_mut().assign_id(id);
        // Cannot fail: capacity checked above.
        let _ = self.components.push(component);

        if self.focused.is_none() {
            self.set_focus(id)?;
        }
        Ok(id)
    }

    /// Move focus to `id`, marking the old and the new component dirty.
    ///
    /// # Errors
    ///
    /// [`Error::FocusLookupMiss`] if no component has `id`; focus is unchanged.
    pub fn set_focus(&mut self, id: ComponentId) -> Result<(), Error> {
        if self.find(id).is_none() {
            return Err(Error::FocusLookupMiss);
        }

        if let Some(current) = self.focused {
            if let Some(previous) = self.find_mut(current) {
                let state = previous.state_mut();
                state.set_focus(false);
                state.mark_dirty();
            }
        }
        if let Some(next) = self.find_mut(id) {
            let state = next.state_mut();
            state.set_focus(true);
            state.mark_dirty();
        }
        self.focused = Some(id);

        #[cfg(feature = "defmt")]
        defmt::info!("Screen: focus -> {}", id);
        Ok(())
    }

    /// Advance focus to the next id, wrapping after the highest one.
    ///
    /// # Errors
    ///
    /// [`Error::FocusLookupMiss`] if the screen is empty or no component
    /// carries the computed id. Focus is unchanged.
    pub fn cycle_focus(&mut self) -> Result<ComponentId, Error> {
        let max_id = self
            .components
            .iter()
            .map(|c| c.state().id().get())
            .max()
            .ok_or(Error::FocusLookupMiss)?;
        let current = self.focused.map_or(0, ComponentId::get);
        let next = ComponentId::new(next_focus_id(current, max_id));

        if Some(next) != self.focused {
            self.set_focus(next)?;
        }
        Ok(next)
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focused
    }

    pub fn component(&self, id: ComponentId) -> Option<&dyn Component<D>> {
        self.find(id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut (dyn Component<D> + 'c)> {
        self.find_mut(id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// True if any component has its dirty flag set.
    pub fn needs_redraw(&self) -> bool {
        self.components.iter().any(|c| c.state().is_dirty())
    }

    /// Forward rotation to the focused component only.
    pub fn handle_rotation(&mut self, direction: Direction, steps: u32) {
        if let Some(focused) = self.focused_mut() {
            focused.handle_rotation(direction, steps);
        }
    }

    /// Forward a button press to the focused component only.
    pub fn handle_activation(&mut self, button: Button, kind: PressKind) {
        if let Some(focused) = self.focused_mut() {
            focused.handle_activation(button, kind);
        }
    }

    /// Render the screen.
    ///
    /// With `force_clear` the whole target is cleared first. Components are
    /// drawn only when dirty or focused; a dirty hidden component has its
    /// area filled with the background instead.
    pub fn draw(&mut self, target: &mut D, force_clear: bool) {
        if force_clear && target.clear(self.theme.background).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Screen: clear failed");
        }

        if !self.title.is_empty() {
            let style = title_style(&self.theme);
            let width = i32::try_from(target.bounding_box().size.width).unwrap_or(i32::MAX);
            let x = (width - text_width(self.title.as_str())) / 2;
            let position = Point::new(x, TITLE_Y_OFFSET);
            if Text::with_baseline(self.title.as_str(), position, style, Baseline::Top)
                .draw(target)
                .is_err()
            {
                #[cfg(feature = "defmt")]
                defmt::warn!("Screen: title draw failed");
            }
        }

        let background = self.theme.background;
        for component in self.components.iter_mut() {
            let state = component.state();
            if !(state.is_dirty() || state.is_focused()) {
                continue;
            }

            if state.is_visible() {
                component.state_mut().mark_clean();
                component.draw(target);
            } else {
                let bounds = state.bounds();
                component.state_mut().mark_clean();
                let _ = target.fill_solid(&bounds, background);
            }
        }
    }

    fn find(&self, id: ComponentId) -> Option<&dyn Component<D>> {
        self.components
            .iter()
            .find(|c| c.state().id() == id)
            .map(|c| &**c as &dyn Component<D>)
    }

    fn find_mut(&mut self, id: ComponentId) -> Option<&mut (dyn Component<D> + 'c)> {
        self.components
            .iter_mut()
            .find(|c| c.state().id() == id)
            .map(|c| &mut **c)
    }

    fn focused_mut(&mut self) -> Option<&mut (dyn Component<D> + 'c)> {
        let id = self.focused?;
        self.find_mut(id)
    }
}

fn title_style<C: PixelColor>(theme: &Theme<C>) -> MonoTextStyle<'static, C> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(theme.foreground)
        .background_color(theme.background)
        .build()
}

fn text_width(text: &str) -> i32 {
    let advance = FONT_6X10.character_size.width + FONT_6X10.character_spacing;
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    i32::try_from(chars.saturating_mul(advance)).unwrap_or(i32::MAX)
}

/// A [`Screen`] driven by an [`EventRouter`].
///
/// Default bindings:
///   - rotation (either way)   -> focused component
///   - ENCODER short / long     -> focused component
///   - advance-focus binding    -> [`Screen::cycle_focus`] (USER short by default)
///
/// Bindings can be changed through [`router_mut`](Self::router_mut); the
/// callback context is the screen.
pub struct FocusShell<'a, 'c, H, D: DrawTarget, const N: usize = BUTTON_LOG_CAPACITY> {
    router: EventRouter<'a, H, Screen<'c, D>, N>,
    screen: Screen<'c, D>,
}

impl<'a, 'c, H: InputHardware, D: DrawTarget, const N: usize> FocusShell<'a, 'c, H, D, N> {
    pub fn new(
        encoder: &'a QuadratureDecoder<'a, H>,
        buttons: &'a ButtonDebouncer<'a, H, N>,
        theme: Theme<D::Color>,
        config: &InputConfig,
    ) -> Self {
        let mut router: EventRouter<'a, H, Screen<'c, D>, N> = EventRouter::new(encoder, buttons);

        router.on_rotation(Direction::Clockwise, |screen, steps| {
            screen.handle_rotation(Direction::Clockwise, steps);
        });
        router.on_rotation(Direction::CounterClockwise, |screen, steps| {
            screen.handle_rotation(Direction::CounterClockwise, steps);
        });
        router.on_press(Button::Encoder, PressKind::Short, |screen| {
            screen.handle_activation(Button::Encoder, PressKind::Short);
        });
        router.on_press(Button::Encoder, PressKind::Long, |screen| {
            screen.handle_activation(Button::Encoder, PressKind::Long);
        });

        let (button, kind) = config.focus_binding();
        router.on_press(button, kind, |screen| {
            if let Err(_e) = screen.cycle_focus() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Screen: focus cycle failed: {}", _e);
            }
        });

        Self {
            router,
            screen: Screen::new(theme),
        }
    }

    /// One UI tick: poll input, then redraw if anything became dirty.
    ///
    /// Returns `true` if the screen was drawn.
    pub fn tick(&mut self, target: &mut D) -> bool {
        self.router.poll(&mut self.screen);
        if self.screen.needs_redraw() {
            self.screen.draw(target, false);
            true
        } else {
            false
        }
    }

    pub fn draw(&mut self, target: &mut D, force_clear: bool) {
        self.screen.draw(target, force_clear);
    }

    /// See [`Screen::add_component`].
    ///
    /// # Errors
    ///
    /// [`Error::ComponentsFull`] when the screen is at capacity.
    pub fn add_component(&mut self, component: &'c mut dyn Component<D>) -> Result<ComponentId, Error> {
        self.screen.add_component(component)
    }

    /// See [`Screen::set_focus`].
    ///
    /// # Errors
    ///
    /// [`Error::FocusLookupMiss`] if no component has `id`.
    pub fn set_focus(&mut self, id: ComponentId) -> Result<(), Error> {
        self.screen.set_focus(id)
    }

    /// See [`Screen::cycle_focus`].
    ///
    /// # Errors
    ///
    /// [`Error::FocusLookupMiss`] if the next id has no component.
    pub fn cycle_focus(&mut self) -> Result<ComponentId, Error> {
        self.screen.cycle_focus()
    }

    pub fn set_title(&mut self, title: &str) {
        self.screen.set_title(title);
    }

    pub fn screen(&self) -> &Screen<'c, D> {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen<'c, D> {
        &mut self.screen
    }

    pub fn router_mut(&mut self) -> &mut EventRouter<'a, H, Screen<'c, D>, N> {
        &mut self.router
    }
}
