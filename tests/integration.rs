//! Integration tests for dialcore host-testable logic.
//!
//! Simulated edges go in through a `LatchedBoard`, a `FocusShell` ticks
//! and renders into a `MockDisplay`.

use dialcore::config::MAX_COMPONENTS;
use dialcore::{
    Button, ButtonDebouncer, Component, ComponentState, Direction, FocusShell, InputConfig,
    InputHardware, LatchedBoard, Line, ManualClock, PressKind, QuadratureDecoder, Theme,
};
use embedded_graphics::mock_display::MockDisplay;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Primitive, PrimitiveStyle, Rectangle};
use embedded_hal::digital::PinState;

type Board = LatchedBoard<ManualClock>;
type Display = MockDisplay<BinaryColor>;

struct Knob {
    state: ComponentState,
    value: i32,
    presses: Vec<(Button, PressKind)>,
}

impl Knob {
    fn at(x: i32) -> Self {
        Self {
            state: ComponentState::new(Rectangle::new(Point::new(x, 24), Size::new(12, 12))),
            value: 0,
            presses: Vec::new(),
        }
    }
}

impl<D: DrawTarget<Color = BinaryColor>> Component<D> for Knob {
    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }

    fn draw(&mut self, target: &mut D) {
        let style = if self.state.is_focused() {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            PrimitiveStyle::with_stroke(BinaryColor::On, 1)
        };
        let _ = self.state.bounds().into_styled(style).draw(target);
    }

    fn handle_rotation(&mut self, direction: Direction, steps: u32) {
        let steps = i32::try_from(steps).unwrap();
        self.value += match direction {
            Direction::Clockwise => steps,
            Direction::CounterClockwise => -steps,
        };
        self.state.mark_dirty();
    }

    fn handle_activation(&mut self, button: Button, kind: PressKind) {
        self.presses.push((button, kind));
        self.state.mark_dirty();
    }
}

fn display() -> Display {
    let mut display = Display::new();
    display.set_allow_overdraw(true);
    display
}

/// Turn the encoder by `detents` half-resolution steps (negative = ccw).
fn turn(board: &Board, decoder: &QuadratureDecoder<'_, Board>, detents: i32) {
    for _ in 0..detents.unsigned_abs() {
        let a = !board.is_high(Line::PhaseA);
        let b = if detents > 0 { !a } else { a };
        board.latch(Line::PhaseA, PinState::from(a));
        board.latch(Line::PhaseB, PinState::from(b));
        decoder.on_edge();
        board.clock().advance(5);
    }
}

/// Press and release `button`, holding it for `hold_ms`.
fn press(board: &Board, buttons: &ButtonDebouncer<'_, Board>, button: Button, hold_ms: u64) {
    board.latch(button.into(), PinState::Low);
    buttons.on_edge(button, PinState::Low);
    board.clock().advance(hold_ms);
    board.latch(button.into(), PinState::High);
    buttons.on_edge(button, PinState::High);
    board.clock().advance(100);
}

#[test]
fn rotation_reaches_focused_component() {
    let board = LatchedBoard::new(ManualClock::new(0));
    let config = InputConfig::default();
    let decoder = QuadratureDecoder::new(&board, &config);
    let buttons: ButtonDebouncer<'_, Board> = ButtonDebouncer::new(&board, &config);
    let (mut first, mut second) = (Knob::at(4), Knob::at(30));

    {
        let mut shell: FocusShell<'_, '_, Board, Display> =
            FocusShell::new(&decoder, &buttons, Theme::MONOCHROME, &config);
        shell.add_component(&mut first).unwrap();
        shell.add_component(&mut second).unwrap();

        let mut display = display();
        shell.draw(&mut display, true);

        turn(&board, &decoder, 3);
        assert!(shell.tick(&mut display));
        turn(&board, &decoder, -1);
        assert!(shell.tick(&mut display));
    }

    assert_eq!(first.value, 2);
    assert_eq!(second.value, 0);
}

#[test]
fn user_press_cycles_focus() {
    let board = LatchedBoard::new(ManualClock::new(0));
    let config = InputConfig::default();
    let decoder = QuadratureDecoder::new(&board, &config);
    let buttons: ButtonDebouncer<'_, Board> = ButtonDebouncer::new(&board, &config);
    let (mut first, mut second, mut third) = (Knob::at(0), Knob::at(20), Knob::at(40));

    {
        let mut shell: FocusShell<'_, '_, Board, Display> =
            FocusShell::new(&decoder, &buttons, Theme::MONOCHROME, &config);
        let id_first = shell.add_component(&mut first).unwrap();
        let id_second = shell.add_component(&mut second).unwrap();
        let id_third = shell.add_component(&mut third).unwrap();
        let mut display = display();

        press(&board, &buttons, Button::User, 150);
        shell.tick(&mut display);
        assert_eq!(shell.screen().focused(), Some(id_second));

        turn(&board, &decoder, 4);
        shell.tick(&mut display);

        press(&board, &buttons, Button::User, 150);
        shell.tick(&mut display);
        assert_eq!(shell.screen().focused(), Some(id_third));

        press(&board, &buttons, Button::User, 150);
        shell.tick(&mut display);
        assert_eq!(shell.screen().focused(), Some(id_first));
    }

    assert_eq!((first.value, second.value, third.value), (0, 4, 0));
}

#[test]
fn encoder_presses_activate_focused_component() {
    let board = LatchedBoard::new(ManualClock::new(0));
    let config = InputConfig::default();
    let decoder = QuadratureDecoder::new(&board, &config);
    let buttons: ButtonDebouncer<'_, Board> = ButtonDebouncer::new(&board, &config);
    let (mut first, mut second) = (Knob::at(4), Knob::at(30));

    {
        let mut shell: FocusShell<'_, '_, Board, Display> =
            FocusShell::new(&decoder, &buttons, Theme::MONOCHROME, &config);
        shell.add_component(&mut first).unwrap();
        shell.add_component(&mut second).unwrap();
        let mut display = display();

        press(&board, &buttons, Button::Encoder, 200);
        shell.tick(&mut display);
        press(&board, &buttons, Button::Encoder, 2500);
        shell.tick(&mut display);
        // POWER has no default binding.
        press(&board, &buttons, Button::Power, 200);
        shell.tick(&mut display);
    }

    assert_eq!(
        first.presses,
        [(Button::Encoder, PressKind::Short), (Button::Encoder, PressKind::Long)]
    );
    assert!(second.presses.is_empty());
}

#[test]
fn focus_binding_is_configurable() {
    let board = LatchedBoard::new(ManualClock::new(0));
    let config = InputConfig::new().with_focus_binding(Button::Power, PressKind::Long);
    let decoder = QuadratureDecoder::new(&board, &config);
    let buttons: ButtonDebouncer<'_, Board> = ButtonDebouncer::new(&board, &config);
    let (mut first, mut second) = (Knob::at(4), Knob::at(30));

    let mut shell: FocusShell<'_, '_, Board, Display> =
        FocusShell::new(&decoder, &buttons, Theme::MONOCHROME, &config);
    let id_first = shell.add_component(&mut first).unwrap();
    let id_second = shell.add_component(&mut second).unwrap();
    let mut display = display();

    press(&board, &buttons, Button::User, 150);
    shell.tick(&mut display);
    assert_eq!(shell.screen().focused(), Some(id_first));

    press(&board, &buttons, Button::Power, 2100);
    shell.tick(&mut display);
    assert_eq!(shell.screen().focused(), Some(id_second));
}

#[test]
fn idle_tick_skips_redraw() {
    let board = LatchedBoard::new(ManualClock::new(0));
    let config = InputConfig::default();
    let decoder = QuadratureDecoder::new(&board, &config);
    let buttons: ButtonDebouncer<'_, Board> = ButtonDebouncer::new(&board, &config);
    let mut knob = Knob::at(10);

    let mut shell: FocusShell<'_, '_, Board, Display> =
        FocusShell::new(&decoder, &buttons, Theme::MONOCHROME, &config);
    shell.add_component(&mut knob).unwrap();
    let mut display = display();

    // First tick draws the freshly added component.
    assert!(shell.tick(&mut display));
    assert_eq!(display.get_pixel(Point::new(10, 24)), Some(BinaryColor::On));
    assert!(!shell.tick(&mut display));

    // A wobble that nets out changes nothing.
    turn(&board, &decoder, 1);
    turn(&board, &decoder, -1);
    assert!(!shell.tick(&mut display));
}

#[test]
fn router_bindings_can_be_replaced() {
    let board = LatchedBoard::new(ManualClock::new(0));
    let config = InputConfig::default();
    let decoder = QuadratureDecoder::new(&board, &config);
    let buttons: ButtonDebouncer<'_, Board> = ButtonDebouncer::new(&board, &config);
    let mut knob = Knob::at(10);

    let mut shell: FocusShell<'_, '_, Board, Display> =
        FocusShell::new(&decoder, &buttons, Theme::MONOCHROME, &config);
    shell.add_component(&mut knob).unwrap();
    shell
        .router_mut()
        .register_press("power", "short", |screen| screen.set_title("Standby"))
        .unwrap();
    assert!(shell.router_mut().register_rotation("left", |_, _| {}).is_err());

    let mut display = display();
    press(&board, &buttons, Button::Power, 100);
    shell.tick(&mut display);
    assert_eq!(shell.screen().title(), "Standby");
}

#[test]
fn screen_capacity_is_bounded() {
    let board = LatchedBoard::new(ManualClock::new(0));
    let config = InputConfig::default();
    let decoder = QuadratureDecoder::new(&board, &config);
    let buttons: ButtonDebouncer<'_, Board> = ButtonDebouncer::new(&board, &config);
    let mut knobs: Vec<Knob> = (0..=MAX_COMPONENTS).map(|i| Knob::at(i32::try_from(i).unwrap())).collect();

    let mut shell: FocusShell<'_, '_, Board, Display> =
        FocusShell::new(&decoder, &buttons, Theme::MONOCHROME, &config);
    let mut results = knobs.iter_mut().map(|knob| shell.add_component(knob));
    assert!(results.by_ref().take(MAX_COMPONENTS).all(|r| r.is_ok()));
    assert_eq!(results.next(), Some(Err(dialcore::Error::ComponentsFull)));
}
