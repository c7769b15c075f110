//! dialcore firmware - nRF52840 + rotary encoder + SSD1306 OLED.
//!
//! One task per input line waits for GPIOTE edges, latches the level into
//! the shared board and feeds the decoder or the debouncer. The main task
//! runs the UI tick: poll, dispatch, redraw, flush.
//!
//! # Wiring (nRF52840-DK)
//!
//! | Signal         | Pin   | Notes                       |
//! |----------------|-------|-----------------------------|
//! | Encoder A      | P0.03 | Pull-up                     |
//! | Encoder B      | P0.04 | Pull-up                     |
//! | Encoder button | P0.28 | Active-low, pull-up enabled |
//! | User button    | P0.11 | Active-low, pull-up enabled |
//! | Power button   | P0.12 | Active-low, pull-up enabled |
//! | I2C SDA        | P0.26 | OLED                        |
//! | I2C SCL        | P0.27 | OLED                        |

#![no_std]
#![no_main]

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{AnyPin, Input, Pin as _, Pull};
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Duration, Instant, Ticker, Timer};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::digital::PinState;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use dialcore::config::{DecodeStrategy, InputConfig, BUTTON_DEBOUNCE_MS, UI_TICK_MS};
use dialcore::{
    Button, ButtonDebouncer, Clock, Component, ComponentState, Direction, FocusShell, LatchedBoard,
    Line, PressKind, QuadratureDecoder, Theme,
};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

type Display =
    Ssd1306<I2CInterface<Twim<'static, TWISPI0>>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Milliseconds since boot from the embassy time driver.
struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

type Board = LatchedBoard<EmbassyClock>;
type Decoder = QuadratureDecoder<'static, Board>;
type Buttons = ButtonDebouncer<'static, Board>;

const CONFIG: InputConfig = InputConfig::new();

static BOARD: StaticCell<Board> = StaticCell::new();
static DECODER: StaticCell<Decoder> = StaticCell::new();
static BUTTONS: StaticCell<Buttons> = StaticCell::new();

// ═══════════════════════════════════════════════════════════════════════════
// Edge tasks
// ═══════════════════════════════════════════════════════════════════════════

/// Latch every edge of an encoder phase line and decode it.
///
/// In half-resolution mode phase B only latches; the decoder reads it back
/// on the next phase-A edge.
#[embassy_executor::task(pool_size = 2)]
async fn phase_task(pin: AnyPin, line: Line, board: &'static Board, decoder: &'static Decoder) -> ! {
    let mut input = Input::new(pin, Pull::Up);
    let decodes = line == Line::PhaseA || decoder.strategy() == DecodeStrategy::FullQuadrature;

    loop {
        input.wait_for_any_edge().await;
        if board.sample(line, &mut input).is_ok() && decodes {
            decoder.on_edge();
        }
    }
}

/// Settle a push-button after each edge and forward level changes.
///
/// Bounce inside the settle window collapses into one sample, so the
/// debouncer only ever sees alternating press and release edges.
#[embassy_executor::task(pool_size = 3)]
async fn button_task(pin: AnyPin, button: Button, board: &'static Board, buttons: &'static Buttons) -> ! {
    let mut input = Input::new(pin, Pull::Up);
    let mut forwarded = PinState::High;

    loop {
        input.wait_for_any_edge().await;
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        match board.sample(button.into(), &mut input) {
            Ok(level) if level != forwarded => {
                forwarded = level;
                buttons.on_edge(button, level);
            }
            _ => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Demo component
// ═══════════════════════════════════════════════════════════════════════════

/// Labelled 0-100 bar. Rotation adjusts, a long encoder press resets.
struct Gauge {
    state: ComponentState,
    label: &'static str,
    value: u8,
}

impl Gauge {
    fn new(label: &'static str, y: i32) -> Self {
        Self {
            state: ComponentState::new(Rectangle::new(Point::new(0, y), Size::new(128, 14))),
            label,
            value: 50,
        }
    }
}

impl<D: DrawTarget<Color = BinaryColor>> Component<D> for Gauge {
    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }

    fn draw(&mut self, target: &mut D) {
        let bounds = self.state.bounds();
        let _ = target.fill_solid(&bounds, BinaryColor::Off);

        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let text_at = bounds.top_left + Point::new(2, 2);
        let _ = Text::with_baseline(self.label, text_at, style, Baseline::Top).draw(target);

        // Bar area: right half of the row.
        let bar_width = u32::from(self.value) * 60 / 100;
        let bar = Rectangle::new(bounds.top_left + Point::new(64, 3), Size::new(bar_width, 8));
        let _ = bar.into_styled(PrimitiveStyle::with_fill(BinaryColor::On)).draw(target);

        if self.state.is_focused() {
            let _ = bounds
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                .draw(target);
        }
    }

    fn handle_rotation(&mut self, direction: Direction, steps: u32) {
        let steps = u8::try_from(steps).unwrap_or(u8::MAX);
        self.value = match direction {
            Direction::Clockwise => self.value.saturating_add(steps).min(100),
            Direction::CounterClockwise => self.value.saturating_sub(steps),
        };
        self.state.mark_dirty();
    }

    fn handle_activation(&mut self, button: Button, kind: PressKind) {
        if button == Button::Encoder && kind == PressKind::Long {
            info!("{}: reset", self.label);
            self.value = 0;
            self.state.mark_dirty();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("dialcore starting");

    let board: &'static Board = BOARD.init(LatchedBoard::new(EmbassyClock));
    let decoder: &'static Decoder = DECODER.init(QuadratureDecoder::new(board, &CONFIG));
    let buttons: &'static Buttons = BUTTONS.init(ButtonDebouncer::new(board, &CONFIG));

    unwrap!(spawner.spawn(phase_task(p.P0_03.degrade(), Line::PhaseA, board, decoder)));
    unwrap!(spawner.spawn(phase_task(p.P0_04.degrade(), Line::PhaseB, board, decoder)));
    unwrap!(spawner.spawn(button_task(p.P0_28.degrade(), Button::Encoder, board, buttons)));
    unwrap!(spawner.spawn(button_task(p.P0_11.degrade(), Button::User, board, buttons)));
    unwrap!(spawner.spawn(button_task(p.P0_12.degrade(), Button::Power, board, buttons)));

    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let interface = I2CDisplayInterface::new(i2c);
    let mut display: Display =
        Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0).into_buffered_graphics_mode();
    if display.init().is_err() {
        warn!("OLED init failed");
    }

    let mut volume = Gauge::new("Volume", 18);
    let mut bass = Gauge::new("Bass", 34);
    let mut treble = Gauge::new("Treble", 50);

    let mut shell: FocusShell<'static, '_, Board, Display> =
        FocusShell::new(decoder, buttons, Theme::MONOCHROME, &CONFIG);
    shell.set_title("dialcore");
    for gauge in [&mut volume, &mut bass, &mut treble] {
        if let Err(e) = shell.add_component(gauge) {
            warn!("Screen: {}", e);
        }
    }

    shell.draw(&mut display, true);
    let _ = display.flush();
    info!("UI ready, tick every {} ms", UI_TICK_MS);

    let mut ticker = Ticker::every(Duration::from_millis(UI_TICK_MS));
    loop {
        if shell.tick(&mut display) {
            let _ = display.flush();
        }
        ticker.next().await;
    }
}
