//! Push-button press recording and short/long classification.
//!
//! Three buttons (active-low with pull-up):
//!   - ENCODER - push switch of the rotary encoder
//!   - USER    - general purpose
//!   - POWER   - power / back
//!
//! Every edge handler calls [`ButtonDebouncer::on_edge`] with the level it
//! saw. A falling edge records a press start, a rising edge turns the
//! newest open start of the same button into a finished press. The poll
//! loop drains finished presses and classifies them by hold time.
//!
//! The raw log is newest-first and holds `N` records. When full, the
//! oldest record is evicted; a later release of an evicted press finds no
//! start and is dropped. At most `N` presses can be in flight.
//!
//! Every edge handed in is recorded; settling contact bounce is the edge
//! handler's job (the firmware waits `BUTTON_DEBOUNCE_MS` and forwards
//! only level changes).

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::digital::PinState;
use heapless::Vec;

use crate::config::{InputConfig, BUTTON_LOG_CAPACITY};
use crate::hal::InputHardware;
use crate::input::{Button, PressEvent, PressKind};

/// Classified presses returned by one drain, newest first.
pub type PressBatch<const N: usize> = Vec<PressEvent, N>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RawEntry {
    PressStart { button: Button, at_ms: u64 },
    PressEnd { button: Button, duration_ms: u64 },
}

/// Anomaly counters, readable from the poll loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebouncerStats {
    /// Records pushed out of a full log.
    pub evicted: u32,
    /// Releases that found no open press start.
    pub unmatched_releases: u32,
}

enum EdgeOutcome {
    Recorded,
    Evicted(RawEntry),
    Unmatched,
}

struct PressLog<const N: usize> {
    entries: Vec<RawEntry, N>,
    stats: DebouncerStats,
}

impl<const N: usize> PressLog<N> {
    const fn new() -> Self {
        Self {
            entries: Vec::new(),
            stats: DebouncerStats {
                evicted: 0,
                unmatched_releases: 0,
            },
        }
    }

    /// Insert as newest, evicting the oldest record when full.
    fn record(&mut self, entry: RawEntry) -> EdgeOutcome {
        let evicted = if self.entries.is_full() {
            self.stats.evicted = self.stats.evicted.wrapping_add(1);
            self.entries.pop()
        } else {
            None
        };
        // Cannot fail: a slot was freed above if the log was full.
        let _ = self.entries.insert(0, entry);
        match evicted {
            Some(old) => EdgeOutcome::Evicted(old),
            None => EdgeOutcome::Recorded,
        }
    }

    fn open_start(&self, button: Button) -> Option<(usize, u64)> {
        self.entries.iter().enumerate().find_map(|(i, entry)| match *entry {
            RawEntry::PressStart { button: b, at_ms } if b == button => Some((i, at_ms)),
            _ => None,
        })
    }
}

/// Records raw button edges and classifies completed presses.
pub struct ButtonDebouncer<'a, H, const N: usize = BUTTON_LOG_CAPACITY> {
    hw: &'a H,
    long_press_ms: u64,
    log: Mutex<RefCell<PressLog<N>>>,
}

impl<'a, H: InputHardware, const N: usize> ButtonDebouncer<'a, H, N> {
    pub fn new(hw: &'a H, config: &InputConfig) -> Self {
        Self {
            hw,
            long_press_ms: config.long_press_ms(),
            log: Mutex::new(RefCell::new(PressLog::new())),
        }
    }

    /// Edge handler entry point for `button`. `level` is the line level
    /// after the edge: `Low` = pressed, `High` = released.
    pub fn on_edge(&self, button: Button, level: PinState) {
        let now = self.hw.now_ms();

        let outcome = critical_section::with(|cs| {
            let mut log = self.log.borrow_ref_mut(cs);

            match level {
                PinState::Low => log.record(RawEntry::PressStart { button, at_ms: now }),
                PinState::High => match log.open_start(button) {
                    Some((index, at_ms)) => {
                        log.entries.remove(index);
                        log.record(RawEntry::PressEnd {
                            button,
                            duration_ms: now.saturating_sub(at_ms),
                        })
                    }
                    None => {
                        log.stats.unmatched_releases = log.stats.unmatched_releases.wrapping_add(1);
                        EdgeOutcome::Unmatched
                    }
                },
            }
        });

        match outcome {
            EdgeOutcome::Recorded => {}
            EdgeOutcome::Evicted(_old) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Buttons: log full, evicted {:?}", defmt::Debug2Format(&_old));
            }
            EdgeOutcome::Unmatched => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Buttons: {}: {}", button, crate::error::Error::UnmatchedRelease);
            }
        }
    }

    /// Classify and remove every finished press; open presses stay.
    ///
    /// Events come out in log order, most recent first. Poll context only.
    pub fn drain_events(&self) -> PressBatch<N> {
        critical_section::with(|cs| {
            let mut log = self.log.borrow_ref_mut(cs);
            let mut events: PressBatch<N> = Vec::new();

            for entry in &log.entries {
                if let RawEntry::PressEnd { button, duration_ms } = *entry {
                    // Cannot overflow: the batch has the log's capacity.
                    let _ = events.push(PressEvent {
                        kind: PressKind::classify(duration_ms, self.long_press_ms),
                        button,
                        duration_ms,
                    });
                }
            }
            log.entries
                .retain(|entry| matches!(entry, RawEntry::PressStart { .. }));

            events
        })
    }

    /// Number of presses started but not yet released.
    pub fn in_flight(&self) -> usize {
        critical_section::with(|cs| {
            self.log
                .borrow_ref(cs)
                .entries
                .iter()
                .filter(|entry| matches!(entry, RawEntry::PressStart { .. }))
                .count()
        })
    }

    pub fn stats(&self) -> DebouncerStats {
        critical_section::with(|cs| self.log.borrow_ref(cs).stats)
    }

    pub fn long_press_ms(&self) -> u64 {
        self.long_press_ms
    }
}
