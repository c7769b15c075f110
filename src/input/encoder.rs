//! Rotary encoder quadrature decoding.
//!
//! `on_edge` runs in the edge handler of the phase-A line (and, with
//! [`DecodeStrategy::FullQuadrature`], of the phase-B line too). It only
//! ever adds to the pending step count. The poll loop takes the count
//! with `drain_steps`, which reads and clears it inside the same critical
//! section so no edge can slip between the read and the reset.
//!
//! With the default half-resolution strategy:
//! ```text
//! A changed, A != B afterwards  -> +1 (clockwise)
//! A changed, A == B afterwards  -> -1 (counter-clockwise)
//! A unchanged                   ->  0
//! ```
//! Edges closer than the minimum interval to the last accepted edge are
//! dropped outright, not coalesced.

use core::cell::Cell;

use critical_section::Mutex;

use crate::config::{DecodeStrategy, InputConfig};
use crate::hal::{InputHardware, Line};

// Quadrature transition table for previous_state/current_state (AB).
// Index: (prev << 2) | curr, values are +1/-1 for valid transitions.
const QUADRATURE_TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

const A_BIT: u8 = 0b10;

#[derive(Clone, Copy)]
struct EncoderState {
    /// Last accepted line levels, `(a << 1) | b`.
    last_ab: u8,
    last_edge_ms: Option<u64>,
    pending: i32,
    rejected_edges: u32,
}

/// Turns phase-line edges into a signed step count.
pub struct QuadratureDecoder<'a, H> {
    hw: &'a H,
    strategy: DecodeStrategy,
    min_edge_interval_ms: u64,
    state: Mutex<Cell<EncoderState>>,
}

impl<'a, H: InputHardware> QuadratureDecoder<'a, H> {
    /// Create a decoder reading its lines through `hw`.
    ///
    /// The current line levels become the reference for the first edge.
    pub fn new(hw: &'a H, config: &InputConfig) -> Self {
        let last_ab = ab_from_levels(hw.is_high(Line::PhaseA), hw.is_high(Line::PhaseB));
        Self {
            hw,
            strategy: config.decode_strategy(),
            min_edge_interval_ms: config.encoder_min_edge_interval_ms(),
            state: Mutex::new(Cell::new(EncoderState {
                last_ab,
                last_edge_ms: None,
                pending: 0,
                rejected_edges: 0,
            })),
        }
    }

    /// Edge handler entry point. Never blocks, never allocates.
    pub fn on_edge(&self) {
        let now = self.hw.now_ms();

        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();

            if let Some(last) = state.last_edge_ms {
                if now.saturating_sub(last) < self.min_edge_interval_ms {
                    state.rejected_edges = state.rejected_edges.wrapping_add(1);
                    cell.set(state);
                    return;
                }
            }
            state.last_edge_ms = Some(now);

            let a = self.hw.is_high(Line::PhaseA);
            let b = self.hw.is_high(Line::PhaseB);
            let current = ab_from_levels(a, b);

            let delta = match self.strategy {
                DecodeStrategy::HalfResolution => {
                    let last_a = state.last_ab & A_BIT != 0;
                    match (a != last_a, a != b) {
                        (false, _) => 0,
                        (true, true) => 1,
                        (true, false) => -1,
                    }
                }
                DecodeStrategy::FullQuadrature => {
                    i32::from(QUADRATURE_TRANSITIONS[usize::from((state.last_ab << 2) | current)])
                }
            };

            state.pending = state.pending.saturating_add(delta);
            state.last_ab = current;
            cell.set(state);
        });
    }

    /// Take the net step count accumulated since the last drain.
    ///
    /// Positive is clockwise. Poll context only.
    pub fn drain_steps(&self) -> i32 {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let mut state = cell.get();
            let steps = state.pending;
            state.pending = 0;
            cell.set(state);
            steps
        })
    }

    /// Edges dropped by the minimum-interval filter since start-up.
    pub fn rejected_edges(&self) -> u32 {
        critical_section::with(|cs| self.state.borrow(cs).get().rejected_edges)
    }

    pub fn strategy(&self) -> DecodeStrategy {
        self.strategy
    }
}

fn ab_from_levels(a: bool, b: bool) -> u8 {
    (u8::from(a) << 1) | u8::from(b)
}
