//! Unified error type for dialcore.
//!
//! We avoid `alloc` - all error variants are fieldless.
//! Implements `defmt::Format` (with the `defmt` feature) for on-target logging.

use core::fmt;

/// Top-level error type used across the crate.
///
/// Only [`Error::InvalidKey`] and [`Error::ComponentsFull`] ever reach a
/// caller during normal operation; the other variants describe anomalies
/// that the poll loop absorbs and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Router
    /// A callback key named a direction, button or press kind that does
    /// not exist.
    InvalidKey,

    // Buttons
    /// A release arrived whose press record was no longer in the log.
    UnmatchedRelease,

    // Screen
    /// Focus cycling computed an id that no component carries.
    FocusLookupMiss,

    /// The screen already holds `MAX_COMPONENTS` components.
    ComponentsFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidKey => "invalid callback key",
            Error::UnmatchedRelease => "release without a recorded press",
            Error::FocusLookupMiss => "no component with the next focus id",
            Error::ComponentsFull => "component collection is full",
        };
        f.write_str(msg)
    }
}
