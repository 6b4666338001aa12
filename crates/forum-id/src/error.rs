/// Result alias used across `forum-id`.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `forum-id` can emit while encoding, decoding, or
/// generating values.
///
/// Pagination has its own error type, [`crate::SliceError`], which wraps
/// cursor problems as [`crate::ValidationError`] and passes storage failures
/// through untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A value needs more symbols than the configured width allows.
    #[error("value {value} does not fit in {width} symbols")]
    OutOfRange {
        /// The value that failed to encode or decode.
        value: u128,
        /// The width, in symbols, it had to fit.
        width: usize,
    },

    /// The clock has moved past the last tick an identifier layout can
    /// represent.
    #[error("timestamp tick {tick} exceeds the layout horizon ({max})")]
    HorizonExceeded {
        /// The tick that was observed.
        tick: u64,
        /// The largest tick the layout accepts.
        max: u64,
    },

    /// A counter window stayed exhausted across every permitted wait.
    #[error("counter window still saturated after {waits} waits")]
    CounterSaturated {
        /// How many times the caller waited for the window to roll over.
        waits: u32,
    },

    /// A character outside the 64-symbol alphabet.
    #[error("invalid symbol {byte:#04x} at index {index}")]
    InvalidSymbol {
        /// The offending byte.
        byte: u8,
        /// Its position in the input.
        index: usize,
    },

    /// An encoded identifier of the wrong length.
    #[error("invalid length: expected {expected} symbols, got {len}")]
    InvalidLength {
        /// The fixed width identifiers are encoded at.
        expected: usize,
        /// The length that was supplied.
        len: usize,
    },

    /// A section was configured with a width it cannot support.
    #[error("invalid width {width} (supported: 1..={max})")]
    InvalidWidth {
        /// The requested width.
        width: usize,
        /// The widest supported value.
        max: usize,
    },

    /// A time unit shorter than one millisecond.
    #[error("time unit must be at least one millisecond")]
    InvalidUnit,

    /// An identifier layout that does not fit 64 bits or has no counter.
    #[error("invalid layout: {reason}")]
    InvalidLayout {
        /// Which constraint the layout broke.
        reason: &'static str,
    },

    /// The caller cancelled (or its deadline passed) while a counter window
    /// was exhausted.
    #[error("cancelled while waiting for the next counter window")]
    Cancelled,

    /// The counter lock was poisoned by a panicking thread.
    ///
    /// `parking_lot` mutexes do not poison, so this variant only exists when
    /// the `parking-lot` feature is disabled.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("counter lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns `true` for the out-of-range family: an encoding overflow, an
    /// exhausted timestamp horizon, or a counter that stayed saturated.
    pub const fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. } | Self::HorizonExceeded { .. } | Self::CounterSaturated { .. }
        )
    }

    /// Returns `true` when the input was malformed text rather than a
    /// generation failure.
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::InvalidSymbol { .. } | Self::InvalidLength { .. })
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
