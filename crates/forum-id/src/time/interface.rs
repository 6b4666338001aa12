use alloc::sync::Arc;
use core::time::Duration;

/// Default epoch: Wednesday, January 1, 2025 00:00:00 UTC.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// A trait for time sources that return a monotonic or wall-clock timestamp.
///
/// This abstraction allows you to plug in a real system clock, a monotonic
/// timer, or a mocked time source in tests.
///
/// The unit is **milliseconds** relative to the source's own epoch. Sections
/// and generators quantise this further with their configured unit.
///
/// # Example
///
/// ```
/// use forum_id::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;

    /// The epoch `current_millis` counts from, as a duration since
    /// 1970-01-01 UTC.
    ///
    /// Only used to convert ticks back into wall-clock time for diagnostics.
    fn epoch(&self) -> Duration {
        DEFAULT_EPOCH
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }

    fn epoch(&self) -> Duration {
        (**self).epoch()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }

    fn epoch(&self) -> Duration {
        (**self).epoch()
    }
}

/// Converts a time quantum into whole milliseconds.
///
/// Sub-millisecond units are rejected because every [`TimeSource`] counts in
/// milliseconds.
pub(crate) fn unit_millis(unit: Duration) -> crate::Result<u64> {
    match u64::try_from(unit.as_millis()) {
        Ok(0) | Err(_) => Err(crate::Error::InvalidUnit),
        Ok(ms) => Ok(ms),
    }
}
