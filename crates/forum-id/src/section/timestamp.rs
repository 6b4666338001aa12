use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    Poll, Result, Section, SectionKind, TimeSource,
    codec::{self, MAX_WIDTH},
    time::unit_millis,
};

/// Encodes `floor((now - epoch) / unit)` at a fixed width.
///
/// The width puts a hard limit on how far past the epoch the section can
/// count: once the tick needs more than `width` symbols every call fails with
/// [`Error::OutOfRange`]. It never wraps around. [`TimestampSection::horizon`]
/// and [`TimestampSection::expires_at`] report that limit.
///
/// | width | unit   | horizon         |
/// |-------|--------|-----------------|
/// | 6     | 1 s    | ~2,180 years    |
/// | 7     | 1 ms   | ~139 years      |
/// | 8     | 1 ms   | ~8,900 years    |
///
/// [`Error::OutOfRange`]: crate::Error::OutOfRange
#[derive(Debug, Clone)]
pub struct TimestampSection<T: TimeSource> {
    width: usize,
    unit_millis: u64,
    time: T,
}

impl<T: TimeSource> TimestampSection<T> {
    /// # Errors
    ///
    /// - [`Error::InvalidWidth`] unless `1 <= width <= 21`.
    /// - [`Error::InvalidUnit`] if `unit` is under one millisecond.
    ///
    /// [`Error::InvalidWidth`]: crate::Error::InvalidWidth
    /// [`Error::InvalidUnit`]: crate::Error::InvalidUnit
    pub fn new(width: usize, unit: Duration, time: T) -> Result<Self> {
        codec::check_width(width, MAX_WIDTH)?;
        Ok(Self {
            width,
            unit_millis: unit_millis(unit)?,
            time,
        })
    }

    /// Time after the epoch at which the section stops producing values.
    ///
    /// Saturates at [`Duration::MAX`] for widths that outlast it.
    pub fn horizon(&self) -> Duration {
        let millis = codec::capacity(self.width).saturating_mul(u128::from(self.unit_millis));
        u64::try_from(millis).map_or(Duration::MAX, Duration::from_millis)
    }

    /// Wall-clock instant at which the section stops producing values, if
    /// representable.
    pub fn expires_at(&self) -> Option<SystemTime> {
        UNIX_EPOCH
            .checked_add(self.time.epoch())?
            .checked_add(self.horizon())
    }

    /// The tick the section would encode right now.
    pub fn current_tick(&self) -> u64 {
        self.time.current_millis() / self.unit_millis
    }
}

impl<T> Section for TimestampSection<T>
where
    T: TimeSource + Send + Sync,
{
    fn kind(&self) -> SectionKind {
        SectionKind::Timestamp
    }

    fn width(&self) -> usize {
        self.width
    }

    fn poll_produce(&self, out: &mut String) -> Result<Poll<()>> {
        let tick = self.current_tick();
        codec::encode_into(u128::from(tick), self.width, out)?;
        Ok(Poll::Ready { value: () })
    }
}
