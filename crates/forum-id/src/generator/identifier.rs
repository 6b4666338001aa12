use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, Generator, Identifier, Layout, Poll, RandSource, Result, ThreadRandom, TimeSource,
    generator::{Reservation, WindowCounter},
};

/// A lock-based generator of time-ordered [`Identifier`]s.
///
/// Each identifier packs the current tick (`now / unit` since the clock's
/// epoch), a per-tick counter, and random bits according to a [`Layout`].
/// The counter comes from a [`WindowCounter`] sized to the layout's counter
/// field, so one generator never repeats a value and every identifier it
/// returns is greater than the previous one, even across threads.
///
/// When the counter for the current tick is exhausted the generator reports
/// [`Poll::Pending`] until the next tick; the provided [`Generator`] methods
/// turn that into a sleep, a deadline, or (with the `futures` feature) an
/// async wait.
///
/// # Example
///
/// ```
/// use forum_id::{Generator, IdentifierGenerator, MonotonicClock};
///
/// let generator = IdentifierGenerator::new(MonotonicClock::default());
/// let id = generator.next().unwrap();
/// assert_eq!(id.to_string().len(), 11);
/// ```
#[derive(Debug)]
pub struct IdentifierGenerator<T, R = ThreadRandom>
where
    T: TimeSource,
    R: RandSource,
{
    layout: Layout,
    unit: Duration,
    counter: WindowCounter,
    time: T,
    rng: R,
}

impl<T> IdentifierGenerator<T, ThreadRandom>
where
    T: TimeSource,
{
    /// Creates a generator with [`Layout::DEFAULT`], a one-millisecond tick,
    /// and thread-local randomness.
    pub fn new(time: T) -> Self {
        let layout = Layout::DEFAULT;
        let unit = Duration::from_millis(1);
        Self {
            layout,
            unit,
            counter: WindowCounter::from_parts(layout.max_counter() + 1, 1),
            time,
            rng: ThreadRandom,
        }
    }
}

impl<T, R> IdentifierGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    /// Creates a generator with a custom layout, tick length, and random
    /// source.
    ///
    /// Sub-millisecond parts of `unit` are truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUnit`] if `unit` is shorter than one
    /// millisecond.
    pub fn with_layout(layout: Layout, unit: Duration, time: T, rng: R) -> Result<Self> {
        let counter = WindowCounter::new(layout.max_counter() + 1, unit)?;
        let unit = Duration::from_millis(counter.unit_millis());
        Ok(Self {
            layout,
            unit,
            counter,
            time,
            rng,
        })
    }

    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Length of one timestamp tick.
    pub const fn unit(&self) -> Duration {
        self.unit
    }

    /// How long after the epoch the timestamp field runs out.
    pub fn horizon(&self) -> Duration {
        let ticks = self.layout.max_timestamp().saturating_add(1);
        Duration::from_millis(ticks.saturating_mul(self.counter.unit_millis()))
    }

    /// Wall-clock time of the tick an identifier was minted in.
    ///
    /// Only meaningful for identifiers produced by a generator with the same
    /// layout, unit, and clock epoch.
    pub fn created_at(&self, id: Identifier) -> SystemTime {
        let tick = self.layout.timestamp(id);
        let since_epoch = Duration::from_millis(tick.saturating_mul(self.counter.unit_millis()));
        UNIX_EPOCH + self.time.epoch() + since_epoch
    }

    fn pack(&self, reservation: Reservation) -> Identifier {
        let random = (self.rng.rand() as u64) & self.layout.max_random();
        self.layout.pack(reservation.window, reservation.value, random)
    }

    /// Tick 0, counter 0 and random 0 pack to [`Identifier::UNSET`]. The
    /// counter already moved past 0, so one more reservation in the same
    /// tick carries a non-zero counter (or is `Pending`).
    #[cold]
    #[inline(never)]
    fn cold_skip_unset(&self, now: u64) -> Result<Poll<Identifier>> {
        #[cfg(feature = "tracing")]
        tracing::trace!("skipping the unset identifier");
        Ok(self.counter.try_reserve(now)?.map(|r| self.pack(r)))
    }

    #[cold]
    #[inline(never)]
    fn cold_horizon_exceeded(&self, tick: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(tick, max = self.layout.max_timestamp(), "identifier horizon exceeded");
        Error::HorizonExceeded {
            tick,
            max: self.layout.max_timestamp(),
        }
    }
}

impl<T, R> Generator for IdentifierGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    type Output = Identifier;

    /// Attempts to mint the next identifier.
    ///
    /// Never returns [`Identifier::UNSET`].
    ///
    /// # Errors
    ///
    /// - [`Error::HorizonExceeded`] once the clock passes the last tick the
    ///   layout can represent. Nothing is reserved in that case.
    /// - [`Error::LockPoisoned`] if the counter lock was poisoned (only
    ///   without the `parking-lot` feature).
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn poll_next(&self) -> Result<Poll<Identifier>> {
        let now = self.time.current_millis();
        let tick = now / self.counter.unit_millis();
        if tick > self.layout.max_timestamp() {
            return Err(self.cold_horizon_exceeded(tick));
        }

        let id = match self.counter.try_reserve(now)? {
            Poll::Ready { value } => self.pack(value),
            Poll::Pending { yield_for } => return Ok(Poll::Pending { yield_for }),
        };
        if id.is_unset() {
            return self.cold_skip_unset(now);
        }
        Ok(Poll::Ready { value: id })
    }
}
