use core::{cmp::Ordering, time::Duration};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, Result,
    generator::{Mutex, Poll},
    time::unit_millis,
};

/// The mutable part of a [`WindowCounter`].
///
/// Only ever read or written while the counter's lock is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterState {
    /// The time window the counter is currently issuing values for.
    pub current_window: u64,
    /// The value the next reservation will receive.
    pub next_value: u64,
    /// How many values have been handed out in `current_window`.
    pub issued_in_window: u64,
}

/// A counter value reserved for one time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    /// The window the value belongs to (`now / unit`).
    pub window: u64,
    /// The reserved counter value, unique within `window`.
    pub value: u64,
}

/// A lock-protected, time-windowed counter.
///
/// Time is cut into windows of `unit`. Within one window the counter hands
/// out `0, 1, 2, ...` until `capacity` values have been issued, then reports
/// [`Poll::Pending`] until the next window opens, where it restarts from
/// zero. One instance never issues the same value twice in one window.
///
/// Only the reserve step runs under the lock; encoding the reserved value is
/// left to the caller.
///
/// A clock that reads earlier than the window already in use (a wall clock
/// stepping backwards) is treated as pending until it catches up, so an
/// exhausted window is never reopened.
#[derive(Debug)]
pub struct WindowCounter {
    state: Mutex<CounterState>,
    capacity: u64,
    unit_millis: u64,
}

impl WindowCounter {
    /// Creates a counter that issues `capacity` values per `unit` window.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUnit`] if `unit` is shorter than one millisecond.
    /// - [`Error::InvalidLayout`] if `capacity` is zero.
    pub fn new(capacity: u64, unit: Duration) -> Result<Self> {
        let unit_millis = unit_millis(unit)?;
        if capacity == 0 {
            return Err(Error::InvalidLayout {
                reason: "counter capacity must be non-zero",
            });
        }
        Ok(Self::from_parts(capacity, unit_millis))
    }

    /// Builds a counter from already validated parts.
    pub(crate) fn from_parts(capacity: u64, unit_millis: u64) -> Self {
        debug_assert!(capacity > 0 && unit_millis > 0);
        Self {
            state: Mutex::new(CounterState::default()),
            capacity,
            unit_millis,
        }
    }

    /// Values available per window.
    pub const fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Window length in milliseconds.
    pub const fn unit_millis(&self) -> u64 {
        self.unit_millis
    }

    /// Returns a copy of the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn snapshot(&self) -> Result<CounterState> {
        Ok(*self.lock()?)
    }

    /// Reserves the next value for the window containing `now_millis`.
    ///
    /// # Returns
    /// - `Ok(Poll::Ready { value })`: a reservation for the current window
    /// - `Ok(Poll::Pending { yield_for })`: the window is exhausted (or behind
    ///   the one in use); retry after `yield_for` milliseconds
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_reserve(&self, now_millis: u64) -> Result<Poll<Reservation>> {
        let window = now_millis / self.unit_millis;
        let mut state = self.lock()?;

        match window.cmp(&state.current_window) {
            Ordering::Greater => {
                state.current_window = window;
                state.next_value = 0;
                state.issued_in_window = 0;
            }
            Ordering::Equal => {}
            Ordering::Less => {
                return Ok(self.cold_clock_behind(now_millis, state.current_window));
            }
        }

        if state.issued_in_window >= self.capacity {
            let yield_for = self.until_next_window(now_millis, window);
            #[cfg(feature = "tracing")]
            tracing::trace!(window, yield_for, "counter window exhausted");
            return Ok(Poll::Pending { yield_for });
        }

        let value = state.next_value;
        state.next_value = (value + 1) % self.capacity;
        state.issued_in_window += 1;
        Ok(Poll::Ready {
            value: Reservation { window, value },
        })
    }

    fn until_next_window(&self, now_millis: u64, window: u64) -> u64 {
        let boundary = window.saturating_add(1).saturating_mul(self.unit_millis);
        boundary.saturating_sub(now_millis).max(1)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, now_millis: u64, current_window: u64) -> Poll<Reservation> {
        let resume_at = current_window.saturating_mul(self.unit_millis);
        Poll::Pending {
            yield_for: resume_at.saturating_sub(now_millis).max(1),
        }
    }

    #[cfg(not(feature = "parking-lot"))]
    fn lock(&self) -> Result<crate::generator::MutexGuard<'_, CounterState>> {
        Ok(self.state.lock()?)
    }

    #[cfg(feature = "parking-lot")]
    #[allow(clippy::unnecessary_wraps)]
    fn lock(&self) -> Result<crate::generator::MutexGuard<'_, CounterState>> {
        Ok(self.state.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(poll: Poll<Reservation>) -> Reservation {
        match poll {
            Poll::Ready { value } => value,
            Poll::Pending { yield_for } => panic!("unexpected pending (yield for: {yield_for})"),
        }
    }

    fn pending(poll: Poll<Reservation>) -> u64 {
        match poll {
            Poll::Ready { value } => panic!("unexpected ready ({value:?})"),
            Poll::Pending { yield_for } => yield_for,
        }
    }

    #[test]
    fn values_increment_within_window() {
        let counter = WindowCounter::new(64, Duration::from_millis(1)).unwrap();
        for expected in 0..3 {
            let r = ready(counter.try_reserve(42).unwrap());
            assert_eq!(r, Reservation { window: 42, value: expected });
        }
        let state = counter.snapshot().unwrap();
        assert_eq!(state.current_window, 42);
        assert_eq!(state.next_value, 3);
        assert_eq!(state.issued_in_window, 3);
    }

    #[test]
    fn exhausted_window_is_pending_until_boundary() {
        let counter = WindowCounter::new(4, Duration::from_millis(10)).unwrap();
        for _ in 0..4 {
            ready(counter.try_reserve(1_003).unwrap());
        }
        // window 100 spans 1000..1010
        assert_eq!(pending(counter.try_reserve(1_003).unwrap()), 7);
        assert_eq!(pending(counter.try_reserve(1_009).unwrap()), 1);

        let r = ready(counter.try_reserve(1_010).unwrap());
        assert_eq!(r, Reservation { window: 101, value: 0 });
    }

    #[test]
    fn new_window_resets_state() {
        let counter = WindowCounter::new(8, Duration::from_millis(1)).unwrap();
        ready(counter.try_reserve(5).unwrap());
        ready(counter.try_reserve(5).unwrap());
        let r = ready(counter.try_reserve(6).unwrap());
        assert_eq!(r.value, 0);
        assert_eq!(counter.snapshot().unwrap().issued_in_window, 1);
    }

    #[test]
    fn clock_behind_current_window_is_pending() {
        let counter = WindowCounter::new(8, Duration::from_millis(1)).unwrap();
        ready(counter.try_reserve(50).unwrap());
        assert_eq!(pending(counter.try_reserve(47).unwrap()), 3);
        // state untouched by the stale read
        assert_eq!(counter.snapshot().unwrap().current_window, 50);
    }

    #[test]
    fn rejects_zero_capacity_and_sub_millisecond_units() {
        assert!(WindowCounter::new(0, Duration::from_millis(1)).is_err());
        assert_eq!(
            WindowCounter::new(1, Duration::from_micros(10)).unwrap_err(),
            Error::InvalidUnit
        );
    }
}
