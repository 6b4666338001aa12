use core::time::Duration;
use std::time::Instant;

use crate::{Error, Poll, Result};

/// How many consecutive window waits a single call tolerates before giving
/// up with [`Error::CounterSaturated`].
///
/// Each wait lasts until the next window boundary, so reaching this limit
/// means the caller lost the race for a slot in that many windows in a row,
/// or the clock stopped advancing.
pub const MAX_WAITS: u32 = 64;

/// A minimal interface shared by the identifier and token generators.
///
/// Implementors only provide [`Generator::poll_next`]; the provided methods
/// wait out exhausted counter windows on top of it.
pub trait Generator {
    /// The type of value produced.
    type Output;

    /// Attempts to produce the next value without blocking.
    ///
    /// Returns [`Poll::Pending`] when a counter window is exhausted. This is
    /// the fail-fast entry point for callers that must never wait.
    ///
    /// # Errors
    ///
    /// Fails when a section or layout cannot represent the current value
    /// (see [`Error::is_out_of_range`]) or a lock is poisoned.
    fn poll_next(&self) -> Result<Poll<Self::Output>>;

    /// Produces the next value, handing every wait to `wait`.
    ///
    /// `wait` receives the number of milliseconds until the next window and
    /// may sleep, spin, advance a test clock, or return an error to abort
    /// (typically [`Error::Cancelled`]).
    ///
    /// # Errors
    ///
    /// - Anything [`Generator::poll_next`] or `wait` returns.
    /// - [`Error::CounterSaturated`] after [`MAX_WAITS`] consecutive waits.
    fn try_next_with(&self, mut wait: impl FnMut(u64) -> Result<()>) -> Result<Self::Output> {
        let mut waits = 0;
        loop {
            match self.poll_next()? {
                Poll::Ready { value } => break Ok(value),
                Poll::Pending { yield_for } => {
                    if waits == MAX_WAITS {
                        return Err(Error::CounterSaturated { waits });
                    }
                    waits += 1;
                    wait(yield_for)?;
                }
            }
        }
    }

    /// Produces the next value, sleeping the current thread while a counter
    /// window is exhausted.
    ///
    /// # Errors
    ///
    /// See [`Generator::try_next_with`].
    ///
    /// # Example
    ///
    /// ```
    /// use forum_id::{Generator, IdentifierGenerator, MonotonicClock};
    ///
    /// let generator = IdentifierGenerator::new(MonotonicClock::default());
    /// let a = generator.next().unwrap();
    /// let b = generator.next().unwrap();
    /// assert!(a < b);
    /// assert!(a.to_string() < b.to_string());
    /// ```
    fn next(&self) -> Result<Self::Output> {
        self.try_next_with(|yield_for| {
            std::thread::sleep(Duration::from_millis(yield_for));
            Ok(())
        })
    }

    /// Like [`Generator::next`], but fails with [`Error::Cancelled`] instead
    /// of sleeping past `deadline`.
    ///
    /// The deadline is checked before every wait, so a call that needs no
    /// wait succeeds even when the deadline has already passed.
    ///
    /// # Errors
    ///
    /// See [`Generator::try_next_with`].
    fn next_until(&self, deadline: Instant) -> Result<Self::Output> {
        self.try_next_with(|yield_for| {
            let dur = Duration::from_millis(yield_for);
            let now = Instant::now();
            if now + dur > deadline {
                #[cfg(feature = "tracing")]
                tracing::debug!(yield_for, "deadline would pass while waiting for counter window");
                return Err(Error::Cancelled);
            }
            std::thread::sleep(dur);
            Ok(())
        })
    }
}
