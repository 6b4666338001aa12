use core::{future::Future, pin::pin, time::Duration};
use std::time::Instant;

use ::futures::future::{Either, select};
use tokio_util::sync::CancellationToken;

use super::SleepProvider;
use crate::{Error, Generator, MAX_WAITS, Poll, Result};

/// Extension trait for awaiting the next value of any [`Generator`].
///
/// The future polls the generator and, whenever a counter window is
/// exhausted, sleeps on `S` until the window rolls over. It gives up with
/// [`Error::Cancelled`] as soon as `cancel` fires, both before a wait starts
/// and while one is in progress, so it never sleeps past a cancellation.
pub trait GeneratorAsyncExt: Generator {
    /// Returns a future that resolves to the next value.
    ///
    /// # Errors
    ///
    /// - [`Error::Cancelled`] once `cancel` is cancelled while waiting.
    /// - [`Error::CounterSaturated`] once the generator is still pending after
    ///   [`MAX_WAITS`] window boundaries have passed. Pending polls before the
    ///   announced boundary (e.g. after a [`TokioYield`]) do not count.
    ///
    /// [`TokioYield`]: crate::TokioYield
    /// - Anything [`Generator::poll_next`] returns.
    fn next_async<S>(&self, cancel: &CancellationToken) -> impl Future<Output = Result<Self::Output>>
    where
        S: SleepProvider;
}

impl<G> GeneratorAsyncExt for G
where
    G: Generator + Sync,
    G::Output: Send,
{
    fn next_async<S>(&self, cancel: &CancellationToken) -> impl Future<Output = Result<Self::Output>>
    where
        S: SleepProvider,
    {
        async move {
            let mut waits = 0;
            let mut boundary: Option<Instant> = None;
            loop {
                let yield_for = match self.poll_next()? {
                    Poll::Ready { value } => return Ok(value),
                    Poll::Pending { yield_for } => yield_for,
                };

                let now = Instant::now();
                if boundary.is_none_or(|b| now >= b) {
                    if waits == MAX_WAITS {
                        return Err(Error::CounterSaturated { waits });
                    }
                    waits += 1;
                    boundary = Some(now + Duration::from_millis(yield_for));
                }

                if cancel.is_cancelled() {
                    return Err(cold_cancelled());
                }
                let sleep = pin!(S::sleep_for(Duration::from_millis(yield_for)));
                let cancelled = pin!(cancel.cancelled());
                if let Either::Right(_) = select(sleep, cancelled).await {
                    return Err(cold_cancelled());
                }
            }
        }
    }
}

#[cold]
#[inline(never)]
fn cold_cancelled() -> Error {
    #[cfg(feature = "tracing")]
    tracing::debug!("cancelled while waiting for counter window");
    Error::Cancelled
}
