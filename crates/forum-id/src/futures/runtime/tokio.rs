use core::{future::Future, time::Duration};

use ::futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::{
    Generator, Result,
    futures::{GeneratorAsyncExt, SleepProvider},
};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
#[derive(Debug, Clone, Copy)]
pub struct TokioSleep;

impl SleepProvider for TokioSleep {
    type Sleep = ::tokio::time::Sleep;

    fn sleep_for(dur: Duration) -> Self::Sleep {
        ::tokio::time::sleep(dur)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// This strategy avoids timer-based delays by yielding to the scheduler
/// immediately, which can improve responsiveness in low-concurrency scenarios.
///
/// However, it comes at the cost of more frequent rescheduling, which can
/// result in tighter polling loops and increased CPU usage under load. In
/// highly concurrent cases, a timer-based sleep (e.g., [`TokioSleep`]) is often
/// more efficient due to reduced scheduler churn. Only window boundaries that
/// actually pass count towards [`MAX_WAITS`](crate::MAX_WAITS), not yields.
#[derive(Debug, Clone, Copy)]
pub struct TokioYield;

impl SleepProvider for TokioYield {
    type Sleep = BoxFuture<'static, ()>;

    fn sleep_for(_dur: Duration) -> Self::Sleep {
        Box::pin(::tokio::task::yield_now())
    }
}

/// Extension trait that awaits generators on the
/// [`tokio`](https://docs.rs/tokio) runtime using [`TokioSleep`].
pub trait GeneratorAsyncTokioExt: Generator {
    /// Returns a future that resolves to the next value.
    ///
    /// # Errors
    ///
    /// See [`GeneratorAsyncExt::next_async`].
    fn next_tokio(&self, cancel: &CancellationToken) -> impl Future<Output = Result<Self::Output>>;
}

impl<G> GeneratorAsyncTokioExt for G
where
    G: Generator + Sync,
    G::Output: Send,
{
    fn next_tokio(&self, cancel: &CancellationToken) -> impl Future<Output = Result<Self::Output>> {
        <Self as GeneratorAsyncExt>::next_async::<TokioSleep>(self, cancel)
    }
}
