/// Represents the result of attempting to produce a new value without
/// blocking.
///
/// This type models the outcome of [`Generator::poll_next`] and of
/// [`Section::poll_produce`]:
///
/// - [`Poll::Ready`] indicates a value was produced.
/// - [`Poll::Pending`] means a counter window is exhausted (or the clock is
///   behind the window already in use) and nothing can be produced for
///   `yield_for` milliseconds.
///
/// Nothing in the crate sleeps inside `poll_*`; waiting is up to the caller.
///
/// # Example
///
/// ```
/// use forum_id::{Generator, IdentifierGenerator, MonotonicClock, Poll};
///
/// let generator = IdentifierGenerator::new(MonotonicClock::default());
/// match generator.poll_next().unwrap() {
///     Poll::Ready { value } => println!("minted {value}"),
///     Poll::Pending { yield_for } => println!("back off for {yield_for}ms"),
/// }
/// ```
///
/// [`Generator::poll_next`]: crate::Generator::poll_next
/// [`Section::poll_produce`]: crate::Section::poll_produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll<T> {
    /// A value was produced and is ready to use.
    Ready {
        /// The produced value.
        value: T,
    },
    /// Nothing could be produced because the current window is exhausted.
    ///
    /// Wait at least `yield_for` milliseconds before trying again.
    Pending {
        /// Milliseconds until the next window opens.
        yield_for: u64,
    },
}

impl<T> Poll<T> {
    /// Maps a `Ready` value, passing `Pending` through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Poll<U> {
        match self {
            Self::Ready { value } => Poll::Ready { value: f(value) },
            Self::Pending { yield_for } => Poll::Pending { yield_for },
        }
    }

    /// Returns `true` for [`Poll::Ready`].
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}
