use core::fmt;

use crate::{Poll, Result};

/// Which kind of fragment a [`Section`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// The current time tick since the clock's epoch.
    Timestamp,
    /// A per-window counter value.
    Counter,
    /// Pure entropy.
    Random,
}

/// One fixed-width fragment of a token.
///
/// A [`TokenGenerator`] asks each of its sections, in order, to append their
/// fragment to a shared buffer. Sections are shared across threads, so any
/// state they keep must be behind a lock.
///
/// [`TokenGenerator`]: crate::TokenGenerator
pub trait Section: Send + Sync {
    /// The kind of fragment this section produces.
    fn kind(&self) -> SectionKind;

    /// Number of symbols appended on success.
    fn width(&self) -> usize;

    /// Appends exactly [`Section::width`] symbols to `out`.
    ///
    /// Returns [`Poll::Pending`] (appending nothing) when the section cannot
    /// produce a value until `yield_for` milliseconds have passed.
    ///
    /// # Errors
    ///
    /// Fails when the value no longer fits the section's width, e.g.
    /// [`Error::OutOfRange`] past a timestamp section's horizon. Nothing is
    /// appended in that case.
    ///
    /// [`Error::OutOfRange`]: crate::Error::OutOfRange
    fn poll_produce(&self, out: &mut String) -> Result<Poll<()>>;
}

impl fmt::Debug for dyn Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("kind", &self.kind())
            .field("width", &self.width())
            .finish()
    }
}
