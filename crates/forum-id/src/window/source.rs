use alloc::vec::Vec;
#[cfg(feature = "futures")]
use core::future::Future;

use crate::Identifier;

/// Direction of a bounded storage read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Oldest first, entries with an identifier strictly greater than the
    /// bound.
    Ascending,
    /// Newest first, entries with an identifier strictly less than the
    /// bound.
    Descending,
}

/// Anything that can be paged by identifier.
pub trait Keyed {
    fn identifier(&self) -> Identifier;
}

impl Keyed for Identifier {
    fn identifier(&self) -> Identifier {
        *self
    }
}

impl<T> Keyed for (Identifier, T) {
    fn identifier(&self) -> Identifier {
        self.0
    }
}

impl<T: Keyed + ?Sized> Keyed for &T {
    fn identifier(&self) -> Identifier {
        (**self).identifier()
    }
}

/// The storage side of a windowed fetch.
///
/// One call reads at most `limit` entries in `order`, starting just past
/// `bound` (exclusive) or from the respective end when `bound` is `None`.
pub trait SliceSource {
    type Item: Keyed;
    type Err;

    /// # Errors
    ///
    /// Whatever the storage layer reports; it is passed to the caller as
    /// [`SliceError::Storage`](crate::SliceError::Storage).
    fn fetch_ordered(
        &self,
        bound: Option<Identifier>,
        order: Order,
        limit: usize,
    ) -> Result<Vec<Self::Item>, Self::Err>;
}

/// Async counterpart of [`SliceSource`].
#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
#[cfg(feature = "futures")]
pub trait AsyncSliceSource {
    type Item: Keyed + Send;
    type Err: Send;

    /// # Errors
    ///
    /// See [`SliceSource::fetch_ordered`].
    fn fetch_ordered(
        &self,
        bound: Option<Identifier>,
        order: Order,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Self::Item>, Self::Err>> + Send;
}
