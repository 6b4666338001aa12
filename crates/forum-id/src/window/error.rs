use crate::Error;

/// A malformed [`SliceQuery`](crate::SliceQuery).
///
/// Cursors come from clients, so every problem with them, including a cursor
/// that fails to decode, is reported here rather than as an internal fault.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// Neither `before` nor `after` was supplied.
    #[error("one of `before` or `after` is required")]
    MissingCursor,

    /// Both `before` and `after` were supplied.
    #[error("`before` and `after` are mutually exclusive")]
    ConflictingCursors,

    /// A page of zero entries was requested.
    #[error("limit must be greater than zero")]
    ZeroLimit,

    /// The limit is above the executor's cap.
    #[error("limit {limit} exceeds the maximum of {max}")]
    LimitTooLarge {
        /// The requested limit.
        limit: usize,
        /// The configured cap.
        max: usize,
    },

    /// The cursor is not a valid encoded identifier.
    #[error("malformed cursor: {0}")]
    MalformedCursor(#[source] Error),
}

impl ValidationError {
    /// Always `true`; validation failures are the caller's fault.
    pub const fn is_client_error(&self) -> bool {
        true
    }
}

/// Failure of a windowed fetch.
///
/// Storage errors are passed through untouched so callers can match on
/// their own error type.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SliceError<E> {
    /// The query was rejected before storage was touched.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The storage collaborator failed.
    #[error("storage fetch failed: {0}")]
    Storage(#[source] E),
}

impl<E> SliceError<E> {
    /// `true` for [`SliceError::Invalid`], which an API layer should map to a
    /// 4xx response.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}
