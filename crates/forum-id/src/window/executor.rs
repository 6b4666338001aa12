use alloc::vec::Vec;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[cfg(feature = "futures")]
use crate::AsyncSliceSource;
use crate::{
    Identifier, Keyed, Order, Page, SliceError, SliceInfo, SliceQuery, SliceSource,
    ValidationError,
};

/// A validated query, ready to be sent to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicePlan {
    /// Exclusive bound, or `None` to start from the newest (descending) or
    /// oldest (ascending) entry.
    pub bound: Option<Identifier>,
    pub order: Order,
    /// Rows to request: one more than `limit`, as lookahead.
    pub fetch_limit: usize,
    /// Rows to return.
    pub limit: usize,
}

impl SlicePlan {
    /// Turns the rows storage returned for this plan into a page.
    ///
    /// The lookahead row, if present, only sets `has_next` and is dropped.
    /// Ascending reads are reversed so every page is newest first.
    pub fn finish<T: Keyed>(&self, mut rows: Vec<T>) -> Page<T> {
        let has_next = rows.len() > self.limit;
        rows.truncate(self.limit);
        if self.order == Order::Ascending {
            rows.reverse();
        }
        let info = SliceInfo::from_items(&rows, has_next);
        Page { items: rows, info }
    }
}

/// Stateless executor for cursor-windowed reads.
///
/// Each fetch validates the query, issues exactly one bounded read through a
/// [`SliceSource`], and shapes the result into a newest-first [`Page`]. It
/// holds no lock and never retries, so one executor can serve any number of
/// concurrent requests.
///
/// | query           | storage read                        | page                  |
/// |-----------------|-------------------------------------|-----------------------|
/// | `after: ""`     | descending from the newest          | newest entries        |
/// | `after: c`      | descending, identifier `< c`        | entries older than c  |
/// | `before: ""`    | ascending from the oldest, reversed | oldest entries        |
/// | `before: c`     | ascending, identifier `> c`, reversed | entries newer than c |
///
/// # Example
///
/// ```
/// use forum_id::{CursorWindow, Identifier, MemoryStore, SliceQuery};
///
/// let store: MemoryStore<Identifier> = (1..=10).map(Identifier::from_raw).collect();
/// let window = CursorWindow::new();
///
/// let page = window.fetch(&store, &SliceQuery::after("", 3)).unwrap();
/// assert_eq!(page.items, [10, 9, 8].map(Identifier::from_raw));
/// assert!(page.info.has_next);
///
/// let next = window
///     .fetch(&store, &SliceQuery::after(page.info.last_cursor, 3))
///     .unwrap();
/// assert_eq!(next.items, [7, 6, 5].map(Identifier::from_raw));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorWindow {
    max_limit: Option<usize>,
}

impl CursorWindow {
    /// An executor that accepts any positive limit.
    pub const fn new() -> Self {
        Self { max_limit: None }
    }

    /// An executor that rejects limits above `max`.
    pub const fn with_max_limit(max: usize) -> Self {
        Self {
            max_limit: Some(max),
        }
    }

    pub const fn max_limit(&self) -> Option<usize> {
        self.max_limit
    }

    /// Validates `query` and works out the storage read it needs.
    ///
    /// # Errors
    ///
    /// Any [`ValidationError`]: both or neither cursor set, a zero or
    /// over-cap limit, or a cursor that does not decode.
    pub fn plan(&self, query: &SliceQuery) -> Result<SlicePlan, ValidationError> {
        let (cursor, order) = match (&query.before, &query.after) {
            (Some(_), Some(_)) => return Err(ValidationError::ConflictingCursors),
            (None, None) => return Err(ValidationError::MissingCursor),
            (Some(before), None) => (before, Order::Ascending),
            (None, Some(after)) => (after, Order::Descending),
        };
        if query.limit == 0 {
            return Err(ValidationError::ZeroLimit);
        }
        match self.max_limit {
            Some(max) if query.limit > max => {
                return Err(ValidationError::LimitTooLarge {
                    limit: query.limit,
                    max,
                });
            }
            _ => {}
        }

        let bound = if cursor.is_empty() {
            None
        } else {
            Some(Identifier::parse(cursor).map_err(ValidationError::MalformedCursor)?)
        };

        // the lookahead row must be addressable
        let Some(fetch_limit) = query.limit.checked_add(1) else {
            return Err(ValidationError::LimitTooLarge {
                limit: query.limit,
                max: usize::MAX - 1,
            });
        };

        let plan = SlicePlan {
            bound,
            order,
            fetch_limit,
            limit: query.limit,
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(?plan, "planned slice");
        Ok(plan)
    }

    /// Fetches one page from `source`.
    ///
    /// # Errors
    ///
    /// - [`SliceError::Invalid`] if the query is rejected; storage is not
    ///   touched.
    /// - [`SliceError::Storage`] with the source's own error.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self, source)))]
    pub fn fetch<S: SliceSource>(
        &self,
        source: &S,
        query: &SliceQuery,
    ) -> Result<Page<S::Item>, SliceError<S::Err>> {
        let plan = self.plan(query)?;
        let rows = source
            .fetch_ordered(plan.bound, plan.order, plan.fetch_limit)
            .map_err(SliceError::Storage)?;
        Ok(plan.finish(rows))
    }

    /// Async version of [`CursorWindow::fetch`].
    ///
    /// Dropping the returned future drops the pending storage call.
    ///
    /// # Errors
    ///
    /// See [`CursorWindow::fetch`].
    #[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
    #[cfg(feature = "futures")]
    pub async fn fetch_async<S: AsyncSliceSource>(
        &self,
        source: &S,
        query: &SliceQuery,
    ) -> Result<Page<S::Item>, SliceError<S::Err>> {
        let plan = self.plan(query)?;
        let rows = source
            .fetch_ordered(plan.bound, plan.order, plan.fetch_limit)
            .await
            .map_err(SliceError::Storage)?;
        Ok(plan.finish(rows))
    }
}
