/// A client's request for one page.
///
/// Exactly one of `before` and `after` must be present. An empty cursor
/// string means "from the start": `after: ""` begins at the newest entry,
/// `before: ""` at the oldest.
///
/// ```
/// use forum_id::SliceQuery;
///
/// let first = SliceQuery::after("", 20);
/// assert_eq!(first.after.as_deref(), Some(""));
/// assert!(first.before.is_none());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SliceQuery {
    /// Return entries newer than this cursor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub before: Option<String>,
    /// Return entries older than this cursor.
    #[cfg_attr(feature = "serde", serde(default))]
    pub after: Option<String>,
    /// Maximum entries on the page.
    pub limit: usize,
}

impl SliceQuery {
    /// Entries older than `cursor`, newest first.
    pub fn after(cursor: impl Into<String>, limit: usize) -> Self {
        Self {
            before: None,
            after: Some(cursor.into()),
            limit,
        }
    }

    /// Entries newer than `cursor`, newest first.
    pub fn before(cursor: impl Into<String>, limit: usize) -> Self {
        Self {
            before: Some(cursor.into()),
            after: None,
            limit,
        }
    }
}
