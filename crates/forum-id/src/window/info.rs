use alloc::vec::Vec;

use crate::Keyed;

/// Pagination metadata returned alongside a page.
///
/// `first_cursor` and `last_cursor` are the cursors of the newest and oldest
/// entry on the page. Both are empty, and `has_next` is `false`, for an empty
/// page.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SliceInfo {
    pub first_cursor: String,
    pub last_cursor: String,
    /// More entries exist beyond this page in the requested direction.
    pub has_next: bool,
}

impl SliceInfo {
    /// Describes `items` (already in display order).
    pub fn from_items<T: Keyed>(items: &[T], has_next: bool) -> Self {
        match (items.first(), items.last()) {
            (Some(first), Some(last)) => Self {
                first_cursor: first.identifier().to_string(),
                last_cursor: last.identifier().to_string(),
                has_next,
            },
            _ => Self::default(),
        }
    }
}

/// One page of entries, newest first, with its [`SliceInfo`].
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: SliceInfo,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Identifier;

    #[test]
    fn empty_page_has_empty_cursors() {
        let info = SliceInfo::from_items::<Identifier>(&[], true);
        assert_eq!(info, SliceInfo::default());
        assert!(!info.has_next);
    }

    #[test]
    fn cursors_come_from_first_and_last_item() {
        let items = [Identifier::from_raw(9), Identifier::from_raw(5)];
        let info = SliceInfo::from_items(&items, true);
        assert_eq!(info.first_cursor, items[0].to_string());
        assert_eq!(info.last_cursor, items[1].to_string());
        assert!(info.has_next);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_camel_case() {
        let info = SliceInfo {
            first_cursor: "a".into(),
            last_cursor: "b".into(),
            has_next: false,
        };
        assert_eq!(
            serde_json::to_string(&info).unwrap(),
            r#"{"firstCursor":"a","lastCursor":"b","hasNext":false}"#
        );
    }
}
