use alloc::{collections::BTreeMap, vec::Vec};
use core::{convert::Infallible, ops::Bound};

#[cfg(feature = "futures")]
use crate::AsyncSliceSource;
use crate::{Identifier, Keyed, Order, SliceSource};

/// An in-memory [`SliceSource`] ordered by identifier.
///
/// Suitable for tests, benches, and demos; entries are cloned out on every
/// fetch.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    rows: BTreeMap<Identifier, T>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Keyed> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `item` under its identifier, returning the entry it replaced.
    pub fn insert(&mut self, item: T) -> Option<T> {
        self.rows.insert(item.identifier(), item)
    }

    pub fn get(&self, id: Identifier) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.rows.values()
    }
}

impl<T: Keyed> FromIterator<T> for MemoryStore<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl<T: Keyed> Extend<T> for MemoryStore<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Keyed + Clone> SliceSource for MemoryStore<T> {
    type Item = T;
    type Err = Infallible;

    fn fetch_ordered(
        &self,
        bound: Option<Identifier>,
        order: Order,
        limit: usize,
    ) -> Result<Vec<T>, Infallible> {
        let rows = match order {
            Order::Descending => {
                let upper = bound.map_or(Bound::Unbounded, Bound::Excluded);
                self.rows
                    .range((Bound::Unbounded, upper))
                    .rev()
                    .take(limit)
                    .map(|(_, row)| row.clone())
                    .collect()
            }
            Order::Ascending => {
                let lower = bound.map_or(Bound::Unbounded, Bound::Excluded);
                self.rows
                    .range((lower, Bound::Unbounded))
                    .take(limit)
                    .map(|(_, row)| row.clone())
                    .collect()
            }
        };
        Ok(rows)
    }
}

#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
#[cfg(feature = "futures")]
impl<T: Keyed + Clone + Send + Sync> AsyncSliceSource for MemoryStore<T> {
    type Item = T;
    type Err = Infallible;

    fn fetch_ordered(
        &self,
        bound: Option<Identifier>,
        order: Order,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<T>, Infallible>> + Send {
        core::future::ready(SliceSource::fetch_ordered(self, bound, order, limit))
    }
}
