//! Ordered container with extract-min and removal of arbitrary members.
//!
//! Backed by a `BTreeSet`, so membership and removal are logarithmic and an
//! element is stored at most once.

use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct PriorityQueue<T: Ord> {
    items: BTreeSet<T>,
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self {
            items: BTreeSet::new(),
        }
    }
}

impl<T: Ord> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item`. Returns `false` if an equal item was already queued.
    pub fn push(&mut self, item: T) -> bool {
        self.items.insert(item)
    }

    /// Removes and returns the smallest item.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_first()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Removes `item` if present. Removing an absent item is a no-op.
    pub fn remove(&mut self, item: &T) -> bool {
        self.items.remove(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Ord> FromIterator<T> for PriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
