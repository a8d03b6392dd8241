//! Bounded observation history and windowed read views.

use std::collections::VecDeque;
use std::iter::Chain;
use std::slice::Iter;

use super::{Bar, Timestamped};
use crate::error::HistoryError;

/// Non-owning view over the most recent observations of a [`History`].
///
/// A `VecDeque` may store its contents in two slices, so the view keeps both
/// halves and never copies.
pub struct Window<'a, T> {
    head: &'a [T],
    tail: &'a [T],
}

impl<'a, T> Clone for Window<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Window<'a, T> {}

impl<'a, T> Window<'a, T> {
    /// View over a plain slice, oldest first.
    pub fn from_slice(items: &'a [T]) -> Self {
        Self {
            head: items,
            tail: &[],
        }
    }

    fn from_parts(head: &'a [T], tail: &'a [T]) -> Self {
        Self { head, tail }
    }

    /// Number of observations in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    /// Check if the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Observation at `index` (0 = oldest in the view).
    pub fn get(&self, index: usize) -> Option<&'a T> {
        if index < self.head.len() {
            self.head.get(index)
        } else {
            self.tail.get(index - self.head.len())
        }
    }

    /// Oldest observation in the view.
    pub fn first(&self) -> Option<&'a T> {
        self.get(0)
    }

    /// Newest observation in the view.
    pub fn last(&self) -> Option<&'a T> {
        self.tail.last().or_else(|| self.head.last())
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> Chain<Iter<'a, T>, Iter<'a, T>> {
        self.head.iter().chain(self.tail.iter())
    }

    /// The newest `n` observations of this view (all of them if `n` exceeds the length).
    pub fn suffix(&self, n: usize) -> Window<'a, T> {
        let skip = self.len().saturating_sub(n);
        if skip >= self.head.len() {
            Window::from_parts(&[], &self.tail[skip - self.head.len()..])
        } else {
            Window::from_parts(&self.head[skip..], self.tail)
        }
    }
}

impl<'a> Window<'a, Bar> {
    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.iter().map(|b| b.close).collect()
    }

    /// True ranges of every bar that has a predecessor inside the view.
    pub fn true_ranges(&self) -> Vec<f64> {
        self.iter()
            .zip(self.iter().skip(1))
            .map(|(prev, bar)| bar.true_range(Some(prev.close)))
            .collect()
    }
}

impl<'a, T> IntoIterator for Window<'a, T> {
    type Item = &'a T;
    type IntoIter = Chain<Iter<'a, T>, Iter<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.head.iter().chain(self.tail.iter())
    }
}

impl<'a, T: std::fmt::Debug> std::fmt::Debug for Window<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Append-only, bounded history of observations.
///
/// Observations older than the retention horizon are evicted on append. The
/// owner is responsible for keeping the horizon at least as large as the
/// longest window any reader requests.
#[derive(Debug, Clone)]
pub struct History<T> {
    items: VecDeque<T>,
    retention: usize,
}

impl<T: Timestamped> History<T> {
    /// Create an empty history that keeps at most `retention` observations.
    ///
    /// A retention of zero is raised to one so the latest observation is always kept.
    /// Storage grows with the observations actually appended.
    pub fn with_retention(retention: usize) -> Self {
        Self {
            items: VecDeque::new(),
            retention: retention.max(1),
        }
    }

    /// Append one observation, evicting the oldest ones beyond the horizon.
    pub fn append(&mut self, item: T) {
        self.items.push_back(item);
        while self.items.len() > self.retention {
            self.items.pop_front();
        }
    }

    /// The most recent `n` observations.
    ///
    /// Fails with [`HistoryError::InsufficientData`] when fewer than `n` are
    /// stored; callers treat that as "not ready yet".
    pub fn window(&self, n: usize) -> Result<Window<'_, T>, HistoryError> {
        if n > self.items.len() {
            return Err(HistoryError::InsufficientData {
                requested: n,
                available: self.items.len(),
            });
        }
        let (head, tail) = self.items.as_slices();
        Ok(Window::from_parts(head, tail).suffix(n))
    }

    /// Get the number of stored observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the history is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Newest observation.
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Timestamp of the newest observation.
    pub fn last_timestamp(&self) -> Option<i64> {
        self.items.back().map(Timestamped::timestamp)
    }

    /// Current retention horizon.
    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Change the retention horizon, evicting immediately when it shrinks.
    pub fn set_retention(&mut self, retention: usize) {
        self.retention = retention.max(1);
        while self.items.len() > self.retention {
            self.items.pop_front();
        }
    }

    /// Drop every stored observation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
