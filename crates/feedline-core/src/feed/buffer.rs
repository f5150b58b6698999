//! Fixed-capacity, newest-first line buffer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::format::DisplayLine;

/// Ordered window of the most recent lines.
///
/// Length is fixed at construction. Index 0 always holds the latest `push`;
/// the entry at the last index is evicted on each insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollingBuffer<T = DisplayLine> {
    lines: VecDeque<T>,
}

impl<T: Default> ScrollingBuffer<T> {
    /// Creates a buffer with `capacity` blank slots (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut lines = VecDeque::with_capacity(capacity);
        lines.resize_with(capacity, T::default);
        Self { lines }
    }
}

impl<T> ScrollingBuffer<T> {
    /// Inserts `line` at index 0, dropping the oldest line.
    pub fn push(&mut self, line: T) {
        self.lines.pop_back();
        self.lines.push_front(line);
    }

    pub fn capacity(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.lines.get(index)
    }

    /// Lines from newest to oldest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> {
        self.lines.iter()
    }
}

impl<'a, T> IntoIterator for &'a ScrollingBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Buffer shared between the feed driver (writer) and the redraw (reader).
///
/// Each `push` happens under the lock, so readers never observe a partially
/// shifted buffer.
#[derive(Debug, Clone)]
pub struct SharedBuffer {
    inner: Arc<Mutex<ScrollingBuffer>>,
}

impl SharedBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScrollingBuffer::new(capacity))),
        }
    }

    pub fn push(&self, line: DisplayLine) {
        self.lock().push(line);
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Copies the current lines, newest first.
    pub fn snapshot(&self) -> Vec<DisplayLine> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, ScrollingBuffer> {
        // A panic mid-push cannot leave the deque in a torn state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
