//! # Priority Buffer
//!
//! Comparator-driven binary min-heap holding the entries that have been
//! fetched from sources but not yet emitted.
//!
//! ## Overview
//!
//! [`PriorityBuffer`] is generic over a [`Comparator`] rather than over an
//! entry type, so the same heap orders plain integers in tests and
//! [`BufferedEntry`] pairs in the merge. Both [`insert`](PriorityBuffer::insert)
//! and [`remove_min`](PriorityBuffer::remove_min) run in `O(log n)`; that is
//! the only per-entry cost on the merge's hot path.
//!
//! ## Example
//!
//! ```rust
//! use logweave::buffer::PriorityBuffer;
//!
//! let mut buffer = PriorityBuffer::new(|a: &u32, b: &u32| a.cmp(b));
//! for n in [5, 1, 4, 2, 3] {
//!   buffer.insert(n);
//! }
//! let drained: Vec<u32> = std::iter::from_fn(|| buffer.remove_min()).collect();
//! assert_eq!(drained, vec![1, 2, 3, 4, 5]);
//! ```

use crate::entry::HasTimestamp;
use crate::source::SourceId;
use std::cmp::Ordering;
use std::fmt;

/// Total ordering capability used by [`PriorityBuffer`].
pub trait Comparator<T> {
  /// Compares two items; `Less` means `a` is removed before `b`.
  fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
  F: Fn(&T, &T) -> Ordering,
{
  #[inline]
  fn compare(&self, a: &T, b: &T) -> Ordering {
    self(a, b)
  }
}

/// A fetched entry paired with the source it came from.
///
/// `seq` is assigned by the merge at insertion time and breaks ties between
/// entries of the same source that share a timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferedEntry<E> {
  /// Source that produced the entry.
  pub source_id: SourceId,
  /// Insertion sequence number.
  pub seq: u64,
  /// The entry itself.
  pub entry: E,
}

impl<E> BufferedEntry<E> {
  /// Creates a new buffered pairing.
  pub fn new(source_id: SourceId, seq: u64, entry: E) -> Self {
    Self {
      source_id,
      seq,
      entry,
    }
  }
}

/// Orders [`BufferedEntry`]s by `(timestamp, source_id, seq)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByTimestamp;

impl<E: HasTimestamp> Comparator<BufferedEntry<E>> for ByTimestamp {
  #[inline]
  fn compare(&self, a: &BufferedEntry<E>, b: &BufferedEntry<E>) -> Ordering {
    a.entry
      .timestamp()
      .cmp(&b.entry.timestamp())
      .then_with(|| a.source_id.cmp(&b.source_id))
      .then_with(|| a.seq.cmp(&b.seq))
  }
}

/// Binary min-heap ordered by a [`Comparator`].
pub struct PriorityBuffer<T, C> {
  heap: Vec<T>,
  cmp: C,
}

impl<T: fmt::Debug, C> fmt::Debug for PriorityBuffer<T, C> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PriorityBuffer")
      .field("len", &self.heap.len())
      .field("heap", &self.heap)
      .finish()
  }
}

impl<T, C: Comparator<T>> PriorityBuffer<T, C> {
  /// Creates an empty buffer ordered by `cmp`.
  pub fn new(cmp: C) -> Self {
    Self {
      heap: Vec::new(),
      cmp,
    }
  }

  /// Creates an empty buffer with room for `capacity` items.
  pub fn with_capacity(capacity: usize, cmp: C) -> Self {
    Self {
      heap: Vec::with_capacity(capacity),
      cmp,
    }
  }

  /// Number of buffered items.
  #[inline]
  pub fn len(&self) -> usize {
    self.heap.len()
  }

  /// Returns `true` when nothing is buffered.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.heap.is_empty()
  }

  /// Returns the minimum item without removing it.
  #[inline]
  pub fn peek(&self) -> Option<&T> {
    self.heap.first()
  }

  /// Iterates over buffered items in heap (not sorted) order.
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.heap.iter()
  }

  /// Appends `item` and sifts it up to its place.
  pub fn insert(&mut self, item: T) {
    self.heap.push(item);
    self.sift_up(self.heap.len() - 1);
  }

  /// Removes and returns the minimum item.
  pub fn remove_min(&mut self) -> Option<T> {
    if self.heap.is_empty() {
      return None;
    }
    let last = self.heap.len() - 1;
    self.heap.swap(0, last);
    let min = self.heap.pop();
    self.sift_down(0);
    min
  }

  fn sift_up(&mut self, mut index: usize) {
    while index > 0 {
      let parent = (index - 1) / 2;
      if self.cmp.compare(&self.heap[parent], &self.heap[index]) != Ordering::Greater {
        break;
      }
      self.heap.swap(parent, index);
      index = parent;
    }
  }

  fn sift_down(&mut self, mut index: usize) {
    let len = self.heap.len();
    loop {
      let left = 2 * index + 1;
      if left >= len {
        break;
      }
      let right = left + 1;
      let mut lesser = left;
      if right < len && self.cmp.compare(&self.heap[right], &self.heap[left]) == Ordering::Less {
        lesser = right;
      }
      if self.cmp.compare(&self.heap[index], &self.heap[lesser]) != Ordering::Greater {
        break;
      }
      self.heap.swap(index, lesser);
      index = lesser;
    }
  }
}
