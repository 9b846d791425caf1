//! # Merge State
//!
//! [`MergeState`] is the mutable state of exactly one merge run: the priority
//! buffer of fetched entries and the capacity tracker that counts them per
//! source. It is created by the merge driver, lent to the prefetch scheduler
//! for each refill, and dropped when the run ends. Nothing about it is global.
//!
//! Every mutation goes through [`push`](MergeState::push) and
//! [`pop`](MergeState::pop), which keep the buffer and the tracker in step.

use crate::buffer::{BufferedEntry, ByTimestamp, PriorityBuffer};
use crate::capacity::CapacityTracker;
use crate::entry::HasTimestamp;
use crate::source::SourceId;

/// Most entries per source reserved when a merge starts.
pub const PRESIZE_DEPTH: usize = 64;

/// Point-in-time view of buffered depth, handed to merge observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferSnapshot {
  /// Buffered entries per source, in source order.
  pub counts: Vec<usize>,
  /// Drained flag per source, in source order.
  pub drained: Vec<bool>,
  /// Total buffered entries.
  pub buffered: usize,
}

impl BufferSnapshot {
  /// Undrained sources with nothing buffered.
  pub fn starved(&self) -> Vec<SourceId> {
    self
      .counts
      .iter()
      .zip(&self.drained)
      .enumerate()
      .filter(|(_, (count, drained))| **count == 0 && !**drained)
      .map(|(i, _)| SourceId(i))
      .collect()
  }

  /// Whether every undrained source has at least one buffered entry, or the
  /// buffer is empty altogether.
  pub fn is_covered(&self) -> bool {
    self.buffered == 0 || self.starved().is_empty()
  }

  /// Deepest per-source count in this snapshot.
  pub fn deepest(&self) -> usize {
    self.counts.iter().copied().max().unwrap_or(0)
  }
}

/// Buffer and capacity tracker owned by a single merge.
#[derive(Debug)]
pub struct MergeState<E> {
  buffer: PriorityBuffer<BufferedEntry<E>, ByTimestamp>,
  tracker: CapacityTracker,
  next_seq: u64,
}

impl<E: HasTimestamp> MergeState<E> {
  /// Creates empty state for `sources` sources.
  ///
  /// `max_depth` is only a ceiling, so the up-front reservation is capped at
  /// [`PRESIZE_DEPTH`] entries per source.
  pub fn new(sources: usize, max_depth: usize) -> Self {
    let reserve = sources.saturating_mul(max_depth.min(PRESIZE_DEPTH));
    Self {
      buffer: PriorityBuffer::with_capacity(reserve, ByTimestamp),
      tracker: CapacityTracker::new(sources),
      next_seq: 0,
    }
  }

  /// Read access to the capacity tracker.
  pub fn tracker(&self) -> &CapacityTracker {
    &self.tracker
  }

  /// Marks a source exhausted.
  pub fn mark_drained(&mut self, id: SourceId) {
    self.tracker.mark_drained(id);
  }

  /// Buffers `entry` for `id` and counts it.
  pub fn push(&mut self, id: SourceId, entry: E) {
    let seq = self.next_seq;
    self.next_seq += 1;
    self.buffer.insert(BufferedEntry::new(id, seq, entry));
    self.tracker.increment(id);
  }

  /// Removes the earliest buffered entry and uncounts it.
  pub fn pop(&mut self) -> Option<BufferedEntry<E>> {
    let item = self.buffer.remove_min()?;
    self.tracker.decrement(item.source_id);
    Some(item)
  }

  /// Total buffered entries.
  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  /// Whether nothing is buffered.
  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  /// Copies the current per-source counts and drained flags.
  pub fn snapshot(&self) -> BufferSnapshot {
    BufferSnapshot {
      counts: self.tracker.counts().to_vec(),
      drained: (0..self.tracker.sources())
        .map(|i| self.tracker.is_drained(SourceId(i)))
        .collect(),
      buffered: self.buffer.len(),
    }
  }
}
