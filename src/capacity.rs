//! # Capacity Tracker
//!
//! Per-merge count of how many entries each source currently has sitting in
//! the priority buffer. Counts move in lockstep with the buffer: incremented
//! on every insertion, decremented on every removal, never recomputed.
//!
//! The tracker also remembers each source's drained flag and the deepest it
//! has ever been buffered, which the merge reports in its stats.

use crate::source::SourceId;

/// Buffered-entry counts indexed by [`SourceId`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapacityTracker {
  counts: Vec<usize>,
  high_water: Vec<usize>,
  drained: Vec<bool>,
}

impl CapacityTracker {
  /// Creates a tracker for `sources` sources, all at zero.
  pub fn new(sources: usize) -> Self {
    Self {
      counts: vec![0; sources],
      high_water: vec![0; sources],
      drained: vec![false; sources],
    }
  }

  /// Number of tracked sources.
  pub fn sources(&self) -> usize {
    self.counts.len()
  }

  /// Buffered entries for `id`.
  #[inline]
  pub fn count(&self, id: SourceId) -> usize {
    self.counts[id.index()]
  }

  /// Highest buffered count ever observed for `id`.
  pub fn high_water(&self, id: SourceId) -> usize {
    self.high_water[id.index()]
  }

  /// Highest buffered count of every source, in source order.
  pub fn high_water_marks(&self) -> &[usize] {
    &self.high_water
  }

  /// Current buffered count of every source, in source order.
  pub fn counts(&self) -> &[usize] {
    &self.counts
  }

  /// Records one more buffered entry for `id`.
  pub fn increment(&mut self, id: SourceId) {
    let count = &mut self.counts[id.index()];
    *count += 1;
    let high = &mut self.high_water[id.index()];
    *high = (*high).max(*count);
  }

  /// Records one fewer buffered entry for `id` and returns the new count.
  pub fn decrement(&mut self, id: SourceId) -> usize {
    let count = &mut self.counts[id.index()];
    debug_assert!(*count > 0, "decrement below zero for source {id}");
    *count = count.saturating_sub(1);
    *count
  }

  /// Whether `id` has been observed exhausted.
  #[inline]
  pub fn is_drained(&self, id: SourceId) -> bool {
    self.drained[id.index()]
  }

  /// Marks `id` exhausted. Idempotent.
  pub fn mark_drained(&mut self, id: SourceId) {
    self.drained[id.index()] = true;
  }

  /// Undrained sources whose count is strictly below `threshold`, in source order.
  pub fn below(&self, threshold: usize) -> Vec<SourceId> {
    self
      .counts
      .iter()
      .enumerate()
      .filter(|(i, count)| !self.drained[*i] && **count < threshold)
      .map(|(i, _)| SourceId(i))
      .collect()
  }

  /// Total buffered entries across all sources.
  pub fn total(&self) -> usize {
    self.counts.iter().sum()
  }

  /// Sources that are neither drained nor represented in the buffer.
  ///
  /// Between emissions this is empty whenever the buffer is non-empty.
  pub fn starved(&self) -> Vec<SourceId> {
    self.below(1)
  }
}
