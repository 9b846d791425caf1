//! Sources used only by the unit tests.

use crate::entry::HasTimestamp;
use crate::error::SourceError;
use crate::source::LogSource;
use crate::sources::VecSource;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Replays entries, then fails on the `fail_on`-th fetch (1-based).
pub struct FailingSource {
  inner: VecSource<u64>,
  fail_on: usize,
  calls: usize,
}

impl FailingSource {
  pub fn new(entries: Vec<u64>, fail_on: usize) -> Self {
    Self {
      inner: VecSource::new(entries).with_name("flaky"),
      fail_on,
      calls: 0,
    }
  }
}

#[async_trait]
impl LogSource for FailingSource {
  type Entry = u64;

  fn latest(&self) -> Option<&u64> {
    self.inner.latest()
  }

  fn is_drained(&self) -> bool {
    self.inner.is_drained()
  }

  async fn advance(&mut self) -> Result<Option<u64>, SourceError> {
    self.calls += 1;
    if self.calls == self.fail_on {
      return Err(SourceError::fetch("backend unavailable"));
    }
    self.inner.advance().await
  }

  fn name(&self) -> String {
    self.inner.name()
  }
}

/// Counts fetches in flight across every source sharing it.
#[derive(Default)]
pub struct FetchProbe {
  in_flight: AtomicUsize,
  peak: AtomicUsize,
  total: AtomicUsize,
}

impl FetchProbe {
  pub fn peak(&self) -> usize {
    self.peak.load(Ordering::SeqCst)
  }

  pub fn total(&self) -> usize {
    self.total.load(Ordering::SeqCst)
  }
}

/// A latency-bearing source that reports its fetches to a shared probe.
pub struct ProbedSource<E> {
  inner: VecSource<E>,
  probe: Arc<FetchProbe>,
}

impl<E> ProbedSource<E> {
  pub fn new(entries: Vec<E>, latency: Duration, probe: Arc<FetchProbe>) -> Self {
    Self {
      inner: VecSource::new(entries).with_latency(latency),
      probe,
    }
  }
}

#[async_trait]
impl<E> LogSource for ProbedSource<E>
where
  E: HasTimestamp + Clone + Send + Sync + 'static,
{
  type Entry = E;

  fn latest(&self) -> Option<&E> {
    self.inner.latest()
  }

  fn is_drained(&self) -> bool {
    self.inner.is_drained()
  }

  async fn advance(&mut self) -> Result<Option<E>, SourceError> {
    let now = self.probe.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    self.probe.peak.fetch_max(now, Ordering::SeqCst);
    self.probe.total.fetch_add(1, Ordering::SeqCst);
    let result = self.inner.advance().await;
    self.probe.in_flight.fetch_sub(1, Ordering::SeqCst);
    result
  }
}

/// Sorted per-source timestamp lists, e.g. `[[1, 4, 7], [2, 5, 8]]`.
pub fn vec_sources(lists: &[&[u64]]) -> Vec<VecSource<u64>> {
  lists.iter().map(|l| VecSource::new(l.to_vec())).collect()
}
