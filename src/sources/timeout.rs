//! Deadline wrapper for slow sources.
//!
//! The merge itself never times out a fetch: a hung source stalls its refill
//! round indefinitely. [`TimeoutSource`] is an opt-in extension at the source
//! boundary for environments that prefer a bounded failure. When the inner
//! fetch does not settle in time, `advance` fails with
//! [`SourceError::Timeout`], which aborts the merge like any other fetch
//! failure.

use crate::error::SourceError;
use crate::source::LogSource;
use async_trait::async_trait;
use std::time::Duration;

/// Wraps a source and bounds each `advance` by a deadline.
#[derive(Debug)]
pub struct TimeoutSource<S> {
  inner: S,
  deadline: Duration,
}

impl<S> TimeoutSource<S> {
  /// Wraps `inner`, failing any fetch that takes longer than `deadline`.
  pub fn new(inner: S, deadline: Duration) -> Self {
    Self { inner, deadline }
  }

  /// Returns the wrapped source.
  pub fn into_inner(self) -> S {
    self.inner
  }
}

#[async_trait]
impl<S: LogSource> LogSource for TimeoutSource<S> {
  type Entry = S::Entry;

  fn latest(&self) -> Option<&S::Entry> {
    self.inner.latest()
  }

  fn is_drained(&self) -> bool {
    self.inner.is_drained()
  }

  async fn advance(&mut self) -> Result<Option<S::Entry>, SourceError> {
    tokio::time::timeout(self.deadline, self.inner.advance())
      .await
      .map_err(|_| SourceError::Timeout {
        after: self.deadline,
      })?
  }

  fn name(&self) -> String {
    self.inner.name()
  }
}
