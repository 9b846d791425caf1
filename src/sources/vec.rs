use crate::entry::HasTimestamp;
use crate::error::SourceError;
use crate::source::LogSource;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

/// A source that replays entries from memory.
///
/// [`new`](VecSource::new) loads the first entry eagerly, the way a source
/// backed by an already-open file would. [`lazy`](VecSource::lazy) leaves
/// `latest` empty until the first fetch. An optional fixed latency is slept
/// on every fetch to mimic a remote backend.
#[derive(Clone, Debug)]
pub struct VecSource<E> {
  pending: VecDeque<E>,
  latest: Option<E>,
  drained: bool,
  latency: Option<Duration>,
  fetches: usize,
  name: String,
}

impl<E> VecSource<E> {
  /// Creates a source whose first entry is already loaded.
  pub fn new(entries: impl IntoIterator<Item = E>) -> Self {
    let mut pending: VecDeque<E> = entries.into_iter().collect();
    let latest = pending.pop_front();
    Self {
      drained: latest.is_none(),
      pending,
      latest,
      latency: None,
      fetches: 0,
      name: "vec".to_string(),
    }
  }

  /// Creates a source that loads its first entry on the first fetch.
  pub fn lazy(entries: impl IntoIterator<Item = E>) -> Self {
    Self {
      pending: entries.into_iter().collect(),
      latest: None,
      drained: false,
      latency: None,
      fetches: 0,
      name: "vec".to_string(),
    }
  }

  /// Sleeps `latency` on every fetch.
  #[must_use]
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = Some(latency);
    self
  }

  /// Sets the name reported in logs and errors.
  #[must_use]
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// Number of `advance` calls served so far.
  pub fn fetches(&self) -> usize {
    self.fetches
  }

  /// Entries not yet handed out, excluding `latest`.
  pub fn remaining(&self) -> usize {
    self.pending.len()
  }
}

#[async_trait]
impl<E> LogSource for VecSource<E>
where
  E: HasTimestamp + Clone + Send + Sync + 'static,
{
  type Entry = E;

  fn latest(&self) -> Option<&E> {
    self.latest.as_ref()
  }

  fn is_drained(&self) -> bool {
    self.drained
  }

  async fn advance(&mut self) -> Result<Option<E>, SourceError> {
    if self.drained {
      return Ok(None);
    }
    if let Some(latency) = self.latency {
      tokio::time::sleep(latency).await;
    }
    self.fetches += 1;
    self.latest = self.pending.pop_front();
    self.drained = self.latest.is_none();
    Ok(self.latest.clone())
  }

  fn name(&self) -> String {
    self.name.clone()
  }
}
