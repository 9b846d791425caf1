use crate::entry::HasTimestamp;
use crate::error::SourceError;
use crate::source::LogSource;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// A source fed by a tokio mpsc channel.
///
/// The producer side sends `Ok(entry)` for each entry in timestamp order, or
/// an `Err` to fail the source. Dropping every sender ends the source. The
/// source starts empty and waits for its first entry on the first fetch.
pub struct ChannelSource<E> {
  rx: mpsc::Receiver<Result<E, SourceError>>,
  latest: Option<E>,
  drained: bool,
  name: String,
}

impl<E> ChannelSource<E> {
  /// Wraps an existing receiver.
  pub fn new(rx: mpsc::Receiver<Result<E, SourceError>>) -> Self {
    Self {
      rx,
      latest: None,
      drained: false,
      name: "channel".to_string(),
    }
  }

  /// Creates a bounded channel and returns its sender alongside the source.
  pub fn bounded(capacity: usize) -> (mpsc::Sender<Result<E, SourceError>>, Self) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, Self::new(rx))
  }

  /// Sets the name reported in logs and errors.
  #[must_use]
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }
}

#[async_trait]
impl<E> LogSource for ChannelSource<E>
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
    match self.rx.recv().await {
      Some(Ok(entry)) => {
        self.latest = Some(entry.clone());
        Ok(Some(entry))
      }
      Some(Err(err)) => Err(err),
      None => {
        self.latest = None;
        self.drained = true;
        Ok(None)
      }
    }
  }

  fn name(&self) -> String {
    self.name.clone()
  }
}
