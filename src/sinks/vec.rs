use crate::error::SinkError;
use crate::sink::LogSink;

/// A sink that collects emitted entries into a `Vec`.
///
/// Entries are stored in the order they are emitted. The sink also counts how
/// often [`complete`](LogSink::complete) was called, so callers can check the
/// exactly-once contract.
#[derive(Clone, Debug)]
pub struct VecSink<E> {
  entries: Vec<E>,
  completions: usize,
  strict: bool,
}

impl<E> Default for VecSink<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E> VecSink<E> {
  /// Creates an empty sink that rejects emissions after completion.
  pub fn new() -> Self {
    Self {
      entries: Vec::new(),
      completions: 0,
      strict: true,
    }
  }

  /// Creates an empty sink with room for `capacity` entries.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      entries: Vec::with_capacity(capacity),
      ..Self::new()
    }
  }

  /// Accepts calls after completion instead of failing, so repeated
  /// completions can be counted.
  #[must_use]
  pub fn lenient(mut self) -> Self {
    self.strict = false;
    self
  }

  /// Entries emitted so far.
  pub fn entries(&self) -> &[E] {
    &self.entries
  }

  /// Number of `complete` calls received.
  pub fn completions(&self) -> usize {
    self.completions
  }

  /// Whether `complete` has been called.
  pub fn is_complete(&self) -> bool {
    self.completions > 0
  }

  /// Consumes the sink and returns the collected entries.
  pub fn into_vec(self) -> Vec<E> {
    self.entries
  }
}

impl<E> LogSink<E> for VecSink<E> {
  fn emit(&mut self, entry: E) -> Result<(), SinkError> {
    if self.strict && self.is_complete() {
      return Err(SinkError::AlreadyComplete);
    }
    self.entries.push(entry);
    Ok(())
  }

  fn complete(&mut self) -> Result<(), SinkError> {
    if self.strict && self.is_complete() {
      return Err(SinkError::AlreadyComplete);
    }
    self.completions += 1;
    Ok(())
  }
}
