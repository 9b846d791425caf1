//! # Log Sink Trait
//!
//! A [`LogSink`] receives the merged output. The merge calls
//! [`emit`](LogSink::emit) once per entry in non-decreasing timestamp order and
//! [`complete`](LogSink::complete) exactly once after the last emission of a
//! successful run. A failed run never calls `complete`.
//!
//! Concrete sinks live in [`crate::sinks`].

use crate::error::SinkError;

/// Destination for merged entries.
pub trait LogSink<E> {
  /// Accepts the next entry in merged order. Ownership of the entry passes to the sink.
  fn emit(&mut self, entry: E) -> Result<(), SinkError>;

  /// Signals that no further entries will be emitted.
  fn complete(&mut self) -> Result<(), SinkError>;
}

impl<E, K: LogSink<E> + ?Sized> LogSink<E> for &mut K {
  fn emit(&mut self, entry: E) -> Result<(), SinkError> {
    (**self).emit(entry)
  }

  fn complete(&mut self) -> Result<(), SinkError> {
    (**self).complete()
  }
}
