//! # Serial Merge
//!
//! The straightforward merge: look at every source's `latest`, emit the
//! earliest, advance that one source, repeat. Each emitted entry waits for one
//! fetch, so total latency grows with the number of entries rather than with
//! the number of refill rounds.
//!
//! It is kept as the reference ordering for [`ChronoMerge`](crate::merge::ChronoMerge):
//! both select by `(timestamp, source index)` and therefore produce the same
//! sequence for the same inputs.

use crate::entry::HasTimestamp;
use crate::error::{MergeError, SourceError};
use crate::sink::LogSink;
use crate::source::{LogSource, SourceId};
use tracing::{debug, info};

/// Merges `sources` into `sink` one fetch at a time. Returns the number of
/// entries emitted.
pub async fn serial_merge<S, K>(sources: Vec<S>, sink: &mut K) -> Result<u64, MergeError>
where
  S: LogSource,
  K: LogSink<S::Entry> + ?Sized,
{
  let mut active: Vec<(SourceId, S)> = Vec::with_capacity(sources.len());
  for (i, mut source) in sources.into_iter().enumerate() {
    let id = SourceId(i);
    if source.latest().is_none() && !source.is_drained() {
      source
        .advance()
        .await
        .map_err(|error| source_error(id, &source, error))?;
    }
    if !source.is_drained() {
      active.push((id, source));
    }
  }

  let mut emitted = 0u64;
  while let Some(index) = earliest(&active) {
    let (id, source) = &mut active[index];
    let id = *id;
    let Some(entry) = source.latest().cloned() else {
      active.remove(index);
      continue;
    };
    // the fetch is issued before the emission so a slow sink overlaps it
    let next = source.advance();
    sink.emit(entry)?;
    next.await.map_err(|error| source_error(id, &active[index].1, error))?;
    emitted += 1;

    if active[index].1.is_drained() {
      debug!(source = %id, "source drained");
      active.remove(index);
    }
  }

  sink.complete()?;
  info!(emitted, "serial merge finished");
  Ok(emitted)
}

fn earliest<S: LogSource>(active: &[(SourceId, S)]) -> Option<usize> {
  active
    .iter()
    .enumerate()
    .filter_map(|(i, (id, source))| source.latest().map(|e| (i, (e.timestamp(), *id))))
    .min_by(|(_, a), (_, b)| a.cmp(b))
    .map(|(i, _)| i)
}

fn source_error<S: LogSource>(id: SourceId, source: &S, error: SourceError) -> MergeError {
  MergeError::Source {
    source_id: id,
    name: source.name(),
    error,
  }
}
