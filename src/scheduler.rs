//! # Prefetch Scheduler
//!
//! Fills the merge's priority buffer in concurrent rounds.
//!
//! ## Rounds
//!
//! [`PrefetchScheduler::fill_times`] runs up to `n` rounds over a requested set
//! of sources. In each round every requested source that is undrained and
//! holds fewer than `max_depth` buffered entries is advanced once, and all of
//! those fetches are in flight together. The round is a barrier: nothing is
//! inserted until the whole batch has settled, and results are then inserted
//! in source order from the single thread that owns the buffer.
//!
//! For each participating source the round snapshots the current `latest`
//! entry, then issues the fetch for the entry after it. The snapshot is what
//! gets buffered, so the buffer always holds the entry that was current before
//! the fetch, regardless of when that fetch settles.
//!
//! A round fails as soon as any fetch fails; the error aborts the merge.

use crate::error::{MergeError, SourceError};
use crate::source::{LogSource, SourceId};
use crate::state::MergeState;
use futures::future::try_join_all;
use tracing::{debug, error};

/// Drives batched, concurrent advancement of sources into a [`MergeState`].
#[derive(Clone, Debug)]
pub struct PrefetchScheduler {
  max_depth: usize,
  rounds: u64,
  fetches: u64,
}

impl PrefetchScheduler {
  /// Creates a scheduler that never buffers more than `max_depth` entries per source.
  pub fn new(max_depth: usize) -> Self {
    Self {
      max_depth,
      rounds: 0,
      fetches: 0,
    }
  }

  /// Rounds issued so far.
  pub fn rounds(&self) -> u64 {
    self.rounds
  }

  /// Individual `advance` calls issued so far, including first loads.
  pub fn fetches(&self) -> u64 {
    self.fetches
  }

  /// Runs up to `times` refill rounds over `wanted`.
  ///
  /// Stops early once no requested source is eligible, so a request for
  /// drained or already-full sources issues no fetches at all.
  ///
  /// A source whose `latest` is still empty is advanced twice in its first
  /// round, one load and one prefetch back to back, so that round waits on
  /// two fetch latencies for it. Both calls are counted in
  /// [`fetches`](Self::fetches).
  pub async fn fill_times<S: LogSource>(
    &mut self,
    sources: &mut [S],
    wanted: &[SourceId],
    times: usize,
    state: &mut MergeState<S::Entry>,
  ) -> Result<(), MergeError> {
    let mut requested = vec![false; sources.len()];
    for id in wanted {
      requested[id.index()] = true;
    }

    for round in 0..times {
      for (i, source) in sources.iter().enumerate() {
        if requested[i] && source.is_drained() {
          state.mark_drained(SourceId(i));
        }
      }
      let eligible: Vec<bool> = (0..sources.len())
        .map(|i| {
          let id = SourceId(i);
          requested[i]
            && !state.tracker().is_drained(id)
            && state.tracker().count(id) < self.max_depth
        })
        .collect();
      let batch = eligible.iter().filter(|e| **e).count();
      if batch == 0 {
        break;
      }

      debug!(round, batch, buffered = state.len(), "refill round");
      let fetches = sources
        .iter_mut()
        .enumerate()
        .filter(|(i, _)| eligible[*i])
        .map(|(i, source)| pull(SourceId(i), source));
      let settled = try_join_all(fetches).await?;

      self.rounds += 1;

      for (id, entry, advances) in settled {
        self.fetches += advances;
        if let Some(entry) = entry {
          state.push(id, entry);
        }
        if sources[id.index()].is_drained() {
          state.mark_drained(id);
        }
      }
    }
    Ok(())
  }
}

/// Takes `source`'s current entry and fetches the one after it.
async fn pull<S: LogSource>(
  id: SourceId,
  source: &mut S,
) -> Result<(SourceId, Option<S::Entry>, u64), MergeError> {
  match take_and_advance(source).await {
    Ok((entry, advances)) => Ok((id, entry, advances)),
    Err(err) => {
      let name = source.name();
      error!(source = %id, name = %name, error = %err, "source fetch failed");
      Err(MergeError::Source {
        source_id: id,
        name,
        error: err,
      })
    }
  }
}

/// Returns the entry taken and the number of `advance` calls it cost.
async fn take_and_advance<S: LogSource>(
  source: &mut S,
) -> Result<(Option<S::Entry>, u64), SourceError> {
  if source.is_drained() {
    return Ok((None, 0));
  }
  let mut advances = 0;
  if source.latest().is_none() {
    // first touch of a lazily-loaded source
    source.advance().await?;
    advances += 1;
  }
  let Some(current) = source.latest().cloned() else {
    return Ok((None, advances));
  };
  source.advance().await?;
  Ok((Some(current), advances + 1))
}
