//! # Chronological Merge
//!
//! [`ChronoMerge`] merges many independently paced, individually sorted log
//! sources into one sink in non-decreasing timestamp order, while paying
//! fetch latency once per refill round rather than once per entry.
//!
//! ## Phases
//!
//! - **Priming**: every source is filled to `max_depth` buffered entries in
//!   concurrent rounds.
//! - **Draining**: the earliest buffered entry is removed and emitted. If that
//!   leaves its source below `low_water`, every source below `medium_water` is
//!   topped up by up to `low_water` more entries in one concurrent batch.
//!
//! The run ends when the buffer is empty. Drained sources never re-enter the
//! buffer, so an empty buffer means every source has been fully emitted. The
//! sink's `complete` is then called exactly once.
//!
//! ## Ordering
//!
//! The merge only sees buffered entries. It therefore keeps at least one
//! entry buffered for every undrained source whenever anything is buffered at
//! all: the source that just lost an entry is always below `low_water` when it
//! reaches zero, and is refilled before the next removal. Ties are broken by
//! source index, which makes the output identical to
//! [`serial_merge`](crate::serial::serial_merge).
//!
//! ## Example
//!
//! ```rust
//! use logweave::config::MergeConfig;
//! use logweave::merge::ChronoMerge;
//! use logweave::sinks::VecSink;
//! use logweave::sources::VecSource;
//!
//! # tokio_test::block_on(async {
//! let sources = vec![
//!   VecSource::new(vec![1u64, 4, 7]),
//!   VecSource::new(vec![2u64, 5, 8]),
//!   VecSource::new(vec![3u64, 6, 9]),
//! ];
//! let mut sink = VecSink::new();
//! let stats = ChronoMerge::new(sources)
//!   .with_config(MergeConfig::new(4, 1))
//!   .run(&mut sink)
//!   .await
//!   .unwrap();
//!
//! assert_eq!(sink.entries(), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
//! assert_eq!(stats.emitted, 9);
//! # });
//! ```

use crate::config::MergeConfig;
use crate::entry::HasTimestamp;
use crate::error::MergeError;
use crate::scheduler::PrefetchScheduler;
use crate::sink::LogSink;
use crate::source::{LogSource, SourceId};
use crate::state::{BufferSnapshot, MergeState};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, trace};

/// Stage of a merge run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePhase {
  /// Initial fill of every source to `max_depth`.
  Priming,
  /// Steady-state remove, emit and refill loop.
  Draining,
  /// Buffer empty, sink completed.
  Complete,
}

impl fmt::Display for MergePhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MergePhase::Priming => write!(f, "priming"),
      MergePhase::Draining => write!(f, "draining"),
      MergePhase::Complete => write!(f, "complete"),
    }
  }
}

/// Counters from one completed merge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergeStats {
  /// Entries emitted to the sink.
  pub emitted: u64,
  /// Refill rounds issued, priming included.
  pub rounds: u64,
  /// Rounds issued after priming.
  pub refill_rounds: u64,
  /// Individual source fetches issued.
  pub fetches: u64,
  /// Deepest buffered count reached by each source.
  pub high_water: Vec<usize>,
  /// Wall time of the run.
  pub elapsed: Duration,
}

impl MergeStats {
  /// Wall time in whole milliseconds, saturating at `u64::MAX`.
  pub fn elapsed_ms(&self) -> u64 {
    u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
  }

  /// Emitted entries per second.
  pub fn rate(&self) -> f64 {
    let secs = self.elapsed.as_secs_f64();
    if secs > 0.0 {
      self.emitted as f64 / secs
    } else {
      0.0
    }
  }
}

type Observer = Box<dyn FnMut(&BufferSnapshot) + Send>;

/// Capacity-managed k-way merge over a fixed set of sources.
pub struct ChronoMerge<S: LogSource> {
  sources: Vec<S>,
  config: MergeConfig,
  observer: Option<Observer>,
}

impl<S: LogSource> ChronoMerge<S> {
  /// Creates a merge over `sources` with the default config.
  pub fn new(sources: Vec<S>) -> Self {
    Self {
      sources,
      config: MergeConfig::default(),
      observer: None,
    }
  }

  /// Replaces the config.
  #[must_use]
  pub fn with_config(mut self, config: MergeConfig) -> Self {
    self.config = config;
    self
  }

  /// Registers a callback that sees the buffer's per-source depth after
  /// every emission, once any refill it triggered has settled.
  #[must_use]
  pub fn with_observer<F>(mut self, observer: F) -> Self
  where
    F: FnMut(&BufferSnapshot) + Send + 'static,
  {
    self.observer = Some(Box::new(observer));
    self
  }

  /// The config this merge will run with.
  pub fn config(&self) -> &MergeConfig {
    &self.config
  }

  /// Runs the merge to completion, emitting every entry into `sink`.
  ///
  /// Fails without calling `sink.complete()` if the config is invalid, if any
  /// source fetch fails, or if the sink rejects an entry.
  pub async fn run<K>(self, sink: &mut K) -> Result<MergeStats, MergeError>
  where
    K: LogSink<S::Entry> + ?Sized,
  {
    self.config.validate()?;
    let span = info_span!("merge", name = %self.config.name, sources = self.sources.len());
    self.drive(sink).instrument(span).await
  }

  async fn drive<K>(self, sink: &mut K) -> Result<MergeStats, MergeError>
  where
    K: LogSink<S::Entry> + ?Sized,
  {
    let Self {
      mut sources,
      config,
      mut observer,
    } = self;
    let started = Instant::now();
    let mut state = MergeState::new(sources.len(), config.max_depth);
    let mut scheduler = PrefetchScheduler::new(config.max_depth);
    let mut emitted = 0u64;

    let mut phase = MergePhase::Priming;
    info!(%phase, max_depth = config.max_depth, low_water = config.low_water, "merge started");
    let everyone: Vec<SourceId> = (0..sources.len()).map(SourceId).collect();
    scheduler
      .fill_times(&mut sources, &everyone, config.max_depth, &mut state)
      .await?;
    let priming_rounds = scheduler.rounds();

    phase = MergePhase::Draining;
    debug!(%phase, buffered = state.len(), rounds = priming_rounds, "priming finished");
    while let Some(item) = state.pop() {
      let id = item.source_id;
      trace!(source = %id, seq = item.seq, timestamp = ?item.entry.timestamp(), "emit");
      sink.emit(item.entry)?;
      emitted += 1;

      if state.tracker().count(id) < config.low_water {
        let low = state.tracker().below(config.medium_water);
        scheduler
          .fill_times(&mut sources, &low, config.low_water, &mut state)
          .await?;
      }
      if let Some(observer) = observer.as_mut() {
        observer(&state.snapshot());
      }
    }

    sink.complete()?;
    phase = MergePhase::Complete;

    let stats = MergeStats {
      emitted,
      rounds: scheduler.rounds(),
      refill_rounds: scheduler.rounds() - priming_rounds,
      fetches: scheduler.fetches(),
      high_water: state.tracker().high_water_marks().to_vec(),
      elapsed: started.elapsed(),
    };
    info!(
      %phase,
      emitted = stats.emitted,
      rounds = stats.rounds,
      fetches = stats.fetches,
      elapsed_ms = stats.elapsed_ms(),
      "merge finished"
    );
    Ok(stats)
  }
}

/// Merges `sources` into `sink` with `config`.
pub async fn merge_sources<S, K>(
  sources: Vec<S>,
  sink: &mut K,
  config: MergeConfig,
) -> Result<MergeStats, MergeError>
where
  S: LogSource,
  K: LogSink<S::Entry> + ?Sized,
{
  ChronoMerge::new(sources).with_config(config).run(sink).await
}
