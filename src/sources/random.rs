//! Synthetic log source for demos and load tests.
//!
//! [`RandomSource`] starts somewhere 40 to 60 days before its horizon and walks
//! forward by up to ten hours plus up to a minute per entry until it passes
//! the horizon, at which point it is drained. Every fetch sleeps for a random
//! few milliseconds so that many sources together behave like slow remote
//! backends.

use crate::entry::LogEntry;
use crate::error::SourceError;
use crate::source::LogSource;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

const WORDS: &[&str] = &[
  "cache", "miss", "request", "served", "worker", "restarted", "disk", "pressure", "lease",
  "renewed", "upstream", "timeout", "retrying", "shard", "rebalanced", "token", "expired",
  "queue", "backlog", "cleared",
];

/// Random-walk generator of [`LogEntry`]s.
#[derive(Debug)]
pub struct RandomSource {
  rng: StdRng,
  latest: Option<LogEntry>,
  drained: bool,
  horizon: DateTime<Utc>,
  max_latency: Duration,
  name: String,
}

impl RandomSource {
  /// Creates a source ending at the current time, seeded from entropy.
  pub fn new() -> Self {
    Self::from_rng(StdRng::from_entropy(), Utc::now())
  }

  /// Creates a reproducible source ending at `horizon`.
  pub fn seeded(seed: u64, horizon: DateTime<Utc>) -> Self {
    Self::from_rng(StdRng::seed_from_u64(seed), horizon)
  }

  fn from_rng(mut rng: StdRng, horizon: DateTime<Utc>) -> Self {
    let start = horizon - ChronoDuration::days(rng.gen_range(40..=60));
    let msg = sentence(&mut rng);
    Self {
      rng,
      latest: Some(LogEntry::new(start, msg)),
      drained: false,
      horizon,
      max_latency: Duration::from_millis(8),
      name: "random".to_string(),
    }
  }

  /// Caps the random per-fetch delay. `Duration::ZERO` disables it.
  #[must_use]
  pub fn with_max_latency(mut self, max_latency: Duration) -> Self {
    self.max_latency = max_latency;
    self
  }

  /// Sets the name reported in logs and errors.
  #[must_use]
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  fn next_entry(&mut self, after: DateTime<Utc>) -> LogEntry {
    let step = ChronoDuration::hours(self.rng.gen_range(0..=10))
      + ChronoDuration::milliseconds(self.rng.gen_range(0..=60_000));
    LogEntry::new(after + step, sentence(&mut self.rng))
  }
}

impl Default for RandomSource {
  fn default() -> Self {
    Self::new()
  }
}

fn sentence(rng: &mut StdRng) -> String {
  let words = rng.gen_range(3..=6);
  (0..words)
    .map(|_| WORDS[rng.gen_range(0..WORDS.len())])
    .collect::<Vec<_>>()
    .join(" ")
}

#[async_trait]
impl LogSource for RandomSource {
  type Entry = LogEntry;

  fn latest(&self) -> Option<&LogEntry> {
    self.latest.as_ref()
  }

  fn is_drained(&self) -> bool {
    self.drained
  }

  async fn advance(&mut self) -> Result<Option<LogEntry>, SourceError> {
    let Some(current) = self.latest.as_ref().map(|e| e.date) else {
      return Ok(None);
    };
    if !self.max_latency.is_zero() {
      let max_ms = u64::try_from(self.max_latency.as_millis()).unwrap_or(u64::MAX);
      let delay = Duration::from_millis(self.rng.gen_range(0..=max_ms));
      tokio::time::sleep(delay).await;
    }
    let next = self.next_entry(current);
    if next.date > self.horizon {
      self.latest = None;
      self.drained = true;
      return Ok(None);
    }
    self.latest = Some(next.clone());
    Ok(Some(next))
  }

  fn name(&self) -> String {
    self.name.clone()
  }
}
