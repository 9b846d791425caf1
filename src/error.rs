//! # Error Handling
//!
//! Error types for the merge and its collaborators.
//!
//! ## Taxonomy
//!
//! - **Source exhaustion** is not an error. A source signals it by returning
//!   `Ok(None)` from [`advance`](crate::source::LogSource::advance).
//! - **Fetch failure** ([`SourceError`]) is fatal to the whole merge. The merge
//!   does not skip or retry a failing source; retry policy belongs to the
//!   source itself.
//! - **Sink failure** ([`SinkError`]) is likewise fatal.
//! - **Configuration errors** ([`ConfigError`]) are reported before any fetch
//!   is issued.
//!
//! Every merge-level failure is wrapped in [`MergeError`].

use crate::source::SourceId;
use std::time::Duration;

/// Failure of a single source fetch.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
  /// The backing store reported a failure.
  #[error("fetch failed: {message}")]
  Fetch {
    /// Human-readable failure description.
    message: String,
  },
  /// The fetch did not settle before its deadline.
  #[error("fetch timed out after {after:?}")]
  Timeout {
    /// The deadline that elapsed.
    after: Duration,
  },
  /// The upstream feeding this source went away without finishing cleanly.
  #[error("source closed unexpectedly")]
  Closed,
  /// I/O failure while reading the source.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl SourceError {
  /// Convenience constructor for [`SourceError::Fetch`].
  pub fn fetch(message: impl Into<String>) -> Self {
    Self::Fetch {
      message: message.into(),
    }
  }
}

/// Failure while rendering or finalizing output.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
  /// Writing to the underlying writer failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),
  /// Entry could not be serialized.
  #[error("failed to serialize entry: {0}")]
  Serialize(#[from] serde_json::Error),
  /// `emit` or `complete` was called after `complete`.
  #[error("sink already completed")]
  AlreadyComplete,
}

/// Invalid merge configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// `low_water` must be at least one, or a drained-to-zero source would never refill.
  #[error("low_water must be at least 1")]
  ZeroLowWater,
  /// `low_water` must be strictly below `max_depth`.
  #[error("low_water ({low}) must be below max_depth ({max})")]
  LowNotBelowMax {
    /// Configured low-water mark.
    low: usize,
    /// Configured maximum depth.
    max: usize,
  },
  /// `medium_water` must lie in `low_water..=max_depth`.
  #[error("medium_water ({medium}) must lie between low_water ({low}) and max_depth ({max})")]
  MediumOutOfRange {
    /// Configured low-water mark.
    low: usize,
    /// Configured medium threshold.
    medium: usize,
    /// Configured maximum depth.
    max: usize,
  },
  /// Configuration text could not be parsed.
  #[error("invalid merge config: {0}")]
  Parse(#[from] serde_json::Error),
}

/// Fatal failure of a merge run.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
  /// The merge was configured with inconsistent thresholds.
  #[error(transparent)]
  Config(#[from] ConfigError),
  /// A source's fetch failed.
  #[error("source {source_id} ({name}) failed: {error}")]
  Source {
    /// Index of the failing source.
    source_id: SourceId,
    /// Source name, for diagnostics.
    name: String,
    /// Underlying fetch failure.
    #[source]
    error: SourceError,
  },
  /// The sink rejected an emission or completion.
  #[error(transparent)]
  Sink(#[from] SinkError),
}
