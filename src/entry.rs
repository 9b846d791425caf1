//! # Log Entries
//!
//! The merge core knows exactly one thing about an entry: it carries a totally
//! ordered timestamp. [`HasTimestamp`] is that contract; everything else about
//! the payload is opaque and simply handed to the sink on emission.
//!
//! [`LogEntry`] is the concrete record used by the bundled sources and sinks:
//! a wall-clock `date` plus a free-form message.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use logweave::entry::{HasTimestamp, LogEntry};
//!
//! let entry = LogEntry::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap(), "disk full");
//! assert_eq!(entry.timestamp(), entry.date);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload types that expose a comparable timestamp.
///
/// Entries produced by a single source must be non-decreasing by
/// [`timestamp`](HasTimestamp::timestamp). That ordering is assumed, never
/// checked.
pub trait HasTimestamp {
  /// The ordering key. Must be a total order.
  type Timestamp: Ord + Copy + fmt::Debug + Send + Sync + 'static;

  /// Returns the timestamp used to order this entry against others.
  fn timestamp(&self) -> Self::Timestamp;
}

/// A single timestamped log line.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
  /// When the line was logged.
  pub date: DateTime<Utc>,
  /// The rendered log message.
  pub msg: String,
}

impl LogEntry {
  /// Creates a new entry.
  pub fn new(date: DateTime<Utc>, msg: impl Into<String>) -> Self {
    Self {
      date,
      msg: msg.into(),
    }
  }
}

impl HasTimestamp for LogEntry {
  type Timestamp = DateTime<Utc>;

  #[inline]
  fn timestamp(&self) -> DateTime<Utc> {
    self.date
  }
}

impl fmt::Display for LogEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.date.to_rfc3339(), self.msg)
  }
}

// Bare integers are handy as timestamps in tests and synthetic workloads.
macro_rules! impl_has_timestamp_for_int {
  ($($t:ty),*) => {
    $(
      impl HasTimestamp for $t {
        type Timestamp = $t;

        #[inline]
        fn timestamp(&self) -> $t {
          *self
        }
      }
    )*
  };
}

impl_has_timestamp_for_int!(u32, u64, i32, i64, usize);

impl<T, P> HasTimestamp for (T, P)
where
  T: Ord + Copy + fmt::Debug + Send + Sync + 'static,
{
  type Timestamp = T;

  #[inline]
  fn timestamp(&self) -> T {
    self.0
  }
}
