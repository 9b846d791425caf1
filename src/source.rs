//! # Log Source Trait
//!
//! This module defines [`LogSource`], the contract every input of a merge
//! satisfies, and [`SourceId`], the index a merge uses to refer to one of its
//! sources.
//!
//! ## State model
//!
//! A source holds at most one fetched-but-unconsumed entry, its
//! [`latest`](LogSource::latest). [`advance`](LogSource::advance) is a
//! suspending call that replaces `latest` with the next entry, or clears it and
//! marks the source drained once the stream is exhausted. `drained` only ever
//! goes from `false` to `true`.
//!
//! A source may start with `latest` already loaded (the usual case for an
//! in-memory source) or empty; the merge advances an empty, undrained source
//! once before reading from it.
//!
//! Distinct sources must not share mutable state: the merge advances many of
//! them concurrently through disjoint `&mut` borrows.
//!
//! ## Example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use logweave::error::SourceError;
//! use logweave::source::LogSource;
//!
//! struct Countdown {
//!   latest: Option<u64>,
//! }
//!
//! #[async_trait]
//! impl LogSource for Countdown {
//!   type Entry = u64;
//!
//!   fn latest(&self) -> Option<&u64> {
//!     self.latest.as_ref()
//!   }
//!
//!   fn is_drained(&self) -> bool {
//!     self.latest.is_none()
//!   }
//!
//!   async fn advance(&mut self) -> Result<Option<u64>, SourceError> {
//!     self.latest = self.latest.and_then(|n| n.checked_sub(1));
//!     Ok(self.latest)
//!   }
//! }
//! ```

use crate::entry::HasTimestamp;
use crate::error::SourceError;
use async_trait::async_trait;
use std::fmt;

/// Position of a source within the set handed to a merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(pub usize);

impl SourceId {
  /// Returns the raw index.
  #[inline]
  pub const fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for SourceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// An ordered, exhaustible stream of timestamped entries.
#[async_trait]
pub trait LogSource: Send {
  /// The entry type produced by this source.
  type Entry: HasTimestamp + Clone + Send + Sync + 'static;

  /// The most recently fetched entry that has not been consumed yet.
  fn latest(&self) -> Option<&Self::Entry>;

  /// Whether the source has been exhausted.
  fn is_drained(&self) -> bool;

  /// Fetches the next entry and makes it the new [`latest`](Self::latest).
  ///
  /// Resolves to `Ok(None)` and marks the source drained once no entries
  /// remain. Calling `advance` on a drained source keeps returning `Ok(None)`.
  async fn advance(&mut self) -> Result<Option<Self::Entry>, SourceError>;

  /// A short name for logs and error reports.
  fn name(&self) -> String {
    std::any::type_name::<Self>()
      .rsplit("::")
      .next()
      .unwrap_or("source")
      .to_string()
  }
}

#[async_trait]
impl<S: LogSource + ?Sized> LogSource for Box<S> {
  type Entry = S::Entry;

  fn latest(&self) -> Option<&Self::Entry> {
    (**self).latest()
  }

  fn is_drained(&self) -> bool {
    (**self).is_drained()
  }

  async fn advance(&mut self) -> Result<Option<Self::Entry>, SourceError> {
    (**self).advance().await
  }

  fn name(&self) -> String {
    (**self).name()
  }
}
