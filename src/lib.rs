//! # LogWeave
//!
//! Chronological k-way merge of asynchronously fetched, pre-sorted log sources.
//!
//! Each source hands out its entries in non-decreasing timestamp order, but
//! fetching the next entry can take an arbitrary amount of time. LogWeave
//! merges any number of such sources into a single sink in global timestamp
//! order while prefetching from many sources at once, so that fetch latency is
//! paid per refill round instead of per entry.
//!
//! ## Key Pieces
//!
//! - [`buffer::PriorityBuffer`]: comparator-driven binary min-heap of fetched entries
//! - [`source::LogSource`]: the async contract every input implements
//! - [`capacity::CapacityTracker`]: per-source count of buffered entries
//! - [`scheduler::PrefetchScheduler`]: concurrent, depth-capped refill rounds
//! - [`merge::ChronoMerge`]: the priming and draining loop
//! - [`sink::LogSink`]: where merged entries go
//!
//! ## Quick Start
//!
//! ```rust
//! use logweave::config::MergeConfig;
//! use logweave::merge::merge_sources;
//! use logweave::sinks::VecSink;
//! use logweave::sources::VecSource;
//!
//! # tokio_test::block_on(async {
//! let sources = vec![VecSource::new(vec![2u64, 3]), VecSource::new(vec![1u64, 4])];
//! let mut sink = VecSink::new();
//! merge_sources(sources, &mut sink, MergeConfig::new(2, 1)).await.unwrap();
//! assert_eq!(sink.entries(), &[1, 2, 3, 4]);
//! # });
//! ```

#![deny(missing_docs)]

/// Comparator-driven binary min-heap.
pub mod buffer;
/// Per-source buffered-entry counts.
pub mod capacity;
/// Refill thresholds.
pub mod config;
/// Entry contract and the concrete log entry type.
pub mod entry;
/// Error types.
pub mod error;
/// Tracing subscriber setup.
pub mod logging;
/// The capacity-managed merge driver.
pub mod merge;
/// Batched, concurrent prefetching.
pub mod scheduler;
/// One-fetch-at-a-time reference merge.
pub mod serial;
/// Sink contract.
pub mod sink;
/// Built-in sinks.
pub mod sinks;
/// Source contract.
pub mod source;
/// Built-in sources.
pub mod sources;
/// Per-merge buffer and tracker state.
pub mod state;

pub use config::MergeConfig;
pub use entry::{HasTimestamp, LogEntry};
pub use error::{ConfigError, MergeError, SinkError, SourceError};
pub use merge::{ChronoMerge, MergePhase, MergeStats, merge_sources};
pub use sink::LogSink;
pub use source::{LogSource, SourceId};

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod test_support;
