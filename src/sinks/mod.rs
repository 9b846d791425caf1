//! Built-in sinks.

/// In-memory collecting sink.
pub mod vec;
/// Text and JSON-lines sink over any `io::Write`.
pub mod writer;

pub use vec::VecSink;
pub use writer::{OutputFormat, WriterSink};
