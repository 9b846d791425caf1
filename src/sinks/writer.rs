//! Writer sink for rendering merged entries as text or JSON lines.
//!
//! [`WriterSink`] writes one line per emitted entry to any [`io::Write`]:
//! either the entry's `Display` form ([`OutputFormat::Text`]) or its serde
//! JSON form ([`OutputFormat::JsonLines`]). On completion it flushes the
//! writer and logs a summary of what was printed.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use logweave::entry::LogEntry;
//! use logweave::sink::LogSink;
//! use logweave::sinks::{OutputFormat, WriterSink};
//!
//! let mut sink = WriterSink::new(Vec::new()).with_format(OutputFormat::JsonLines);
//! sink.emit(LogEntry::new(Utc.timestamp_opt(0, 0).unwrap(), "boot")).unwrap();
//! LogSink::<LogEntry>::complete(&mut sink).unwrap();
//! let out = String::from_utf8(sink.into_inner()).unwrap();
//! assert!(out.contains("\"msg\":\"boot\""));
//! ```

use crate::entry::HasTimestamp;
use crate::error::SinkError;
use crate::sink::LogSink;
use serde::Serialize;
use std::fmt;
use std::io::{self, BufWriter, Stdout, Write};
use std::time::{Duration, Instant};
use tracing::info;

/// Line format used by [`WriterSink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
  /// `Display` rendering, one entry per line.
  #[default]
  Text,
  /// Serde JSON rendering, one object per line.
  JsonLines,
}

/// Summary of what a [`WriterSink`] printed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrintStats {
  /// Entries written.
  pub printed: u64,
  /// Time between the first emission and completion.
  pub elapsed: Duration,
}

impl PrintStats {
  /// Elapsed time in whole milliseconds, saturating at `u64::MAX`.
  pub fn elapsed_ms(&self) -> u64 {
    u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
  }

  /// Entries per second over [`elapsed`](Self::elapsed).
  pub fn rate(&self) -> f64 {
    let secs = self.elapsed.as_secs_f64();
    if secs > 0.0 {
      self.printed as f64 / secs
    } else {
      0.0
    }
  }
}

/// Sink that renders entries to an [`io::Write`].
pub struct WriterSink<W: Write> {
  writer: W,
  format: OutputFormat,
  printed: u64,
  started: Option<Instant>,
  stats: Option<PrintStats>,
}

impl WriterSink<BufWriter<Stdout>> {
  /// A buffered sink over standard output.
  pub fn stdout() -> Self {
    Self::new(BufWriter::new(io::stdout()))
  }
}

impl<W: Write> WriterSink<W> {
  /// Creates a text-format sink over `writer`.
  pub fn new(writer: W) -> Self {
    Self {
      writer,
      format: OutputFormat::default(),
      printed: 0,
      started: None,
      stats: None,
    }
  }

  /// Sets the line format.
  #[must_use]
  pub fn with_format(mut self, format: OutputFormat) -> Self {
    self.format = format;
    self
  }

  /// Entries written so far.
  pub fn printed(&self) -> u64 {
    self.printed
  }

  /// Summary recorded at completion, if the sink has completed.
  pub fn stats(&self) -> Option<&PrintStats> {
    self.stats.as_ref()
  }

  /// Returns the underlying writer.
  pub fn into_inner(self) -> W {
    self.writer
  }
}

impl<E, W> LogSink<E> for WriterSink<W>
where
  E: HasTimestamp + Serialize + fmt::Display,
  W: Write,
{
  fn emit(&mut self, entry: E) -> Result<(), SinkError> {
    if self.stats.is_some() {
      return Err(SinkError::AlreadyComplete);
    }
    self.started.get_or_insert_with(Instant::now);
    match self.format {
      OutputFormat::Text => writeln!(self.writer, "{entry}")?,
      OutputFormat::JsonLines => {
        serde_json::to_writer(&mut self.writer, &entry)?;
        self.writer.write_all(b"\n")?;
      }
    }
    self.printed += 1;
    Ok(())
  }

  fn complete(&mut self) -> Result<(), SinkError> {
    if self.stats.is_some() {
      return Err(SinkError::AlreadyComplete);
    }
    self.writer.flush()?;
    let stats = PrintStats {
      printed: self.printed,
      elapsed: self.started.map(|s| s.elapsed()).unwrap_or_default(),
    };
    info!(
      printed = stats.printed,
      elapsed_ms = stats.elapsed_ms(),
      rate = stats.rate(),
      "output complete"
    );
    self.stats = Some(stats);
    Ok(())
  }
}
