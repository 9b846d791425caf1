//! Structured logging setup.
//!
//! The library only emits `tracing` events; binaries decide where they go.
//! [`init_tracing`] installs a `tracing_subscriber` fmt subscriber that writes
//! to stderr, leaving stdout free for merged output.

use tracing::Level;

/// Installs a global fmt subscriber at `level`.
///
/// Returns `false` if a global subscriber was already installed, which makes
/// repeated calls from tests harmless.
pub fn init_tracing(level: Level) -> bool {
  tracing_subscriber::fmt()
    .with_max_level(level)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init()
    .is_ok()
}
