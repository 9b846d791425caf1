//! Built-in log sources.

/// Sources fed by a tokio mpsc channel.
pub mod channel;
/// Synthetic `LogEntry` generator with random pacing.
pub mod random;
/// Per-fetch deadline wrapper.
pub mod timeout;
/// In-memory sources.
pub mod vec;

pub use channel::ChannelSource;
pub use random::RandomSource;
pub use timeout::TimeoutSource;
pub use vec::VecSource;
