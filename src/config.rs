//! # Merge Configuration
//!
//! [`MergeConfig`] carries the three thresholds that govern prefetching:
//!
//! - **`max_depth`** (`MAX`): ceiling on entries buffered per source. Bounds memory.
//! - **`low_water`** (`LOW`): when a source drops below this after an emission,
//!   a refill batch is issued. Each eligible source is topped up by at most
//!   `low_water` fetches.
//! - **`medium_water`**: sources below this threshold join the refill batch.
//!   Sitting between `LOW` and `MAX`, it lets many sources be refilled in one
//!   concurrent round instead of one at a time.
//!
//! ## Example
//!
//! ```rust
//! use logweave::config::MergeConfig;
//!
//! let config = MergeConfig::new(8, 2).with_name("edge-logs");
//! assert_eq!(config.medium_water, 5);
//! assert!(config.validate().is_ok());
//!
//! let parsed = MergeConfig::from_json_str(r#"{"max_depth": 4, "low_water": 1, "medium_water": 2}"#)
//!   .unwrap();
//! assert_eq!(parsed.max_depth, 4);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Refill thresholds and naming for one merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
  /// Name used for the tracing span of a merge run.
  pub name: String,
  /// Maximum buffered entries per source.
  pub max_depth: usize,
  /// Refill trigger threshold.
  pub low_water: usize,
  /// Refill eligibility threshold.
  pub medium_water: usize,
}

impl Default for MergeConfig {
  fn default() -> Self {
    Self {
      name: "merge".to_string(),
      max_depth: 32,
      low_water: 4,
      medium_water: 16,
    }
  }
}

impl MergeConfig {
  /// Creates a config with the given ceiling and trigger, placing the medium
  /// threshold halfway between them.
  pub fn new(max_depth: usize, low_water: usize) -> Self {
    Self {
      max_depth,
      low_water,
      medium_water: low_water + max_depth.saturating_sub(low_water) / 2,
      ..Self::default()
    }
  }

  /// Parses a JSON config. Missing fields take their defaults.
  pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
    let config: Self = serde_json::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  /// Sets the name.
  #[must_use]
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// Sets the maximum buffered depth per source.
  #[must_use]
  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }

  /// Sets the refill trigger threshold.
  #[must_use]
  pub fn with_low_water(mut self, low_water: usize) -> Self {
    self.low_water = low_water;
    self
  }

  /// Sets the refill eligibility threshold.
  #[must_use]
  pub fn with_medium_water(mut self, medium_water: usize) -> Self {
    self.medium_water = medium_water;
    self
  }

  /// Checks `1 <= low_water < max_depth` and `low_water <= medium_water <= max_depth`.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.low_water == 0 {
      return Err(ConfigError::ZeroLowWater);
    }
    if self.low_water >= self.max_depth {
      return Err(ConfigError::LowNotBelowMax {
        low: self.low_water,
        max: self.max_depth,
      });
    }
    if self.medium_water < self.low_water || self.medium_water > self.max_depth {
      return Err(ConfigError::MediumOutOfRange {
        low: self.low_water,
        medium: self.medium_water,
        max: self.max_depth,
      });
    }
    Ok(())
  }
}
