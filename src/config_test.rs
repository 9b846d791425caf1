use crate::config::MergeConfig;
use crate::error::ConfigError;

#[test]
fn test_default_config_is_valid() {
  let config = MergeConfig::default();
  assert_eq!(config.name, "merge");
  assert_eq!(config.max_depth, 32);
  assert_eq!(config.low_water, 4);
  assert_eq!(config.medium_water, 16);
  assert!(config.validate().is_ok());
}

#[test]
fn test_new_places_medium_between_low_and_max() {
  assert_eq!(MergeConfig::new(10, 2).medium_water, 6);
  assert_eq!(MergeConfig::new(2, 1).medium_water, 1);
  assert!(MergeConfig::new(2, 1).validate().is_ok());
}

#[test]
fn test_new_does_not_overflow_at_extreme_depth() {
  let config = MergeConfig::new(usize::MAX, 1);
  assert_eq!(config.medium_water, 1 + (usize::MAX - 1) / 2);
  assert!(config.validate().is_ok());
}

#[test]
fn test_builder_setters() {
  let config = MergeConfig::default()
    .with_name("k8s")
    .with_max_depth(6)
    .with_low_water(2)
    .with_medium_water(3);
  assert_eq!(config.name, "k8s");
  assert_eq!((config.max_depth, config.low_water, config.medium_water), (6, 2, 3));
  assert!(config.validate().is_ok());
}

#[test]
fn test_zero_low_water_rejected() {
  let config = MergeConfig::new(4, 0);
  assert!(matches!(config.validate(), Err(ConfigError::ZeroLowWater)));
}

#[test]
fn test_low_must_be_below_max() {
  let config = MergeConfig::default().with_max_depth(4).with_low_water(4).with_medium_water(4);
  assert!(matches!(
    config.validate(),
    Err(ConfigError::LowNotBelowMax { low: 4, max: 4 })
  ));
}

#[test]
fn test_medium_out_of_range_rejected() {
  let above = MergeConfig::new(8, 2).with_medium_water(9);
  assert!(matches!(
    above.validate(),
    Err(ConfigError::MediumOutOfRange { medium: 9, .. })
  ));
  let below = MergeConfig::new(8, 2).with_medium_water(1);
  assert!(matches!(
    below.validate(),
    Err(ConfigError::MediumOutOfRange { medium: 1, .. })
  ));
}

#[test]
fn test_json_missing_fields_take_defaults() {
  let config = MergeConfig::from_json_str(r#"{"name": "edge"}"#).unwrap();
  assert_eq!(config, MergeConfig::default().with_name("edge"));
}

#[test]
fn test_json_invalid_thresholds_rejected() {
  let err = MergeConfig::from_json_str(r#"{"max_depth": 2, "low_water": 3}"#).unwrap_err();
  assert!(matches!(err, ConfigError::LowNotBelowMax { .. }));
}

#[test]
fn test_json_syntax_error_reported() {
  let err = MergeConfig::from_json_str("{max_depth").unwrap_err();
  assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_config_serializes_round_trip() {
  let config = MergeConfig::new(12, 3).with_name("round");
  let text = serde_json::to_string(&config).unwrap();
  assert_eq!(MergeConfig::from_json_str(&text).unwrap(), config);
}
