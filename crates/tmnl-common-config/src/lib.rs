//! Configuration types for the tmnl layer system.
//!
//! This crate provides the configuration used by `tmnl-layers`, read from
//! `.tmnl/layers.yaml` files with `TMNL_*` environment overrides.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config_has_sensible_values() {
        let config = LayerSystemConfig::default();

        assert_eq!(config.ids.strategy, IdStrategy::RandomToken);
        assert_eq!(config.z_index.min, -1000);
        assert_eq!(config.z_index.max, 10000);
        assert_eq!(config.z_index.resort_gap, 10);
        assert!(!config.lifecycle.stop_machine_on_remove);
        assert!(!config.lifecycle.clamp_resort_to_bounds);
        assert_eq!(config.lifecycle.resort_dispatch, ResortDispatchMode::Inline);
    }

    #[test]
    fn test_config_serializes_to_yaml() {
        let yaml = serde_yaml::to_string(&LayerSystemConfig::default()).unwrap();

        assert!(yaml.contains("ids:"));
        assert!(yaml.contains("strategy: random-token"));
        assert!(yaml.contains("resort_gap: 10"));
        assert!(yaml.contains("resort_dispatch: inline"));
    }

    #[test]
    fn test_partial_configs_merge_with_defaults() {
        let partial_yaml = r#"
z_index:
  resort_gap: 50
"#;

        let config: LayerSystemConfig = serde_yaml::from_str(partial_yaml).unwrap();

        assert_eq!(config.z_index.resort_gap, 50);
        assert_eq!(config.z_index.max, 10000);
        assert_eq!(config.ids.strategy, IdStrategy::RandomToken);
    }

    #[test_case("random-token", IdStrategy::RandomToken ; "canonical token name")]
    #[test_case("nanoid", IdStrategy::RandomToken ; "nanoid alias")]
    #[test_case("UUID", IdStrategy::Uuid ; "case insensitive")]
    #[test_case("custom", IdStrategy::Custom ; "custom")]
    #[test_case("", IdStrategy::Unrecognized ; "empty")]
    #[test_case("ulid", IdStrategy::Unrecognized ; "unknown name")]
    fn test_id_strategy_parse(input: &str, expected: IdStrategy) {
        assert_eq!(IdStrategy::parse(input), expected);
    }
}
