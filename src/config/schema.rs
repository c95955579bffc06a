use crate::scoring::WeightConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default owner when --owner is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Catalog file location (defaults to ~/.config/laptop-rank/catalog.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Criterion weights as fractions totalling 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Criterion;

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
owner: alice
catalog: /tmp/laptops.json
weights:
  price: 0.25
  memory: 0.15
  storage: 0.1
  processor_score: 0.2
  graphics_score: 0.2
  screen_size: 0.05
  rating: 0.05
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.owner.as_deref(), Some("alice"));
        assert_eq!(config.catalog.as_deref(), Some("/tmp/laptops.json"));
        let weights = config.weights.unwrap();
        assert_eq!(weights, WeightConfig::default());
        assert_eq!(weights.weight(Criterion::Storage), Some(0.1));
    }

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("queries: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            owner: Some("bob".to_string()),
            catalog: None,
            weights: Some(WeightConfig::default()),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        assert!(!yaml.contains("catalog"));
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
