//! Serializable configuration for a [`crate::Distrib`].

use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::error::Result;
use crate::ring::DEFAULT_REPLICAS;

/// One configured backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

impl BackendConfig {
    pub fn new(id: impl Into<String>, weight: u32) -> Self {
        Self {
            id: id.into(),
            weight,
        }
    }
}

/// Full distribution configuration.
///
/// Backends are a list rather than a map so their order, which decides the
/// naive ring layout and the `count >= backends` answer, is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistribConfig {
    pub algorithm: Algorithm,
    /// Base replica count per backend (weighted algorithms only).
    pub replicas: u32,
    /// Cached lookups before a wholesale clear; `0` disables the cache.
    pub cache_capacity: usize,
    pub backends: Vec<BackendConfig>,
}

impl Default for DistribConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            replicas: DEFAULT_REPLICAS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            backends: Vec::new(),
        }
    }
}

impl DistribConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Parse a JSON document. An unrecognized algorithm name is reported as
    /// [`crate::Error::UnknownAlgorithm`]; other problems as
    /// [`crate::Error::Config`].
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(name) = value.get("algorithm").and_then(serde_json::Value::as_str) {
            name.parse::<Algorithm>()?;
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `(id, weight)` pairs in configured order.
    pub fn backend_pairs(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.backends.iter().map(|b| (b.id.as_str(), b.weight))
    }
}

fn default_weight() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let config = DistribConfig::default();
        assert_eq!(config.algorithm, Algorithm::Consistent);
        assert_eq!(config.replicas, 256);
        assert_eq!(config.cache_capacity, 256);
        assert!(config.backends.is_empty());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = DistribConfig::from_json(
            r#"{
                "algorithm": "redundant",
                "backends": [
                    {"id": "mc-2", "weight": 3},
                    {"id": "mc-1"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, Algorithm::Redundant);
        assert_eq!(config.replicas, 256);
        assert_eq!(
            config.backend_pairs().collect::<Vec<_>>(),
            vec![("mc-2", 3), ("mc-1", 1)]
        );
    }

    #[test]
    fn test_from_json_unknown_algorithm() {
        let err = DistribConfig::from_json(r#"{"algorithm": "ketama"}"#).unwrap_err();
        assert_eq!(err, Error::UnknownAlgorithm("ketama".into()));
    }

    #[test]
    fn test_from_json_algorithm_any_case() {
        let config = DistribConfig::from_json(r#"{"algorithm": "Consistent"}"#).unwrap();
        assert_eq!(config.algorithm, Algorithm::Consistent);
        let config = DistribConfig::from_json(r#"{"algorithm": "NAIVE"}"#).unwrap();
        assert_eq!(config.algorithm, Algorithm::Naive);
    }

    #[test]
    fn test_from_json_malformed() {
        let err = DistribConfig::from_json(r#"{"replicas": "many"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(matches!(DistribConfig::from_json("[1, 2"), Err(Error::Config(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = DistribConfig::new(Algorithm::Naive);
        config.cache_capacity = 0;
        config.backends.push(BackendConfig::new("a", 2));
        let parsed = DistribConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
