//! Distribution algorithms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Strategy used to map keys to backends. Fixed for the lifetime of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Algorithm {
    /// `|crc| mod Σweights` over a flat ring. No consistency across
    /// topology changes.
    Naive,
    /// Weighted consistent hashing, one backend per key.
    #[default]
    Consistent,
    /// Weighted consistent hashing, several distinct backends per key.
    Redundant,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Naive, Algorithm::Consistent, Algorithm::Redundant];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Naive => "naive",
            Algorithm::Consistent => "consistent",
            Algorithm::Redundant => "redundant",
        }
    }

    /// True for the algorithms backed by the sliced weighted ring.
    pub fn is_weighted(&self) -> bool {
        !matches!(self, Algorithm::Naive)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for Algorithm {
    type Error = Error;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_algorithms() {
        assert_eq!("naive".parse::<Algorithm>().unwrap(), Algorithm::Naive);
        assert_eq!("Consistent".parse::<Algorithm>().unwrap(), Algorithm::Consistent);
        assert_eq!(" REDUNDANT ".parse::<Algorithm>().unwrap(), Algorithm::Redundant);
    }

    #[test]
    fn test_parse_unknown_algorithm() {
        assert_eq!(
            "ketama".parse::<Algorithm>().unwrap_err(),
            Error::UnknownAlgorithm("ketama".into())
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Algorithm::Redundant).unwrap();
        assert_eq!(json, "\"redundant\"");
        let parsed: Algorithm = serde_json::from_str("\"naive\"").unwrap();
        assert_eq!(parsed, Algorithm::Naive);
    }

    #[test]
    fn test_serde_accepts_any_case() {
        let parsed: Algorithm = serde_json::from_str("\"Consistent\"").unwrap();
        assert_eq!(parsed, Algorithm::Consistent);
        let err = serde_json::from_str::<Algorithm>("\"ketama\"").unwrap_err();
        assert!(err.to_string().contains("unknown algorithm: ketama"));
    }
}
