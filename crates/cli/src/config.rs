//! Command-line configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use distrib::{Algorithm, BackendConfig, DistribConfig, DEFAULT_CACHE_CAPACITY, DEFAULT_REPLICAS};
use tracing::{debug, Level};

use crate::commands::Command;

/// Backends used when none are given on the command line or in a file.
pub const SAMPLE_BACKENDS: [(&str, u32); 5] =
    [("A", 10), ("B", 20), ("C", 20), ("D", 10), ("E", 15)];

/// Map keys onto weighted backends.
#[derive(Debug, Parser)]
#[command(name = "distrib", version, about)]
pub struct CliConfig {
    /// Distribution algorithm: naive, consistent or redundant.
    #[arg(short, long, global = true, default_value = "consistent")]
    pub algorithm: Algorithm,

    /// Base replicas per backend for the weighted ring.
    #[arg(long, global = true, default_value_t = DEFAULT_REPLICAS)]
    pub replicas: u32,

    /// Cached lookups before the cache is cleared; 0 disables caching.
    #[arg(long, global = true, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    /// Backend as ID=WEIGHT (weight defaults to 1). Repeatable, order matters.
    #[arg(
        short,
        long = "backend",
        global = true,
        value_name = "ID=WEIGHT",
        value_parser = parse_backend
    )]
    pub backends: Vec<BackendConfig>,

    /// JSON configuration file. Replaces all ring flags when given.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let config = self.distrib_config()?;
        debug!(
            algorithm = %config.algorithm,
            backends = config.backends.len(),
            replicas = config.replicas,
            "resolved configuration"
        );

        let result = self.command.execute(&config)?;
        println!("{}", result);
        Ok(())
    }

    /// Ring configuration from `--config` or from the individual flags.
    pub fn distrib_config(&self) -> Result<DistribConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                DistribConfig::from_json(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => DistribConfig {
                algorithm: self.algorithm,
                replicas: self.replicas,
                cache_capacity: self.cache_capacity,
                backends: self.backends.clone(),
            },
        };

        if config.backends.is_empty() {
            config.backends = SAMPLE_BACKENDS
                .iter()
                .map(|(id, weight)| BackendConfig::new(*id, *weight))
                .collect();
        }
        Ok(config)
    }
}

/// Parse `ID=WEIGHT`. The id may itself contain `:` (host:port).
pub fn parse_backend(s: &str) -> std::result::Result<BackendConfig, String> {
    let (id, weight) = match s.rsplit_once('=') {
        Some((id, weight)) => {
            let weight = weight
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid weight in {:?}: {}", s, e))?;
            (id.trim(), weight)
        }
        None => (s.trim(), 1),
    };
    if id.is_empty() {
        return Err(format!("missing backend id in {:?}", s));
    }
    Ok(BackendConfig::new(id, weight))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!(
            parse_backend("10.0.0.1:11211=20").unwrap(),
            BackendConfig::new("10.0.0.1:11211", 20)
        );
        assert_eq!(parse_backend("cache-a").unwrap(), BackendConfig::new("cache-a", 1));
        assert!(parse_backend("a=heavy").is_err());
        assert!(parse_backend("=3").is_err());
    }

    #[test]
    fn test_flags_build_config() {
        let cli = CliConfig::try_parse_from([
            "distrib",
            "--algorithm",
            "redundant",
            "--replicas",
            "64",
            "-b",
            "x=2",
            "-b",
            "y=3",
            "lookup",
            "some-key",
        ])
        .unwrap();
        let config = cli.distrib_config().unwrap();
        assert_eq!(config.algorithm, Algorithm::Redundant);
        assert_eq!(config.replicas, 64);
        assert_eq!(
            config.backends,
            vec![BackendConfig::new("x", 2), BackendConfig::new("y", 3)]
        );
    }

    #[test]
    fn test_sample_backends_by_default() {
        let cli = CliConfig::try_parse_from(["distrib", "histogram"]).unwrap();
        let config = cli.distrib_config().unwrap();
        assert_eq!(config.algorithm, Algorithm::Consistent);
        assert_eq!(config.backends.len(), SAMPLE_BACKENDS.len());
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let err = CliConfig::try_parse_from(["distrib", "-a", "ketama", "histogram"]).unwrap_err();
        assert!(err.to_string().contains("unknown algorithm"));
    }

    #[test]
    fn test_config_file() {
        let path = std::env::temp_dir().join(format!("distrib-cli-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"algorithm": "naive", "backends": [{"id": "m1", "weight": 4}]}"#,
        )
        .unwrap();

        let cli = CliConfig::try_parse_from([
            "distrib",
            "--config",
            path.to_str().unwrap(),
            "histogram",
        ])
        .unwrap();
        let config = cli.distrib_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.algorithm, Algorithm::Naive);
        assert_eq!(config.backends, vec![BackendConfig::new("m1", 4)]);
    }
}
