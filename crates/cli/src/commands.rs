//! CLI commands.

use std::fmt;

use anyhow::{bail, Result};
use clap::Subcommand;
use distrib::{Algorithm, BackendId, Distrib, DistribConfig};
use tracing::info;

const BAR_WIDTH: usize = 50;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Map generated keys and print how they spread over the backends.
    Histogram {
        /// Number of keys to map.
        #[arg(short, long, default_value_t = 10_000)]
        keys: usize,
        /// Key prefix; keys are PREFIX1..PREFIXN.
        #[arg(short, long, default_value = "key:")]
        prefix: String,
    },
    /// Print the backends for each key.
    Lookup {
        #[arg(required = true)]
        keys: Vec<String>,
        /// Number of distinct backends to return (redundant).
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Rebuild without one backend and count keys whose primary moved.
    Disruption {
        /// Backend to remove.
        #[arg(short, long)]
        remove: String,
        /// Number of keys to compare.
        #[arg(short, long, default_value_t = 10_000)]
        keys: usize,
    },
}

/// One histogram line.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramRow {
    pub backend: BackendId,
    pub weight: u32,
    /// Share of the keyspace the weight asks for.
    pub expected: f64,
    pub hits: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Histogram {
        algorithm: Algorithm,
        keys: usize,
        rows: Vec<HistogramRow>,
    },
    Lookup(Vec<(String, Vec<BackendId>)>),
    Disruption {
        algorithm: Algorithm,
        removed: String,
        keys: usize,
        moved: usize,
    },
}

impl Command {
    pub fn execute(&self, config: &DistribConfig) -> Result<CommandResult> {
        let distrib = Distrib::from_config(config)?;
        match self {
            Command::Histogram { keys, prefix } => Ok(histogram(&distrib, *keys, prefix)),
            Command::Lookup { keys, count } => Ok(CommandResult::Lookup(
                keys.iter()
                    .map(|key| (key.clone(), distrib.map(key, *count)))
                    .collect(),
            )),
            Command::Disruption { remove, keys } => disruption(config, &distrib, remove, *keys),
        }
    }
}

fn generated_keys(prefix: &str, n: usize) -> impl Iterator<Item = String> + '_ {
    (1..=n).map(move |i| format!("{}{}", prefix, i))
}

fn histogram(distrib: &Distrib, keys: usize, prefix: &str) -> CommandResult {
    let backends = distrib.backends();
    let mut hits = vec![0usize; backends.len()];
    for key in generated_keys(prefix, keys) {
        let primary = distrib.lookup(&key);
        if let Some(index) = backends.position(primary.as_str()) {
            hits[index] += 1;
        }
    }

    let total_weight = backends.total_weight() as f64;
    let rows = backends
        .iter()
        .zip(hits)
        .map(|(backend, hits)| HistogramRow {
            backend: backend.id.clone(),
            weight: backend.weight,
            expected: f64::from(backend.weight) / total_weight,
            hits,
        })
        .collect();

    CommandResult::Histogram {
        algorithm: distrib.algorithm(),
        keys,
        rows,
    }
}

fn disruption(
    config: &DistribConfig,
    before: &Distrib,
    remove: &str,
    keys: usize,
) -> Result<CommandResult> {
    if before.backends().position(remove).is_none() {
        bail!("backend {:?} is not configured", remove);
    }
    if before.backends().len() == 1 {
        bail!("cannot remove the only backend");
    }

    let mut reduced = config.clone();
    reduced.backends.retain(|b| b.id != remove);
    let after = Distrib::from_config(&reduced)?;

    let moved = generated_keys("key:", keys)
        .filter(|key| before.lookup(key) != after.lookup(key))
        .count();
    info!(removed = remove, keys, moved, "compared rings");

    Ok(CommandResult::Disruption {
        algorithm: config.algorithm,
        removed: remove.to_string(),
        keys,
        moved,
    })
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Histogram {
                algorithm,
                keys,
                rows,
            } => {
                writeln!(f, "{} keys, algorithm {}", keys, algorithm)?;
                let max_hits = rows.iter().map(|r| r.hits).max().unwrap_or(0).max(1);
                for row in rows {
                    let bar = "#".repeat(row.hits * BAR_WIDTH / max_hits);
                    writeln!(
                        f,
                        "{:<20} w={:<5} expected {:>5.1}%  got {:>6} ({:>5.1}%)  {}",
                        row.backend,
                        row.weight,
                        row.expected * 100.0,
                        row.hits,
                        percent(row.hits, *keys),
                        bar
                    )?;
                }
                Ok(())
            }
            CommandResult::Lookup(results) => {
                for (key, backends) in results {
                    let names: Vec<&str> = backends.iter().map(BackendId::as_str).collect();
                    writeln!(f, "{} -> {}", key, names.join(", "))?;
                }
                Ok(())
            }
            CommandResult::Disruption {
                algorithm,
                removed,
                keys,
                moved,
            } => writeln!(
                f,
                "{}: removing {} moved {} of {} keys ({:.1}%)",
                algorithm,
                removed,
                moved,
                keys,
                percent(*moved, *keys)
            ),
        }
    }
}
