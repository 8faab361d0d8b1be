//! Ring construction.

use tracing::{debug, warn};

use super::layout::{normalize_replicas, SliceLayout, DEFAULT_REPLICAS};
use super::naive::NaiveRing;
use super::weighted::WeightedRing;
use super::Ring;
use crate::algorithm::Algorithm;
use crate::backend::BackendSet;
use crate::error::{Error, Result};
use crate::replica::{replica_count, Replica};

/// Builds an immutable [`Ring`] from a backend set.
///
/// # Example
///
/// ```rust
/// use distrib::{Algorithm, BackendSet, RingBuilder};
///
/// let backends = BackendSet::from_pairs([("a", 1), ("b", 2)]).unwrap();
/// let ring = RingBuilder::new(Algorithm::Consistent)
///     .with_replicas(64)
///     .build(&backends)
///     .unwrap();
/// assert_eq!(ring.backend_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuilder {
    algorithm: Algorithm,
    replicas: u32,
}

impl RingBuilder {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            replicas: DEFAULT_REPLICAS,
        }
    }

    /// Base replica count per backend. Rounded to the nearest multiple of 8.
    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn build(&self, backends: &BackendSet) -> Result<Ring> {
        if backends.is_empty() {
            return Err(Error::NoBackends);
        }
        if self.replicas == 0 {
            return Err(Error::InvalidReplicas(self.replicas));
        }

        let ring = match backends.len() {
            1 => Ring::Single,
            _ if self.algorithm.is_weighted() => Ring::Weighted(self.build_weighted(backends)),
            _ => Ring::Naive(NaiveRing::build(backends)),
        };

        debug!(
            algorithm = %self.algorithm,
            backends = backends.len(),
            total_weight = backends.total_weight(),
            slices = ring.slice_count(),
            entries = ring.entry_count(),
            "built ring"
        );
        Ok(ring)
    }

    fn build_weighted(&self, backends: &BackendSet) -> WeightedRing {
        let base = normalize_replicas(self.replicas);
        let total_replicas = u64::from(base) * backends.len() as u64;
        let layout = SliceLayout::new(total_replicas);
        let multiplier = total_replicas as f64 / backends.total_weight() as f64;

        let mut ring = WeightedRing::new(layout, backends.len());
        for (index, backend) in backends.iter().enumerate() {
            let replicas = replica_count(backend.weight, multiplier);
            if replicas == 0 {
                warn!(
                    backend = %backend.id,
                    weight = backend.weight,
                    multiplier,
                    "backend received no replicas and is unreachable by hashed lookups"
                );
            }
            for i in 0..replicas {
                ring.insert(Replica::from_index(index, backend.id.as_str(), i));
            }
            ring.set_replica_count(index, replicas);
        }

        ring.check_slices();
        ring
    }
}
