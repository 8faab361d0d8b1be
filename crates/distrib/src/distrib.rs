//! Key to backend distribution.

use crate::algorithm::Algorithm;
use crate::backend::{BackendId, BackendSet};
use crate::cache::{CacheStats, ResultCache, DEFAULT_CACHE_CAPACITY};
use crate::config::DistribConfig;
use crate::error::Result;
use crate::ring::{Ring, RingBuilder, DEFAULT_REPLICAS};

/// Maps keys to one or more backends.
///
/// Owns an immutable ring and a bounded result cache. Lookups take `&self`;
/// the cache is the only state they touch and it is internally synchronized,
/// so a `Distrib` can be shared across threads behind an `Arc`.
///
/// A topology change means building a new `Distrib`. The cache lives and
/// dies with the ring, so it can never serve mappings from an older topology.
///
/// # Example
///
/// ```rust
/// use distrib::{Algorithm, Distrib};
///
/// let distrib = Distrib::builder(Algorithm::Redundant)
///     .add_backend("10.0.0.1:11211", 10)
///     .add_backend("10.0.0.2:11211", 20)
///     .add_backend("10.0.0.3:11211", 10)
///     .build()
///     .unwrap();
///
/// let replicas = distrib.map("user:42", 2);
/// assert_eq!(replicas.len(), 2);
/// assert_ne!(replicas[0], replicas[1]);
/// ```
#[derive(Debug)]
pub struct Distrib {
    algorithm: Algorithm,
    backends: BackendSet,
    ring: Ring,
    cache: ResultCache,
}

impl Distrib {
    /// Build with default replica and cache settings.
    pub fn new<I, K>(algorithm: Algorithm, backends: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<BackendId>,
    {
        Self::builder(algorithm).add_backends(backends).build()
    }

    pub fn builder(algorithm: Algorithm) -> DistribBuilder {
        DistribBuilder::new(algorithm)
    }

    pub fn from_config(config: &DistribConfig) -> Result<Self> {
        Self::builder(config.algorithm)
            .with_replicas(config.replicas)
            .with_cache_capacity(config.cache_capacity)
            .add_backends(config.backend_pairs())
            .build()
    }

    /// Up to `count` distinct backends for `key`, primary first.
    ///
    /// - one configured backend: always that backend
    /// - `count >= backends`: every backend, in configured order
    /// - `naive`: a single backend by modulus
    /// - `consistent`: a single backend from the weighted ring
    /// - `redundant`: `count` distinct backends in ring order, fewer only if
    ///   the walk exhausts the ring
    ///
    /// A `count` of zero is treated as one.
    pub fn map(&self, key: &str, count: usize) -> Vec<BackendId> {
        let count = count.max(1);

        if let Ring::Single = self.ring {
            return vec![self.backends.id(0).clone()];
        }
        if count >= self.backends.len() {
            return self.backends.ids();
        }

        // Single-answer algorithms share one cache entry for every count.
        let ring_count = match self.algorithm {
            Algorithm::Redundant => count,
            Algorithm::Naive | Algorithm::Consistent => 1,
        };
        if let Some(result) = self.cache.get(key, ring_count) {
            return result;
        }

        let result: Vec<BackendId> = self
            .ring
            .lookup(key, ring_count)
            .into_iter()
            .map(|index| self.backends.id(index).clone())
            .collect();

        self.cache.put(key, ring_count, result.clone());
        result
    }

    /// The primary backend for `key`.
    pub fn lookup(&self, key: &str) -> BackendId {
        self.map(key, 1)
            .into_iter()
            .next()
            .unwrap_or_else(|| self.backends.id(0).clone())
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn backends(&self) -> &BackendSet {
        &self.backends
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Builder for [`Distrib`].
#[derive(Debug, Clone)]
pub struct DistribBuilder {
    algorithm: Algorithm,
    replicas: u32,
    cache_capacity: usize,
    backends: Vec<(BackendId, u32)>,
}

impl DistribBuilder {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            replicas: DEFAULT_REPLICAS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            backends: Vec::new(),
        }
    }

    /// Base replica count per backend (default 256).
    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.replicas = replicas;
        self
    }

    /// Cached lookups before a wholesale clear (default 256, `0` disables).
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn add_backend(mut self, id: impl Into<BackendId>, weight: u32) -> Self {
        self.backends.push((id.into(), weight));
        self
    }

    pub fn add_backends<I, K>(mut self, backends: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<BackendId>,
    {
        self.backends
            .extend(backends.into_iter().map(|(id, weight)| (id.into(), weight)));
        self
    }

    pub fn build(self) -> Result<Distrib> {
        let backends = BackendSet::from_pairs(self.backends)?;
        let ring = RingBuilder::new(self.algorithm)
            .with_replicas(self.replicas)
            .build(&backends)?;

        Ok(Distrib {
            algorithm: self.algorithm,
            backends,
            ring,
            cache: ResultCache::new(self.cache_capacity),
        })
    }
}
