//! Replica abstractions.
//!
//! # Replicas
//!
//! A replica is one virtual position a backend occupies on the ring. Instead
//! of a single point per backend, every backend owns a number of points
//! proportional to its weight:
//!
//! 1. **Weighted coverage**: heavier backends own more of the ring
//! 2. **Gradual rebalancing**: removing a backend only moves the keys its
//!    replicas owned
//! 3. **Smoothing**: many small arcs instead of one large one
//!
//! Replica `i` of backend `id` sits at `CRC32("<id>:<i>")`.

use crate::token::Crc32Token;

/// A replica position on the weighted ring.
///
/// `backend` is the index of the owning backend in its
/// [`crate::BackendSet`], which keeps ring entries small and comparisons
/// cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Replica {
    /// Token position on the ring.
    pub token: Crc32Token,

    /// Index of the backend that owns this replica.
    pub backend: usize,
}

impl Replica {
    #[inline]
    pub fn new(token: Crc32Token, backend: usize) -> Self {
        Self { token, backend }
    }

    /// Create replica `replica_index` for the backend at `backend` with id
    /// `id`.
    pub fn from_index(backend: usize, id: &str, replica_index: u32) -> Self {
        Self::new(Crc32Token::for_replica(id, replica_index), backend)
    }

    #[inline]
    pub fn token(&self) -> Crc32Token {
        self.token
    }

    #[inline]
    pub fn backend(&self) -> usize {
        self.backend
    }
}

/// Number of replicas a backend of `weight` receives for `multiplier`.
///
/// Rounds half away from zero; a very light backend can round to zero.
pub fn replica_count(weight: u32, multiplier: f64) -> u32 {
    (f64::from(weight) * multiplier).round() as u32
}
