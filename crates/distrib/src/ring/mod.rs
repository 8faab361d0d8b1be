//! Hash ring representations.
//!
//! A ring is built once by [`RingBuilder`] and never mutated afterwards, so it
//! can be shared freely between readers. Lookups return backend indices into
//! the [`crate::BackendSet`] the ring was built from.

pub mod builder;
pub mod layout;
pub mod naive;
pub mod weighted;

pub use builder::RingBuilder;
pub use layout::{SliceLayout, DEFAULT_REPLICAS};
pub use naive::NaiveRing;
pub use weighted::WeightedRing;

use crate::token::Crc32Token;

/// An immutable ring.
#[derive(Debug, Clone)]
pub enum Ring {
    /// Exactly one backend: every key maps to it, no ring is built.
    Single,
    /// Flat modulus ring (`naive`).
    Naive(NaiveRing),
    /// Slice-indexed weighted ring (`consistent` / `redundant`).
    Weighted(WeightedRing),
}

impl Ring {
    /// Backend indices for `key`, at most `count` of them.
    ///
    /// Naive and single rings always answer with one backend. The weighted
    /// ring walks for `count` distinct backends and may return fewer.
    pub fn lookup(&self, key: &str, count: usize) -> Vec<usize> {
        match self {
            Ring::Single => vec![0],
            Ring::Naive(naive) => vec![naive.lookup(Crc32Token::from_key(key))],
            Ring::Weighted(weighted) => weighted.lookup(Crc32Token::from_key(key), count),
        }
    }

    /// Number of backends the ring was built for.
    pub fn backend_count(&self) -> usize {
        match self {
            Ring::Single => 1,
            Ring::Naive(naive) => naive.slots().iter().max().map_or(0, |max| max + 1),
            Ring::Weighted(weighted) => weighted.replica_counts().len(),
        }
    }

    /// Slices of a weighted ring; zero otherwise.
    pub fn slice_count(&self) -> usize {
        match self {
            Ring::Weighted(weighted) => weighted.slice_count(),
            _ => 0,
        }
    }

    /// Stored positions (weighted) or flat slots (naive).
    pub fn entry_count(&self) -> usize {
        match self {
            Ring::Single => 1,
            Ring::Naive(naive) => naive.len(),
            Ring::Weighted(weighted) => weighted.entry_count(),
        }
    }

    pub fn empty_slices(&self) -> usize {
        match self {
            Ring::Weighted(weighted) => weighted.empty_slices(),
            _ => 0,
        }
    }

    /// Replica counts per backend for a weighted ring.
    pub fn replica_counts(&self) -> Option<&[u32]> {
        match self {
            Ring::Weighted(weighted) => Some(weighted.replica_counts()),
            _ => None,
        }
    }
}
