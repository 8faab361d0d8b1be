//! Weighted key to backend distribution.
//!
//! This crate maps arbitrary keys onto a weighted set of backends for
//! key-value store clients:
//! - `naive`: modulus over a flat, weight-expanded ring
//! - `consistent`: slice-indexed consistent hashing, one backend per key
//! - `redundant`: the same ring, several distinct backends per key
//!
//! Rings are built once and never mutated. Lookups go through a bounded
//! result cache that is cleared wholesale when it overflows.

pub mod algorithm;
pub mod backend;
pub mod cache;
pub mod config;
pub mod distrib;
pub mod error;
pub mod replica;
pub mod ring;
pub mod token;

pub use algorithm::Algorithm;
pub use backend::{Backend, BackendId, BackendSet};
pub use cache::{CacheStats, ResultCache, DEFAULT_CACHE_CAPACITY};
pub use config::{BackendConfig, DistribConfig};
pub use distrib::{Distrib, DistribBuilder};
pub use error::{Error, Result};
pub use replica::Replica;
pub use ring::{Ring, RingBuilder, DEFAULT_REPLICAS};
pub use token::Crc32Token;
