//! Flat modulus ring.

use crate::backend::BackendSet;
use crate::token::Crc32Token;

/// Flat ring for the `naive` algorithm.
///
/// Each backend index appears `weight` times, in backend-set order. A key
/// lands on `|signed crc| mod len`. There is no consistency across topology
/// changes: changing the length remaps most keys.
#[derive(Debug, Clone)]
pub struct NaiveRing {
    slots: Vec<usize>,
}

impl NaiveRing {
    pub fn build(backends: &BackendSet) -> Self {
        let mut slots = Vec::with_capacity(backends.total_weight() as usize);
        for (index, backend) in backends.iter().enumerate() {
            slots.extend(std::iter::repeat(index).take(backend.weight as usize));
        }
        Self { slots }
    }

    /// Length of the flat ring, equal to the total weight.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Backend index owning `token`.
    pub fn lookup(&self, token: Crc32Token) -> usize {
        let index = token.magnitude() % self.slots.len() as u64;
        self.slots[index as usize]
    }

    pub(crate) fn slots(&self) -> &[usize] {
        &self.slots
    }
}
