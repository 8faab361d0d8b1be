//! Slice-indexed weighted ring for `consistent` and `redundant` lookups.
//!
//! # Algorithm
//!
//! 1. Hash the key to a signed position `crc`
//! 2. Start at the slice owning `crc` and walk entries with position `>= crc`
//!    in ascending order, collecting distinct backends
//! 3. Continue through the following slices
//! 4. Past the last slice, wrap once to slice 0 with the threshold lowered to
//!    `i32::MIN`; a second wrap ends the walk with whatever was collected
//!
//! Scan cost is bounded by slice length rather than ring size.

use std::collections::BTreeMap;

use tracing::warn;

use super::layout::SliceLayout;
use crate::replica::Replica;
use crate::token::Crc32Token;

/// Weighted ring split into slices of sorted replica positions.
#[derive(Debug, Clone)]
pub struct WeightedRing {
    layout: SliceLayout,
    /// Per slice: unsigned position -> backend index.
    slices: Vec<BTreeMap<u32, usize>>,
    /// Replica count assigned to each backend, in backend-set order.
    replica_counts: Vec<u32>,
}

impl WeightedRing {
    pub(crate) fn new(layout: SliceLayout, backend_count: usize) -> Self {
        Self {
            layout,
            slices: vec![BTreeMap::new(); layout.count()],
            replica_counts: vec![0; backend_count],
        }
    }

    /// Place a replica. An existing entry at the same position is replaced.
    pub(crate) fn insert(&mut self, replica: Replica) {
        let slice = self.layout.slice_for(replica.token.signed());
        self.slices[slice].insert(replica.token.0, replica.backend);
    }

    pub(crate) fn set_replica_count(&mut self, backend: usize, count: u32) {
        self.replica_counts[backend] = count;
    }

    /// Report slices that ended up without any replica.
    ///
    /// Empty slices do not break lookups (the walk moves on), but they mean
    /// replica density is too low for the slice count.
    pub(crate) fn check_slices(&self) -> usize {
        let empty = self.empty_slices();
        if empty > 0 {
            warn!(
                empty_slices = empty,
                slices = self.layout.count(),
                entries = self.entry_count(),
                "weighted ring has empty slices"
            );
        }
        empty
    }

    pub fn layout(&self) -> &SliceLayout {
        &self.layout
    }

    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    /// Distinct positions stored across all slices.
    pub fn entry_count(&self) -> usize {
        self.slices.iter().map(BTreeMap::len).sum()
    }

    pub fn empty_slices(&self) -> usize {
        self.slices.iter().filter(|s| s.is_empty()).count()
    }

    pub fn replica_counts(&self) -> &[u32] {
        &self.replica_counts
    }

    /// Entries of one slice in ascending position order.
    pub fn slice(&self, index: usize) -> impl Iterator<Item = Replica> + '_ {
        self.slices[index]
            .iter()
            .map(|(&position, &backend)| Replica::new(Crc32Token(position), backend))
    }

    /// Collect up to `count` distinct backend indices for `token`.
    pub fn lookup(&self, token: Crc32Token, count: usize) -> Vec<usize> {
        self.walk(token.signed(), count)
    }

    pub(crate) fn walk(&self, crc: i32, count: usize) -> Vec<usize> {
        let mut found: Vec<usize> = Vec::with_capacity(count);
        if count == 0 {
            return found;
        }

        let mut threshold = crc;
        let mut slice = self.layout.slice_for(crc);
        let mut wrapped = false;

        loop {
            if slice >= self.slices.len() {
                if wrapped {
                    break;
                }
                wrapped = true;
                threshold = i32::MIN;
                slice = 0;
            }

            for (&position, &backend) in &self.slices[slice] {
                if (position as i32) < threshold || found.contains(&backend) {
                    continue;
                }
                found.push(backend);
                if found.len() == count {
                    return found;
                }
            }

            slice += 1;
        }

        found
    }
}
