//! Backend abstractions.
//!
//! Backends are the servers keys are distributed over. They are identified by
//! an opaque string and carry a relative weight.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Opaque identifier of a backend.
///
/// Newtype over a shared string so results and cache entries can hand out
/// ids without copying the underlying bytes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackendId(Arc<str>);

impl BackendId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Debug for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BackendId({:?})", &*self.0)
    }
}

impl From<&str> for BackendId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BackendId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<&String> for BackendId {
    fn from(id: &String) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for BackendId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BackendId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for BackendId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// A backend and its relative weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backend {
    pub id: BackendId,
    /// Relative share of the keyspace. Always positive.
    pub weight: u32,
}

impl Backend {
    pub fn new(id: impl Into<BackendId>, weight: u32) -> Self {
        Self {
            id: id.into(),
            weight,
        }
    }
}

/// Ordered, validated set of backends.
///
/// Iteration order is the order in which backends were first supplied. A
/// repeated id keeps its original position and takes the later weight.
#[derive(Clone, Debug)]
pub struct BackendSet {
    backends: Vec<Backend>,
    total_weight: u64,
}

impl BackendSet {
    /// Build a backend set from `(id, weight)` pairs.
    ///
    /// Fails with [`Error::NoBackends`] on an empty input and with
    /// [`Error::InvalidWeight`] when a weight is zero.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<BackendId>,
    {
        let mut backends: Vec<Backend> = Vec::new();
        for (id, weight) in pairs {
            let id = id.into();
            if weight == 0 {
                return Err(Error::InvalidWeight {
                    backend: id.to_string(),
                    weight,
                });
            }
            match backends.iter_mut().find(|b| b.id == id) {
                Some(existing) => existing.weight = weight,
                None => backends.push(Backend { id, weight }),
            }
        }

        if backends.is_empty() {
            return Err(Error::NoBackends);
        }

        let total_weight = backends.iter().map(|b| u64::from(b.weight)).sum();
        Ok(Self {
            backends,
            total_weight,
        })
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Always false for a constructed set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Sum of all weights, memoized at construction.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn get(&self, index: usize) -> Option<&Backend> {
        self.backends.get(index)
    }

    pub(crate) fn id(&self, index: usize) -> &BackendId {
        &self.backends[index].id
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Backend> {
        self.backends.iter()
    }

    /// Index of the backend with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.backends.iter().position(|b| b.id == *id)
    }

    /// All backend ids in set order.
    pub fn ids(&self) -> Vec<BackendId> {
        self.backends.iter().map(|b| b.id.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a BackendSet {
    type Item = &'a Backend;
    type IntoIter = std::slice::Iter<'a, Backend>;

    fn into_iter(self) -> Self::IntoIter {
        self.backends.iter()
    }
}
