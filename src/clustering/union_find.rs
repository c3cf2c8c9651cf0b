// 🌲 Disjoint-Set Forest - Union-find with path compression
//
// Every record id is registered up front (DisjointSet::new(len)), so an id
// the forest has never seen is an error instead of a silently created
// singleton.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ResolveError, ResolveResult};
use crate::matching::MatchPair;
use crate::record::RecordId;

// ============================================================================
// CLUSTER ID
// ============================================================================

/// Opaque cluster token: the root record of the set
///
/// Which member becomes root depends on union order, so two runs over the
/// same data may pick different ids for the same cluster. Compare clusters
/// by membership, never by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(RecordId);

impl ClusterId {
    /// Raw token value (for export only)
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// DISJOINT SET
// ============================================================================

#[derive(Debug, Clone)]
pub struct DisjointSet {
    /// parent[i] == i for roots
    parent: Vec<RecordId>,

    /// Set size, valid at roots only
    size: Vec<usize>,

    /// Number of disjoint sets
    sets: usize,
}

impl DisjointSet {
    /// Forest of `len` singleton sets, ids 0..len
    pub fn new(len: usize) -> Self {
        DisjointSet {
            parent: (0..len).collect(),
            size: vec![1; len],
            sets: len,
        }
    }

    /// Number of registered ids
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets currently in the forest
    pub fn set_count(&self) -> usize {
        self.sets
    }

    fn check(&self, id: RecordId) -> ResolveResult<()> {
        if id < self.parent.len() {
            Ok(())
        } else {
            Err(ResolveError::UnknownRecord { id, len: self.parent.len() })
        }
    }

    /// Representative of the set containing `id`
    ///
    /// Rewrites every pointer on the path to point at the root. The
    /// partition itself never changes.
    pub fn find(&mut self, id: RecordId) -> ResolveResult<ClusterId> {
        self.check(id)?;

        let mut root = id;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = id;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        Ok(ClusterId(root))
    }

    /// Merge the sets of `a` and `b`
    ///
    /// Returns false (and changes nothing) when both are already in the same
    /// set. The smaller set goes under the larger one; on a tie `a`'s root
    /// goes under `b`'s.
    pub fn union(&mut self, a: RecordId, b: RecordId) -> ResolveResult<bool> {
        let root_a = self.find(a)?.0;
        let root_b = self.find(b)?.0;

        if root_a == root_b {
            return Ok(false);
        }

        let (child, root) = if self.size[root_a] > self.size[root_b] {
            (root_b, root_a)
        } else {
            (root_a, root_b)
        };

        self.parent[child] = root;
        self.size[root] += self.size[child];
        self.sets -= 1;

        Ok(true)
    }

    /// Apply one union per pair, in order; returns how many merged two sets
    pub fn union_pairs(&mut self, pairs: &[MatchPair]) -> ResolveResult<usize> {
        let mut merged = 0;
        for pair in pairs {
            if self.union(pair.id1, pair.id2)? {
                merged += 1;
            }
        }
        Ok(merged)
    }

    pub fn same_set(&mut self, a: RecordId, b: RecordId) -> ResolveResult<bool> {
        Ok(self.find(a)? == self.find(b)?)
    }

    /// Size of the set containing `id`
    pub fn set_size(&mut self, id: RecordId) -> ResolveResult<usize> {
        let root = self.find(id)?;
        Ok(self.size[root.0])
    }
}

// ============================================================================
// TESTS
// ============================================================================
