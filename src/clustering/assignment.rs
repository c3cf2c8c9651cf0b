// 🏷️ Assignment - Every record gets exactly one cluster id
//
// Unmatched records are singleton clusters with their own id. There is no
// shared "unmatched" bucket: a record is grouped with others iff its
// cluster has size ≥ 2.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};

use crate::clustering::union_find::{ClusterId, DisjointSet};
use crate::error::{ResolveError, ResolveResult};
use crate::record::RecordId;

/// Total mapping record id → cluster id over ids 0..len
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// cluster_of[id] for every record id
    cluster_of: Vec<ClusterId>,

    /// Member count per cluster
    sizes: HashMap<ClusterId, usize>,
}

/// Assign all `record_count` records (ids 0..record_count) to their clusters
pub fn assign(record_count: usize, forest: &mut DisjointSet) -> ResolveResult<Assignment> {
    if record_count > forest.len() {
        return Err(ResolveError::UnknownRecord {
            id: forest.len(),
            len: forest.len(),
        });
    }

    let mut cluster_of = Vec::with_capacity(record_count);
    let mut sizes: HashMap<ClusterId, usize> = HashMap::new();

    for id in 0..record_count {
        let cluster = forest.find(id)?;
        *sizes.entry(cluster).or_insert(0) += 1;
        cluster_of.push(cluster);
    }

    Ok(Assignment { cluster_of, sizes })
}

impl Assignment {
    /// Number of assigned records
    pub fn len(&self) -> usize {
        self.cluster_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cluster_of.is_empty()
    }

    pub fn cluster_of(&self, id: RecordId) -> Option<ClusterId> {
        self.cluster_of.get(id).copied()
    }

    /// (record id, cluster id) in record order
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, ClusterId)> + '_ {
        self.cluster_of.iter().copied().enumerate()
    }

    pub fn cluster_count(&self) -> usize {
        self.sizes.len()
    }

    /// Members of a cluster (0 for an id that is not a cluster)
    pub fn cluster_size(&self, cluster: ClusterId) -> usize {
        self.sizes.get(&cluster).copied().unwrap_or(0)
    }

    /// True when the record matched nothing
    pub fn is_singleton(&self, id: RecordId) -> bool {
        self.cluster_of(id)
            .map(|cluster| self.cluster_size(cluster) == 1)
            .unwrap_or(false)
    }

    /// Members per cluster, ids ascending
    pub fn clusters(&self) -> BTreeMap<ClusterId, Vec<RecordId>> {
        let mut clusters: BTreeMap<ClusterId, Vec<RecordId>> = BTreeMap::new();
        for (id, cluster) in self.iter() {
            clusters.entry(cluster).or_default().push(id);
        }
        clusters
    }

    /// Canonical partition: members ascending, clusters ordered by smallest member
    ///
    /// Independent of which record happened to become root.
    pub fn partition(&self) -> Vec<Vec<RecordId>> {
        let mut sets: Vec<Vec<RecordId>> = self.clusters().into_values().collect();
        sets.sort_by_key(|members| members[0]);
        sets
    }

    /// Clusters holding two or more records, in canonical order
    pub fn multi_record_clusters(&self) -> Vec<Vec<RecordId>> {
        self.partition()
            .into_iter()
            .filter(|members| members.len() >= 2)
            .collect()
    }

    /// Size of the largest cluster (0 for an empty assignment)
    pub fn largest_cluster_size(&self) -> usize {
        self.sizes.values().copied().max().unwrap_or(0)
    }

    /// SHA-256 of the canonical partition
    ///
    /// Equal for two assignments with the same membership, whatever cluster
    /// ids they use.
    pub fn membership_fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for members in self.partition() {
            let line = members
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            hasher.update(line.as_bytes());
            hasher.update(b";");
        }
        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// TESTS
// ============================================================================
