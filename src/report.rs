// 📊 Resolution Reports - Block statistics, sample matches, cluster summaries
//
// Everything here is a value derived from a Resolution. Printing or logging
// it is the caller's business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::clustering::ClusterId;
use crate::config::ResolverConfig;
use crate::pipeline::{Resolution, ResolutionStats};
use crate::record::{Record, RecordId};

// ============================================================================
// BLOCK STATISTICS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStat {
    pub key: String,
    pub size: usize,
}

/// Block sizes, largest first (ties broken by key)
pub fn block_sizes(records: &[Record]) -> Vec<BlockStat> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.block_key.as_str()).or_insert(0) += 1;
    }

    let mut stats: Vec<BlockStat> = counts
        .into_iter()
        .map(|(key, size)| BlockStat {
            key: key.to_string(),
            size,
        })
        .collect();

    stats.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.key.cmp(&b.key)));
    stats
}

/// The `n` largest blocks
pub fn largest_blocks(records: &[Record], n: usize) -> Vec<BlockStat> {
    let mut stats = block_sizes(records);
    stats.truncate(n);
    stats
}

/// Records falling under one block key
pub fn block_members<'a>(records: &'a [Record], key: &str) -> Vec<&'a Record> {
    records.iter().filter(|r| r.block_key == key).collect()
}

/// Members of `key`, or of the largest block when no key is given
///
/// None when the chosen block holds no records.
pub fn sample_block<'a>(records: &'a [Record], key: Option<&str>) -> Option<(String, Vec<&'a Record>)> {
    let key = match key {
        Some(key) => key.to_string(),
        None => block_sizes(records).into_iter().next()?.key,
    };

    let members = block_members(records, &key);
    if members.is_empty() {
        return None;
    }
    Some((key, members))
}

// ============================================================================
// SAMPLES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleMatch {
    pub id1: RecordId,
    pub id2: RecordId,
    pub name1: String,
    pub name2: String,
    pub score: u8,
}

impl SampleMatch {
    pub fn describe(&self) -> String {
        format!("[{}] vs [{}] - Similarity: {}", self.name1, self.name2, self.score)
    }
}

/// First `n` accepted matches with both names attached
pub fn sample_matches(resolution: &Resolution, n: usize) -> Vec<SampleMatch> {
    resolution
        .matches
        .iter()
        .take(n)
        .filter_map(|m| {
            Some(SampleMatch {
                id1: m.id1,
                id2: m.id2,
                name1: resolution.record(m.id1)?.company_name.clone(),
                name2: resolution.record(m.id2)?.company_name.clone(),
                score: m.score,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCluster {
    pub cluster_id: ClusterId,

    /// (record id, normalized company name), ids ascending
    pub members: Vec<(RecordId, String)>,
}

/// First `n` clusters holding two or more records, ordered by smallest member
pub fn sample_clusters(resolution: &Resolution, n: usize) -> Vec<SampleCluster> {
    resolution
        .assignment
        .multi_record_clusters()
        .into_iter()
        .take(n)
        .filter_map(|members| {
            let cluster_id = resolution.cluster_of(members[0])?;
            let members = members
                .into_iter()
                .filter_map(|id| Some((id, resolution.record(id)?.company_name.clone())))
                .collect();
            Some(SampleCluster { cluster_id, members })
        })
        .collect()
}

// ============================================================================
// RUN SUMMARY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub generated_at: DateTime<Utc>,
    pub config: ResolverConfig,
    pub stats: ResolutionStats,

    /// Membership fingerprint, stable across runs with identical clusters
    pub fingerprint: String,
}

impl ResolutionSummary {
    pub fn new(resolution: &Resolution, config: &ResolverConfig) -> Self {
        ResolutionSummary {
            generated_at: Utc::now(),
            config: config.clone(),
            stats: resolution.stats.clone(),
            fingerprint: resolution.assignment.membership_fingerprint(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Records: {}, Blocks: {}, Matches: {}, Clusters: {} ({} with 2+ records, largest {})",
            self.stats.records,
            self.stats.blocks,
            self.stats.matches,
            self.stats.clusters,
            self.stats.multi_record_clusters,
            self.stats.largest_cluster
        )
    }

    /// Share of records grouped with at least one other record
    pub fn duplicate_ratio(&self) -> f64 {
        if self.stats.records == 0 {
            return 0.0;
        }
        let singletons = self.stats.clusters - self.stats.multi_record_clusters;
        (self.stats.records - singletons) as f64 / self.stats.records as f64
    }
}

// ============================================================================
// TESTS
// ============================================================================
