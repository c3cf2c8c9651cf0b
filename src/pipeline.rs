// 🏭 Resolution Pipeline
// raw records → normalize → block → match → union → assign
//
// Pure batch computation: returns a Resolution value, reporting and export
// are left to the caller.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::blocking::Blocks;
use crate::clustering::{assign, Assignment, ClusterId, DisjointSet};
use crate::config::ResolverConfig;
use crate::error::ResolveResult;
use crate::matching::{MatchFinder, MatchPair};
use crate::record::{check_alignment, normalize_records, RawRecord, Record, RecordId};
use crate::scoring::{PairScorer, TokenSetScorer};

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

/// Counts collected while resolving
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub records: usize,
    pub blocks: usize,

    /// Blocks with two or more records
    pub comparable_blocks: usize,

    /// Candidate pairs implied by blocking
    pub comparisons: usize,
    pub matches: usize,

    /// Matches that joined two previously separate clusters
    pub merges: usize,
    pub clusters: usize,
    pub multi_record_clusters: usize,
    pub largest_cluster: usize,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    /// Normalized records, records[i].id == i
    pub records: Vec<Record>,

    /// Accepted pairs in the order they were unioned
    pub matches: Vec<MatchPair>,

    pub assignment: Assignment,
    pub stats: ResolutionStats,
}

impl Resolution {
    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn cluster_of(&self, id: RecordId) -> Option<ClusterId> {
        self.assignment.cluster_of(id)
    }

    /// Records sharing a cluster with `id` (itself included)
    pub fn cluster_members(&self, id: RecordId) -> Vec<&Record> {
        match self.cluster_of(id) {
            Some(cluster) => self
                .assignment
                .iter()
                .filter(|(_, c)| *c == cluster)
                .filter_map(|(member, _)| self.record(member))
                .collect(),
            None => Vec::new(),
        }
    }
}

// ============================================================================
// ENTITY RESOLVER
// ============================================================================

pub struct EntityResolver<S: PairScorer = TokenSetScorer> {
    config: ResolverConfig,
    finder: MatchFinder<S>,
}

impl EntityResolver<TokenSetScorer> {
    /// Resolver with the token set scorer; fails fast on invalid config
    pub fn new(config: ResolverConfig) -> ResolveResult<Self> {
        EntityResolver::with_scorer(config, TokenSetScorer)
    }
}

impl<S: PairScorer> EntityResolver<S> {
    pub fn with_scorer(config: ResolverConfig, scorer: S) -> ResolveResult<Self> {
        config.validate()?;
        let finder = MatchFinder::with_scorer(scorer, config.threshold());
        Ok(EntityResolver { config, finder })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Normalize raw records, then resolve them
    pub fn resolve(&self, raw: &[RawRecord]) -> ResolveResult<Resolution> {
        let records = normalize_records(raw, self.config.block_prefix_length);
        info!(records = records.len(), "normalized records");
        self.resolve_normalized(records)
    }

    /// Resolve records that are already normalized
    ///
    /// Block keys are used as they are. Ids must equal input positions.
    pub fn resolve_normalized(&self, records: Vec<Record>) -> ResolveResult<Resolution> {
        check_alignment(&records)?;

        let blocks = Blocks::group(&records);
        let comparable_blocks = blocks.comparable().count();
        let comparisons = blocks.comparison_count();
        info!(
            blocks = blocks.len(),
            comparable_blocks,
            comparisons,
            "grouped records into blocks"
        );

        let matches = self.finder.find_in_blocks(&records, &blocks)?;
        info!(matches = matches.len(), threshold = self.finder.threshold(), "scored candidate pairs");

        // unions run single-threaded after scoring
        let mut forest = DisjointSet::new(records.len());
        let merges = forest.union_pairs(&matches)?;
        let assignment = assign(records.len(), &mut forest)?;

        let stats = ResolutionStats {
            records: records.len(),
            blocks: blocks.len(),
            comparable_blocks,
            comparisons,
            matches: matches.len(),
            merges,
            clusters: assignment.cluster_count(),
            multi_record_clusters: assignment.multi_record_clusters().len(),
            largest_cluster: assignment.largest_cluster_size(),
        };
        info!(
            clusters = stats.clusters,
            multi_record_clusters = stats.multi_record_clusters,
            largest_cluster = stats.largest_cluster,
            "assigned clusters"
        );

        Ok(Resolution {
            records,
            matches,
            assignment,
            stats,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;

    #[test]
    fn test_invalid_config_fails_fast() {
        let bad = ResolverConfig::new().with_threshold(101);
        assert_eq!(
            EntityResolver::new(bad).err(),
            Some(ResolveError::InvalidThreshold(101))
        );

        let bad = ResolverConfig::new().with_prefix_length(0);
        assert!(EntityResolver::new(bad).is_err());
    }

    #[test]
    fn test_empty_dataset() {
        let resolver = EntityResolver::new(ResolverConfig::default()).unwrap();
        let resolution = resolver.resolve(&[]).unwrap();

        assert!(resolution.assignment.is_empty());
        assert!(resolution.matches.is_empty());
        assert_eq!(resolution.stats, ResolutionStats::default());
    }

    #[test]
    fn test_chain_merges_transitively() {
        // a~b and b~c match, a~c does not
        let raw = vec![
            RawRecord::named("Acme Widgets", "US"),
            RawRecord::named("Acme Widgets International", "US"),
            RawRecord::named("Acme International", "US"),
        ];
        let resolver = EntityResolver::new(ResolverConfig::default()).unwrap();
        let resolution = resolver.resolve(&raw).unwrap();

        assert_eq!(resolution.matches.len(), 2);
        assert!(!resolution.matches.iter().any(|m| (m.id1, m.id2) == (0, 2)));
        assert_eq!(resolution.assignment.partition(), vec![vec![0, 1, 2]]);
        assert_eq!(resolution.cluster_members(2).len(), 3);
    }

    #[test]
    fn test_record_lookup() {
        let raw = vec![
            RawRecord::named("Acme Inc", "US"),
            RawRecord::named("Globex", "DE"),
        ];
        let resolution = EntityResolver::new(ResolverConfig::default())
            .unwrap()
            .resolve(&raw)
            .unwrap();

        assert_eq!(resolution.record(1).map(|r| r.company_name.as_str()), Some("globex"));
        assert!(resolution.record(2).is_none());
        assert!(resolution.cluster_members(2).is_empty());
        assert_eq!(
            resolution.cluster_members(0).iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![0]
        );
    }

    #[test]
    fn test_custom_scorer() {
        let raw = vec![
            RawRecord::named("Acme", "US"),
            RawRecord::named("Apex", "US"),
        ];
        let resolver =
            EntityResolver::with_scorer(ResolverConfig::default(), |_: &str, _: &str| 100u8)
                .unwrap();
        let resolution = resolver.resolve(&raw).unwrap();

        // "acm" vs "ape" prefixes: different blocks, never compared
        assert!(resolution.matches.is_empty());
        assert_eq!(resolution.stats.clusters, 2);
    }

    #[test]
    fn test_misaligned_records_rejected() {
        let mut records = normalize_records(&[RawRecord::named("Acme", "US")], 3);
        records[0].id = 4;

        let resolver = EntityResolver::new(ResolverConfig::default()).unwrap();
        assert_eq!(
            resolver.resolve_normalized(records).err(),
            Some(ResolveError::MisalignedRecord { position: 0, id: 4 })
        );
    }

    #[test]
    fn test_stats_counts() {
        let raw = vec![
            RawRecord::named("Acme Inc", "US"),
            RawRecord::named("ACME INC.", "US"),
            RawRecord::named("Acme Corp", "US"),
            RawRecord::named("Globex", "DE"),
        ];
        let resolver = EntityResolver::new(ResolverConfig::default()).unwrap();
        let stats = resolver.resolve(&raw).unwrap().stats;

        assert_eq!(stats.records, 4);
        assert_eq!(stats.blocks, 2);
        assert_eq!(stats.comparable_blocks, 1);
        assert_eq!(stats.comparisons, 3);
        assert_eq!(stats.clusters, 3);
        assert_eq!(stats.multi_record_clusters, 1);
        assert_eq!(stats.largest_cluster, 2);
    }
}
