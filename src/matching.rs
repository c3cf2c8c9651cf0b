// 🔗 Match Finder - Pairwise scoring inside each block
//
// For every block of size k ≥ 2, all k(k-1)/2 unordered pairs are scored on
// company_name and kept when score ≥ threshold. Blocks are expected to be
// small, so the quadratic cost per block is acceptable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blocking::Blocks;
use crate::config::DEFAULT_MATCH_THRESHOLD;
use crate::error::{ResolveError, ResolveResult};
use crate::record::{check_alignment, Record, RecordId};
use crate::scoring::{PairScorer, TokenSetScorer};

// ============================================================================
// MATCH PAIR
// ============================================================================

/// Two records whose names scored at or above the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchPair {
    /// Smaller record id of the pair
    pub id1: RecordId,

    /// Larger record id of the pair
    pub id2: RecordId,

    /// Scorer output in [0, 100]
    pub score: u8,
}

impl MatchPair {
    /// Build a pair in canonical order (id1 < id2)
    ///
    /// A record never pairs with itself.
    pub fn new(a: RecordId, b: RecordId, score: u8) -> Self {
        debug_assert_ne!(a, b, "record {} paired with itself", a);
        let (id1, id2) = if a <= b { (a, b) } else { (b, a) };
        MatchPair { id1, id2, score }
    }
}

// ============================================================================
// MATCH FINDER
// ============================================================================

pub struct MatchFinder<S: PairScorer = TokenSetScorer> {
    scorer: S,

    /// Minimum score to accept a pair (default: 90)
    threshold: u8,
}

impl MatchFinder<TokenSetScorer> {
    /// Token set scorer with the default threshold
    pub fn new() -> Self {
        MatchFinder::with_scorer(TokenSetScorer, DEFAULT_MATCH_THRESHOLD)
    }
}

impl Default for MatchFinder<TokenSetScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PairScorer> MatchFinder<S> {
    pub fn with_scorer(scorer: S, threshold: u8) -> Self {
        MatchFinder { scorer, threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Group records by block key, then score pairs inside each block
    ///
    /// Fails with `MisalignedRecord` unless `records[i].id == i`.
    pub fn find_matches(&self, records: &[Record]) -> ResolveResult<Vec<MatchPair>> {
        let blocks = Blocks::group(records);
        self.find_in_blocks(records, &blocks)
    }

    /// Score pairs inside already-grouped blocks, in block key order
    ///
    /// Same id requirement as `find_matches`.
    #[cfg(not(feature = "parallel"))]
    pub fn find_in_blocks(&self, records: &[Record], blocks: &Blocks) -> ResolveResult<Vec<MatchPair>> {
        check_alignment(records)?;

        let mut matches = Vec::new();
        for (key, ids) in blocks.comparable() {
            matches.extend(self.match_block(records, key, ids)?);
        }
        Ok(matches)
    }

    /// Score pairs inside already-grouped blocks, one rayon task per block
    ///
    /// Results are merged in block key order, so output equals the
    /// sequential version.
    #[cfg(feature = "parallel")]
    pub fn find_in_blocks(&self, records: &[Record], blocks: &Blocks) -> ResolveResult<Vec<MatchPair>> {
        use rayon::prelude::*;

        check_alignment(records)?;

        let comparable: Vec<(&str, &[RecordId])> = blocks.comparable().collect();
        let per_block = comparable
            .par_iter()
            .map(|(key, ids)| self.match_block(records, key, ids))
            .collect::<ResolveResult<Vec<_>>>()?;

        Ok(per_block.into_iter().flatten().collect())
    }

    /// All unordered pairs of one block that meet the threshold
    ///
    /// Pairs where either company name is empty are never scored: two blank
    /// names say nothing about being the same company. A block id with no
    /// record behind it is an `UnknownRecord` error.
    pub fn match_block(
        &self,
        records: &[Record],
        key: &str,
        ids: &[RecordId],
    ) -> ResolveResult<Vec<MatchPair>> {
        let name_of = move |id: RecordId| {
            records
                .get(id)
                .map(|r| r.company_name.as_str())
                .ok_or(ResolveError::UnknownRecord {
                    id,
                    len: records.len(),
                })
        };

        let mut matches = Vec::new();
        for (i, &id1) in ids.iter().enumerate() {
            let name1 = name_of(id1)?;
            if name1.is_empty() {
                continue;
            }

            for &id2 in &ids[i + 1..] {
                let name2 = name_of(id2)?;
                if name2.is_empty() {
                    continue;
                }

                let score = self.scorer.score(name1, name2);
                if score >= self.threshold {
                    matches.push(MatchPair::new(id1, id2, score));
                }
            }
        }

        debug!(block = key, size = ids.len(), matches = matches.len(), "scored block");
        Ok(matches)
    }
}

// ============================================================================
// TESTS
// ============================================================================
