// 🧱 Blocking - Coarse keys that limit which records get compared
//
// Key = prefix(company_name) _ prefix(country) _ prefix(website_domain)
//
// Known limitation: records of the same company whose prefixes diverge
// ("3m" vs "three m company", translated names) land in different blocks and
// are never compared. Lowering the match threshold does not fix this.

use std::collections::BTreeMap;

use crate::record::{Record, RecordId};

/// Separator between key parts; normalized text never contains it
pub const BLOCK_KEY_SEPARATOR: char = '_';

/// First `len` characters of an already-normalized field
///
/// Counts chars, not bytes, so multi-byte letters are never split.
pub fn prefix(field: &str, len: usize) -> &str {
    match field.char_indices().nth(len) {
        Some((byte_idx, _)) => &field[..byte_idx],
        None => field,
    }
}

/// Build the block key from normalized company name, country and domain
pub fn block_key(company_name: &str, country: &str, website_domain: &str, prefix_length: usize) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        prefix(company_name, prefix_length),
        prefix(country, prefix_length),
        prefix(website_domain, prefix_length),
        sep = BLOCK_KEY_SEPARATOR,
    )
}

// ============================================================================
// BLOCKS
// ============================================================================

/// Records grouped by block key
///
/// Keys iterate in sorted order and ids stay ascending inside each block, so
/// everything downstream of grouping is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Blocks {
    groups: BTreeMap<String, Vec<RecordId>>,
}

impl Blocks {
    /// Group records by their precomputed block key
    pub fn group(records: &[Record]) -> Self {
        let mut groups: BTreeMap<String, Vec<RecordId>> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.block_key.clone())
                .or_default()
                .push(record.id);
        }
        Blocks { groups }
    }

    /// Number of distinct block keys
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Members of one block (None if no record has that key)
    pub fn members(&self, key: &str) -> Option<&[RecordId]> {
        self.groups.get(key).map(|ids| ids.as_slice())
    }

    /// All blocks in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RecordId])> {
        self.groups.iter().map(|(k, ids)| (k.as_str(), ids.as_slice()))
    }

    /// Blocks with at least two members (the only ones worth comparing)
    pub fn comparable(&self) -> impl Iterator<Item = (&str, &[RecordId])> {
        self.iter().filter(|(_, ids)| ids.len() >= 2)
    }

    /// Total pair comparisons implied by this blocking: Σ k(k-1)/2
    pub fn comparison_count(&self) -> usize {
        self.groups
            .values()
            .map(|ids| ids.len() * ids.len().saturating_sub(1) / 2)
            .sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
