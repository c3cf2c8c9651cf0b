// 🎯 Pair Scoring - Token set similarity between company names
//
// "acme corp" vs "corp acme"          → 100 (reordering)
// "acme" vs "acme holdings"           → 100 (subset of tokens)
// "acme inc" vs "acme incorporated"   → 100 (legal form canonicalized)
// "acme" vs "globex"                  → low

use std::collections::BTreeSet;

/// Highest possible score
pub const MAX_SCORE: u8 = 100;

/// Score returned when either side has no tokens (two empty names included)
pub const EMPTY_NAME_SCORE: u8 = 0;

/// Legal-form designators folded to one spelling before tokens are compared
const LEGAL_FORMS: &[(&str, &str)] = &[
    ("incorporated", "inc"),
    ("corporation", "corp"),
    ("limited", "ltd"),
    ("company", "co"),
];

// ============================================================================
// PAIR SCORER
// ============================================================================

/// Similarity between two normalized names, in [0, 100]
///
/// Implementations must be symmetric. Sync so blocks can be scored on
/// worker threads.
pub trait PairScorer: Sync {
    fn score(&self, a: &str, b: &str) -> u8;
}

impl<F> PairScorer for F
where
    F: Fn(&str, &str) -> u8 + Sync,
{
    fn score(&self, a: &str, b: &str) -> u8 {
        self(a, b)
    }
}

/// Token set ratio
///
/// Splits both names into token sets and compares the sorted intersection
/// against intersection + remainder of each side, keeping the best of the
/// three indel ratios. Word order and extra tokens on one side do not hurt.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetScorer;

impl TokenSetScorer {
    pub fn new() -> Self {
        TokenSetScorer
    }
}

impl PairScorer for TokenSetScorer {
    fn score(&self, a: &str, b: &str) -> u8 {
        token_set_ratio(a, b)
    }
}

/// Token set ratio of two names (see `TokenSetScorer`)
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a = tokens(a);
    let tokens_b = tokens(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return EMPTY_NAME_SCORE;
    }

    let sect = join(tokens_a.intersection(&tokens_b));
    let diff_ab = join(tokens_a.difference(&tokens_b));
    let diff_ba = join(tokens_b.difference(&tokens_a));

    let combined_ab = format!("{} {}", sect, diff_ab).trim().to_string();
    let combined_ba = format!("{} {}", sect, diff_ba).trim().to_string();

    ratio(&sect, &combined_ab)
        .max(ratio(&sect, &combined_ba))
        .max(ratio(&combined_ab, &combined_ba))
}

/// Indel similarity ratio: 100 * (|a| + |b| - indel) / (|a| + |b|)
///
/// Zero when either string is empty. Exact halves round to the even
/// neighbour (12.5 → 12, 37.5 → 38).
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let total = a.len() + b.len();
    let matched = 2 * lcs_len(&a, &b);

    round_half_even(matched * 100, total) as u8
}

/// numerator / denominator rounded to the nearest integer, ties to even
fn round_half_even(numerator: usize, denominator: usize) -> usize {
    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);

    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn tokens(name: &str) -> BTreeSet<&str> {
    name.split_whitespace().map(canonical_legal_form).collect()
}

fn canonical_legal_form(token: &str) -> &str {
    LEGAL_FORMS
        .iter()
        .find(|(long, _)| *long == token)
        .map(|(_, short)| *short)
        .unwrap_or(token)
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

/// Longest common subsequence length (two-row DP)
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_names() {
        assert_eq!(token_set_ratio("acme inc", "acme inc"), 100);
        assert_eq!(token_set_ratio("globex", "globex"), 100);
    }

    #[test]
    fn test_reordering() {
        assert_eq!(token_set_ratio("acme corp", "corp acme"), 100);
    }

    #[test]
    fn test_subset_containment() {
        assert_eq!(token_set_ratio("acme", "acme holdings"), 100);
        assert_eq!(token_set_ratio("fuzzy was a bear", "fuzzy fuzzy was a bear"), 100);
    }

    #[test]
    fn test_legal_form_canonicalized() {
        assert_eq!(token_set_ratio("acme inc", "acme incorporated"), 100);
        assert_eq!(token_set_ratio("initech corporation", "initech corp"), 100);
        assert_eq!(token_set_ratio("hooli limited", "hooli ltd"), 100);
    }

    #[test]
    fn test_different_names_score_low() {
        assert!(token_set_ratio("acme", "globex") < 50);
        assert!(token_set_ratio("acme widgets", "globex widgets") < 90);
    }

    #[test]
    fn test_empty_names() {
        assert_eq!(token_set_ratio("", ""), EMPTY_NAME_SCORE);
        assert_eq!(token_set_ratio("acme", ""), EMPTY_NAME_SCORE);
        assert_eq!(token_set_ratio("   ", "acme"), EMPTY_NAME_SCORE);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("acme widgets", "acme widget co"),
            ("tesla motors hungary", "tesla hungary kft"),
            ("a b c", "c d"),
        ];
        for (a, b) in pairs {
            assert_eq!(token_set_ratio(a, b), token_set_ratio(b, a));
        }
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("abc", "abc"), 100);
        assert_eq!(ratio("acme", "acme inc"), 67);
        assert_eq!(ratio("", "abc"), 0);
    }

    #[test]
    fn test_ratio_halves_round_to_even() {
        // 2 * 1 / 16 = 12.5%
        assert_eq!(ratio("a", "abbbbbbbbbbbbbb"), 12);
        // 2 * 3 / 16 = 37.5%
        assert_eq!(ratio("abc", "abcxxxxxxxxxx"), 38);
        assert_eq!(round_half_even(5, 2), 2);
        assert_eq!(round_half_even(7, 2), 4);
        assert_eq!(round_half_even(2, 3), 1);
    }

    #[test]
    fn test_closure_scorer() {
        let always = |_: &str, _: &str| 42u8;
        assert_eq!(always.score("x", "y"), 42);
    }
}
