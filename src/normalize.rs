// 🧹 Normalizer - Canonical comparable text
// lowercase → strip punctuation → collapse whitespace → trim
//
// "ACME,  Inc." and "acme inc" must compare equal downstream, so every
// attribute goes through here exactly once before blocking and scoring.

/// Normalize a raw attribute value.
///
/// Missing input becomes the empty string. Every character that is neither
/// alphanumeric nor whitespace is dropped (underscores included), runs of
/// whitespace collapse to a single space, and the ends are trimmed.
///
/// Idempotent: `normalize(Some(&normalize(x))) == normalize(x)`.
pub fn normalize(text: Option<&str>) -> String {
    let text = match text {
        Some(t) => t,
        None => return String::new(),
    };

    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a present value (shorthand for `normalize(Some(text))`)
pub fn normalize_str(text: &str) -> String {
    normalize(Some(text))
}

// ============================================================================
// TESTS
// ============================================================================
