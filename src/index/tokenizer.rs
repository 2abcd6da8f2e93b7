//! Word tokenisation
//!
//! The index and the query scorer must agree on exactly which substrings
//! become words, so both go through this one function.

/// Split text into lower-cased alphanumeric tokens.
///
/// Every character outside `[A-Za-z0-9]` acts as a separator. Order is
/// preserved and duplicates are kept; the caller decides how to aggregate.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
        .collect()
}
