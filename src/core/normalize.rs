use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalizes a keyword variant or query string for matching: trim,
/// lowercase, NFD-decompose, strip combining marks. Indexed terms and
/// queries MUST go through the same pipeline or lookups silently miss.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Splits an already-normalized string into index terms. Apostrophes,
/// hyphens and whitespace all separate terms ("s'il vous plait" indexes as
/// four terms).
pub fn tokenize(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}
