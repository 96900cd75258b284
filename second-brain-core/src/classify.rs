//! Complexity classification (§4.3 phase 1): a pure function mapping a
//! query string to `Simple` or `Complex` using stable heuristics. The
//! classifier must be deterministic and side-effect-free — no embedding, no
//! I/O — so `quick_recall` can route on it before paying for an embedding.

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Complex,
}

const CONJUNCTIONS: &[&str] = &[
    " and ", " vs ", " versus ", " compare ", " but also ", " as well as ",
];
const MULTI_INTENT_MARKERS: &[&str] = &[
    "show", "list", "also", "then", "compare", "gotchas", "examples", "explain",
];
const LONG_QUERY_CHAR_THRESHOLD: usize = 80;
const MANY_WORDS_THRESHOLD: usize = 12;

/// Classify a query's complexity using stable, deterministic heuristics:
/// length, presence of conjunctions/quoted phrases, and multi-intent
/// markers. Never performs I/O or embedding.
#[must_use]
pub fn classify_complexity(query: &str) -> Complexity {
    let trimmed = query.trim();
    let lower = trimmed.to_lowercase();

    if trimmed.chars().count() > LONG_QUERY_CHAR_THRESHOLD {
        return Complexity::Complex;
    }

    let word_count = trimmed.split_whitespace().count();
    if word_count > MANY_WORDS_THRESHOLD {
        return Complexity::Complex;
    }

    if CONJUNCTIONS.iter().any(|c| lower.contains(c)) {
        return Complexity::Complex;
    }

    if trimmed.matches('"').count() >= 2 {
        return Complexity::Complex;
    }

    let marker_hits = MULTI_INTENT_MARKERS
        .iter()
        .filter(|m| lower.contains(*m))
        .count();
    if marker_hits >= 2 {
        return Complexity::Complex;
    }

    if trimmed.matches(',').count() >= 2 {
        return Complexity::Complex;
    }

    Complexity::Simple
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_plain_query_is_simple() {
        assert_eq!(classify_complexity("JWT auth patterns"), Complexity::Simple);
    }

    #[test]
    fn long_multi_intent_query_is_complex() {
        let q = "Compare JWT vs session auth, show examples, list gotchas";
        assert_eq!(classify_complexity(q), Complexity::Complex);
    }

    #[test]
    fn very_long_query_is_complex_regardless_of_content() {
        let q = "a".repeat(200);
        assert_eq!(classify_complexity(&q), Complexity::Complex);
    }

    #[test]
    fn quoted_phrases_push_toward_complex() {
        let q = r#"find "rate limiting" "token bucket""#;
        assert_eq!(classify_complexity(q), Complexity::Complex);
    }

    #[test]
    fn classification_is_deterministic() {
        let q = "how does retry work";
        assert_eq!(classify_complexity(q), classify_complexity(q));
    }

    #[test]
    fn empty_query_is_simple() {
        assert_eq!(classify_complexity(""), Complexity::Simple);
    }
}
