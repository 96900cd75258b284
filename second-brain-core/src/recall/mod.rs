//! The hybrid recall pipeline's pure logic: fusion, dedup, formatting, and
//! the structured parallel-gather primitive. Complexity classification
//! lives in [`crate::classify`]; orchestration (deciding which sources to
//! query, calling the embedder/reranker) lives one layer up, in the agent
//! dispatch crate, which composes these pure pieces.

pub mod dedup;
pub mod format;
pub mod fusion;
pub mod gather;

pub use dedup::deduplicate;
pub use format::format_matches;
pub use fusion::{reciprocal_rank_fusion, DEFAULT_RRF_K};
pub use gather::{parallel_search_gather, GatherSource, SourceFuture};

use crate::domain::MemoryMatch;
use std::collections::HashMap;

/// Run the fuse → dedup portion of the pipeline (rerank, when enabled, runs
/// between these two steps one layer up, since it needs a reranker
/// provider and is itself optional). Exposed as one call so every caller
/// gets identical fusion/dedup semantics.
#[must_use]
pub fn fuse_and_deduplicate(
    by_source: HashMap<&'static str, Vec<MemoryMatch>>,
    rrf_k: f64,
) -> Vec<MemoryMatch> {
    let fused = reciprocal_rank_fusion(by_source, rrf_k);
    deduplicate(fused)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MatchSource;

    #[test]
    fn fuse_and_deduplicate_composes_both_steps() {
        let mut by_source = HashMap::new();
        by_source.insert(
            "mem0",
            vec![MemoryMatch::new(MatchSource::Mem0, "1", "same text", 0.9)],
        );
        by_source.insert(
            "vector",
            vec![MemoryMatch::new(MatchSource::Vector, "2", "same text", 0.6)],
        );
        let result = fuse_and_deduplicate(by_source, DEFAULT_RRF_K);
        assert_eq!(result.len(), 1);
    }
}
