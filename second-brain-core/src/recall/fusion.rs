//! Reciprocal Rank Fusion (§4.3 phase 4).

use crate::domain::MemoryMatch;
use std::collections::HashMap;

/// Default RRF constant, overridable via `Config::hybrid_rrf_k`.
pub const DEFAULT_RRF_K: f64 = 60.0;

/// Fuse per-source ranked result lists via Reciprocal Rank Fusion:
/// `fused_score = Σ_sources 1 / (k + rank_in_source)`, keyed by each item's
/// `id` (a stable identity per §4.3.1). The highest-scoring source's tag
/// is kept as `source`, and every contributing source is recorded.
///
/// Given identical inputs, the output order is deterministic (ties broken
/// by `id`), satisfying the determinism invariant in §5/§8.
#[must_use]
pub fn reciprocal_rank_fusion(
    by_source: HashMap<&'static str, Vec<MemoryMatch>>,
    k: f64,
) -> Vec<MemoryMatch> {
    let mut fused: HashMap<String, MemoryMatch> = HashMap::new();
    let mut best_source_score: HashMap<String, f32> = HashMap::new();

    // Iterate sources in a deterministic order so ties are stable.
    let mut source_names: Vec<&'static str> = by_source.keys().copied().collect();
    source_names.sort_unstable();

    for source_name in source_names {
        let matches = &by_source[source_name];
        for (rank, item) in matches.iter().enumerate() {
            let rrf_contribution = (1.0 / (k + (rank + 1) as f64)) as f32;
            let entry = fused.entry(item.id.clone()).or_insert_with(|| {
                let mut m = item.clone();
                m.score = 0.0;
                m.contributing_sources.clear();
                m
            });
            entry.score += rrf_contribution;
            if !entry.contributing_sources.contains(&item.source) {
                entry.contributing_sources.push(item.source);
            }

            let best = best_source_score.entry(item.id.clone()).or_insert(f32::MIN);
            if item.score > *best {
                *best = item.score;
                entry.source = item.source;
                entry.content = item.content.clone();
                entry.metadata = item.metadata.clone();
            }
        }
    }

    let mut results: Vec<MemoryMatch> = fused.into_values().collect();
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MatchSource;

    fn m(source: MatchSource, id: &str, score: f32) -> MemoryMatch {
        MemoryMatch::new(source, id, format!("content-{id}"), score)
    }

    #[test]
    fn fuses_disjoint_sources_by_rank() {
        let mut by_source = HashMap::new();
        by_source.insert("mem0", vec![m(MatchSource::Mem0, "a", 0.9), m(MatchSource::Mem0, "b", 0.8)]);
        by_source.insert("patterns", vec![m(MatchSource::Vector, "c", 0.7)]);

        let fused = reciprocal_rank_fusion(by_source, DEFAULT_RRF_K);
        assert_eq!(fused.len(), 3);
        // "a" is rank 1 in mem0: highest fused score among singly-ranked items.
        assert_eq!(fused[0].id, "a");
    }

    #[test]
    fn overlapping_items_accumulate_score_and_sources() {
        let mut by_source = HashMap::new();
        by_source.insert("mem0", vec![m(MatchSource::Mem0, "x", 0.9)]);
        by_source.insert("vector", vec![m(MatchSource::Vector, "x", 0.6)]);

        let fused = reciprocal_rank_fusion(by_source, DEFAULT_RRF_K);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].contributing_sources.len(), 2);
    }

    #[test]
    fn fusion_is_deterministic_given_identical_inputs() {
        let mut by_source = HashMap::new();
        by_source.insert("mem0", vec![m(MatchSource::Mem0, "a", 0.9), m(MatchSource::Mem0, "b", 0.8)]);
        by_source.insert("vector", vec![m(MatchSource::Vector, "b", 0.95)]);

        let first = reciprocal_rank_fusion(by_source.clone(), DEFAULT_RRF_K);
        let second = reciprocal_rank_fusion(by_source, DEFAULT_RRF_K);
        let ids_a: Vec<_> = first.iter().map(|m| m.id.clone()).collect();
        let ids_b: Vec<_> = second.iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids_a, ids_b);
    }
}
