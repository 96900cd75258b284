//! Deduplication by content hash (§4.3 phase 6, §4.3.1).

use crate::domain::MemoryMatch;
use crate::util::content_hash64;
use std::collections::HashMap;

/// Remove duplicates by normalized-content hash, keeping order of first
/// appearance and letting the highest-scoring duplicate win (`rerank_score`
/// when present, falling back to fused/provider score per §4.3.4).
#[must_use]
pub fn deduplicate(matches: Vec<MemoryMatch>) -> Vec<MemoryMatch> {
    let mut order: Vec<u64> = Vec::new();
    let mut winners: HashMap<u64, MemoryMatch> = HashMap::new();

    for item in matches {
        let key = content_hash64(&item.content);
        match winners.get(&key) {
            Some(existing) if existing.ranking_score() >= item.ranking_score() => {
                // existing wins, nothing to do
            }
            _ => {
                if !winners.contains_key(&key) {
                    order.push(key);
                }
                winners.insert(key, item);
            }
        }
    }

    order.into_iter().map(|key| winners.remove(&key).expect("key present")).collect()
}
