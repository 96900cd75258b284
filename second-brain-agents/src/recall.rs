//! `quick_recall`/`recall_deep` orchestration (§4.3): classify-before-embed
//! routing, parallel multi-source gather, RRF fusion, optional rerank, and
//! dedup, composed from the pure primitives in `second_brain_core::recall`.

use crate::deps::Deps;
use second_brain_core::classify::{classify_complexity, Complexity};
use second_brain_core::domain::MemoryMatch;
use second_brain_core::error::{sanitize, Result};
use second_brain_core::memory_service::SearchOptions;
use second_brain_core::recall::{deduplicate, reciprocal_rank_fusion, GatherSource};
use second_brain_core::storage_service::{HybridSearchParams, SearchableTable};
use second_brain_core::util::clamp_limit;
use std::collections::HashMap;

const WHITELISTED_TABLES: [SearchableTable; 4] = [
    SearchableTable::Patterns,
    SearchableTable::Examples,
    SearchableTable::Knowledge,
    SearchableTable::Experiences,
];

/// Classify first; only the caller's single embedding call (shared by both
/// branches below) pays for embedding (§4.3 invariant 2/3): exactly one
/// embedding per call, simple or complex.
pub async fn quick_recall(deps: &Deps, query: &str, limit: usize) -> Result<Vec<MemoryMatch>> {
    match classify_complexity(query) {
        Complexity::Simple => {
            let clamped = clamp_limit(limit);
            let owner_id = deps.config.user_id.clone();
            let embedding = deps
                .embed_cache
                .get_or_embed(query, "text", || async { deps.embedder.embed(query).await })
                .await?;

            let sources = vec![
                semantic_source(deps, query, &owner_id, clamped),
                hybrid_source(deps, SearchableTable::Patterns, query, &owner_id, embedding, clamped),
            ];
            gather_rank(deps, query, None, sources, clamped).await
        }
        Complexity::Complex => recall_deep(deps, query, limit, None).await,
    }
}

/// Broad parallel gather over semantic memory plus every whitelisted
/// storage table, fused via RRF, optionally reranked, then deduplicated.
pub async fn recall_deep(deps: &Deps, query: &str, limit: usize, instruction: Option<&str>) -> Result<Vec<MemoryMatch>> {
    let embedding = deps
        .embed_cache
        .get_or_embed(query, "text", || async { deps.embedder.embed(query).await })
        .await?;

    let clamped = clamp_limit(limit);
    let owner_id = deps.config.user_id.clone();

    let mut sources = vec![semantic_source(deps, query, &owner_id, clamped)];
    for table in WHITELISTED_TABLES {
        sources.push(hybrid_source(deps, table, query, &owner_id, embedding.clone(), clamped));
    }

    gather_rank(deps, query, instruction, sources, clamped).await
}

fn semantic_source(deps: &Deps, query: &str, owner_id: &str, clamped: usize) -> GatherSource {
    let memory = deps.memory.clone();
    let query = query.to_string();
    let owner = owner_id.to_string();
    GatherSource::new(
        "semantic",
        Box::pin(async move { memory.search(&query, &owner, clamped, SearchOptions::default()).await }),
    )
    .with_timeout(deps.config.tool_timeout)
}

fn hybrid_source(deps: &Deps, table: SearchableTable, query: &str, owner_id: &str, embedding: Vec<f32>, clamped: usize) -> GatherSource {
    let storage = deps.storage.clone();
    let owner = owner_id.to_string();
    let text_query = query.to_string();
    let params = HybridSearchParams {
        rrf_k: deps.config.hybrid_rrf_k,
        bm25_weight: deps.config.hybrid_bm25_weight,
        vector_weight: deps.config.hybrid_vector_weight,
        threshold: deps.config.hybrid_threshold,
    };
    let name: &'static str = table.as_str();
    GatherSource::new(
        name,
        Box::pin(async move {
            storage
                .hybrid_search(table, &text_query, &owner, &embedding, clamped, params)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(event = "recall.source.failed", source = name, error = %sanitize(&e));
                    Vec::new()
                })
        }),
    )
    .with_timeout(deps.config.tool_timeout)
}

/// Gather every source in parallel, fuse, rerank (when enabled), then
/// dedup — in that order, so a duplicate's surviving copy is chosen by
/// `rerank_score` when one exists (§4.3.5 item state machine: raw → fused
/// → reranked → deduplicated).
async fn gather_rank(deps: &Deps, query: &str, instruction: Option<&str>, sources: Vec<GatherSource>, clamped: usize) -> Result<Vec<MemoryMatch>> {
    let by_source: HashMap<&'static str, Vec<MemoryMatch>> = second_brain_core::recall::parallel_search_gather(sources).await;
    let fused = reciprocal_rank_fusion(by_source, deps.config.hybrid_rrf_k);

    let reranked = if deps.config.rerank_enabled {
        match tokio::time::timeout(deps.config.tool_timeout, deps.reranker.rerank(query, instruction, fused.clone())).await {
            Ok(Ok(reranked)) => reranked,
            Ok(Err(e)) => {
                tracing::warn!(event = "rerank.failed", error = %sanitize(&e));
                fused
            }
            Err(_) => {
                tracing::warn!(event = "rerank.failed", error = "Timeout failed");
                fused
            }
        }
    } else {
        fused
    };

    let mut deduped = deduplicate(reranked);
    deduped.truncate(clamped);
    Ok(deduped)
}
