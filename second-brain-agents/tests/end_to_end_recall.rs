//! End-to-end recall and pipeline scenarios (spec §8).

use second_brain_agents::embedding::{HashEmbedder, PassthroughReranker};
use second_brain_agents::{create_deps_with_fleet, registry, PipelineStep};
use second_brain_core::clock::SystemClock;
use second_brain_core::config::{Config, MemoryProvider, ModelProvider};
use second_brain_core::domain::{CategorizedEntry, MemoryContent};
use second_brain_core::memory_service::MemoryService as _;
use second_brain_core::storage_service::{SearchableTable, StorageService as _};
use second_brain_memory::StubMemoryService;
use second_brain_storage::{InMemorySqlExecutor, SqlStorageService};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn config() -> Config {
    Config {
        user_id: "u1".to_string(),
        memory_provider: MemoryProvider::None,
        model_provider: ModelProvider::Auto,
        model_fallback_chain: Vec::new(),
        agent_model_overrides: HashMap::new(),
        memory_search_limit: 10,
        rerank_enabled: false,
        rerank_model: "voyage-rerank-2".to_string(),
        rerank_top_k: 10,
        rerank_oversample_multiplier: 2.0,
        hybrid_rrf_k: 60.0,
        hybrid_threshold: 0.0,
        hybrid_bm25_weight: 0.3,
        hybrid_vector_weight: 0.7,
        idle_reconnect_seconds: 240,
        api_key: None,
        tool_timeout: Duration::from_secs(5),
        deadline: Duration::from_secs(10),
    }
}

async fn deps() -> second_brain_agents::Deps {
    let clock = Arc::new(SystemClock);
    let memory = Arc::new(StubMemoryService::new(clock, Duration::from_secs(240)));
    let storage = Arc::new(SqlStorageService::new(Arc::new(InMemorySqlExecutor::default())));
    let embedder = Arc::new(HashEmbedder::default());
    let reranker = Arc::new(PassthroughReranker);
    create_deps_with_fleet(memory, storage, config(), embedder, reranker)
}

/// Scenario 1: a simple query recalls across semantic memory and the
/// `patterns` hybrid table, deduplicated, without reranking.
#[tokio::test]
async fn quick_recall_gathers_semantic_and_pattern_matches() {
    let deps = deps().await;
    deps.memory
        .add(MemoryContent::Text("JWT auth patterns for service-to-service calls".to_string()), "u1", None)
        .await
        .unwrap();
    deps.storage
        .insert_entry(SearchableTable::Patterns, CategorizedEntry::new("u1", "use short-lived JWTs with rotation", Some("pattern".to_string()), vec!["auth".to_string()]))
        .await
        .unwrap();

    let matches = second_brain_agents::quick_recall(&deps, "JWT auth patterns", 5).await.unwrap();
    assert!(!matches.is_empty());
    assert!(matches.len() <= 5);
}

/// Scenario 2: a complex query is classified as such and routed through
/// `recall_deep`, which gathers over every whitelisted table.
#[tokio::test]
async fn complex_query_routes_through_recall_deep() {
    let deps = deps().await;
    for table in [SearchableTable::Patterns, SearchableTable::Examples, SearchableTable::Knowledge, SearchableTable::Experiences] {
        deps.storage
            .insert_entry(table, CategorizedEntry::new("u1", "JWT vs session auth example with gotchas", None, Vec::new()))
            .await
            .unwrap();
    }

    let matches = second_brain_agents::quick_recall(&deps, "Compare JWT vs session auth, show examples, list gotchas", 5).await.unwrap();
    assert!(matches.len() <= 5);
}

/// Scenario 5: a two-step pipeline (learn, review) with no error entries.
#[tokio::test]
async fn pipeline_runs_learn_then_review_with_no_errors() {
    let deps = deps().await;
    let project = deps.storage.create_project(second_brain_core::domain::Project::new("u1", "Ship auth", "desc")).await.unwrap();

    let steps = vec![
        PipelineStep::new(
            "learn",
            serde_json::json!({
                "topic": "jwt-auth",
                "content": "short-lived JWTs with rotation reduce blast radius",
                "keywords": ["auth", "jwt"],
            }),
        ),
        PipelineStep::new(
            "review",
            serde_json::json!({
                "project_id": project.id,
                "content": "because the evidence specifically shows data supporting rotation, for example shorter tokens",
            }),
        ),
    ];

    let outcomes = second_brain_agents::run_pipeline(steps, &deps).await;
    assert_eq!(outcomes.len(), 2);
    for outcome in outcomes.values() {
        assert!(matches!(outcome, second_brain_agents::StepOutcome::Ok(_)));
    }
}

/// Agent fleet membership is exactly the fixed 13 names, reachable through
/// the registry `default_fleet` builds.
#[tokio::test]
async fn default_fleet_resolves_every_fixed_agent_name() {
    let deps = deps().await;
    for name in registry::AGENT_NAMES {
        assert!(deps.registry.get(name).is_some(), "missing agent: {name}");
    }
}
