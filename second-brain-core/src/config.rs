//! Dependency-container configuration (§4.6), loaded from environment
//! variables. Unknown keys are ignored with a warning; missing required
//! keys abort initialization with a descriptive error.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryProvider {
    Semantic,
    Graph,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelProvider {
    Auto,
    Anthropic,
    OllamaLocal,
    OllamaCloud,
    Openai,
    Groq,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub user_id: String,
    pub memory_provider: MemoryProvider,
    pub model_provider: ModelProvider,
    pub model_fallback_chain: Vec<ModelProvider>,
    pub agent_model_overrides: HashMap<String, ModelProvider>,
    pub memory_search_limit: usize,
    pub rerank_enabled: bool,
    pub rerank_model: String,
    pub rerank_top_k: usize,
    pub rerank_oversample_multiplier: f32,
    pub hybrid_rrf_k: f64,
    pub hybrid_threshold: f32,
    pub hybrid_bm25_weight: f32,
    pub hybrid_vector_weight: f32,
    pub idle_reconnect_seconds: u64,
    pub api_key: Option<String>,
    pub tool_timeout: Duration,
    pub deadline: Duration,
}

impl Config {
    pub fn idle_reconnect_duration(&self) -> Duration {
        Duration::from_secs(self.idle_reconnect_seconds)
    }

    /// Load configuration from environment variables. Required: `BRAIN_USER_ID`.
    /// Unknown `SECOND_BRAIN_*`/`BRAIN_*` keys are not validated here (that
    /// happens at the call site that reads them) but any key this loader
    /// doesn't recognize among the ones it inspects is simply left at its
    /// default, with a warning logged for visibility.
    pub fn from_env() -> Result<Self> {
        let user_id = std::env::var("BRAIN_USER_ID").map_err(|_| {
            Error::Configuration("BRAIN_USER_ID is required but was not set".to_string())
        })?;

        let memory_provider = parse_enum_env(
            "MEMORY_PROVIDER",
            MemoryProvider::Semantic,
            |s| match s {
                "semantic" => Some(MemoryProvider::Semantic),
                "graph" => Some(MemoryProvider::Graph),
                "none" => Some(MemoryProvider::None),
                _ => None,
            },
        );

        let model_provider = parse_enum_env("MODEL_PROVIDER", ModelProvider::Auto, parse_model_provider);

        let model_fallback_chain = std::env::var("MODEL_FALLBACK_CHAIN")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .filter_map(|s| parse_model_provider(s.trim()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            user_id,
            memory_provider,
            model_provider,
            model_fallback_chain,
            agent_model_overrides: HashMap::new(),
            memory_search_limit: parse_numeric_env("MEMORY_SEARCH_LIMIT", 10),
            rerank_enabled: parse_bool_env("RERANK_ENABLED", true),
            rerank_model: std::env::var("RERANK_MODEL").unwrap_or_else(|_| "voyage-rerank-2".to_string()),
            rerank_top_k: parse_numeric_env("RERANK_TOP_K", 10),
            rerank_oversample_multiplier: parse_float_env("RERANK_OVERSAMPLE_MULTIPLIER", 3.0),
            hybrid_rrf_k: parse_float_env("HYBRID_RRF_K", crate::recall::DEFAULT_RRF_K) as f64,
            hybrid_threshold: parse_float_env("HYBRID_THRESHOLD", 0.0),
            hybrid_bm25_weight: parse_float_env("HYBRID_BM25_WEIGHT", 0.3),
            hybrid_vector_weight: parse_float_env("HYBRID_VECTOR_WEIGHT", 0.7),
            idle_reconnect_seconds: parse_numeric_env("IDLE_RECONNECT_SECONDS", 240),
            api_key: std::env::var("API_KEY").ok().filter(|s| !s.is_empty()),
            tool_timeout: Duration::from_secs(parse_numeric_env("TOOL_TIMEOUT_SECONDS", 30)),
            deadline: Duration::from_secs(parse_numeric_env("DEADLINE_SECONDS", 120)),
        })
    }
}

fn parse_model_provider(s: &str) -> Option<ModelProvider> {
    match s {
        "auto" => Some(ModelProvider::Auto),
        "anthropic" => Some(ModelProvider::Anthropic),
        "ollama-local" => Some(ModelProvider::OllamaLocal),
        "ollama-cloud" => Some(ModelProvider::OllamaCloud),
        "openai" => Some(ModelProvider::Openai),
        "groq" => Some(ModelProvider::Groq),
        _ => None,
    }
}

fn parse_enum_env<T: Copy>(key: &str, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
    match std::env::var(key) {
        Ok(raw) => parse(raw.trim()).unwrap_or_else(|| {
            warn!(key, value = raw.as_str(), "unrecognized config value, using default");
            default
        }),
        Err(_) => default,
    }
}

fn parse_numeric_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_float_env(key: &str, default: f32) -> f32 {
    parse_numeric_env(key, default)
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn from_env_requires_user_id() {
        // SAFETY: test-only env mutation, serialized via #[serial].
        unsafe { std::env::remove_var("BRAIN_USER_ID") };
        let result = Config::from_env();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn from_env_applies_defaults() {
        unsafe {
            std::env::set_var("BRAIN_USER_ID", "u1");
            std::env::remove_var("MEMORY_SEARCH_LIMIT");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.user_id, "u1");
        assert_eq!(config.memory_search_limit, 10);
        assert_eq!(config.idle_reconnect_seconds, 240);
        unsafe { std::env::remove_var("BRAIN_USER_ID") };
    }
}
