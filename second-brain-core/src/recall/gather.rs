//! Structured parallel gather (§4.3 phase 3, §9 REDESIGN FLAG).
//!
//! Replaces an opaque `object`-typed awaitable with a concrete
//! `SourceFuture` type, so a caller that accidentally passes something
//! that isn't a future of `Vec<MemoryMatch>` is caught at compile time.

use crate::domain::MemoryMatch;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::warn;

/// A boxed, type-erased future yielding a source's matches. Concrete enough
/// that misuse (passing a non-future) fails to compile.
pub type SourceFuture = Pin<Box<dyn Future<Output = Vec<MemoryMatch>> + Send>>;

/// One named source to gather, with an optional independent timeout.
pub struct GatherSource {
    pub name: &'static str,
    pub future: SourceFuture,
    pub timeout: Option<Duration>,
}

impl GatherSource {
    #[must_use]
    pub fn new(name: &'static str, future: SourceFuture) -> Self {
        Self {
            name,
            future,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Launch every source concurrently and assemble a `source_name →
/// matches` map. A failure or timeout in one source yields `[]` for that
/// source and is logged; it never aborts the whole call (§4.3 phase 3).
pub async fn parallel_search_gather(
    sources: Vec<GatherSource>,
) -> HashMap<&'static str, Vec<MemoryMatch>> {
    let tasks = sources.into_iter().map(|source| async move {
        let GatherSource {
            name,
            future,
            timeout,
        } = source;
        let matches = match timeout {
            Some(duration) => match tokio::time::timeout(duration, future).await {
                Ok(matches) => matches,
                Err(_) => {
                    warn!(source = name, "recall.source.timeout");
                    Vec::new()
                }
            },
            None => future.await,
        };
        (name, matches)
    });

    futures::future::join_all(tasks).await.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchSource, MemoryMatch};

    fn ok_source(name: &'static str) -> GatherSource {
        GatherSource::new(
            name,
            Box::pin(async move { vec![MemoryMatch::new(MatchSource::Mem0, "1", "hi", 0.5)] }),
        )
    }

    fn slow_source(name: &'static str) -> GatherSource {
        GatherSource::new(name, Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            vec![MemoryMatch::new(MatchSource::Vector, "2", "slow", 0.9)]
        }))
        .with_timeout(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn gathers_all_sources_concurrently() {
        let results = parallel_search_gather(vec![ok_source("a"), ok_source("b")]).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results["a"].len(), 1);
        assert_eq!(results["b"].len(), 1);
    }

    #[tokio::test]
    async fn timed_out_source_yields_empty_without_failing_call() {
        let results = parallel_search_gather(vec![ok_source("fast"), slow_source("slow")]).await;
        assert_eq!(results["fast"].len(), 1);
        assert!(results["slow"].is_empty());
    }
}
