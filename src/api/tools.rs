//! Tool catalog lookups fronted by a TTL cache
//!
//! The node picker asks for the tool list on every open; the directory serves
//! it from cache until the TTL lapses or someone invalidates it.

use crate::api::backend::{ToolSource, ToolSummary};
use crate::api::cache::{Clock, TtlCache};
use crate::error::BackendError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const ALL_TOOLS_KEY: &str = "all";

/// Cached view over a `ToolSource`
pub struct ToolDirectory {
    source: Arc<dyn ToolSource>,
    cache: RwLock<TtlCache<String, Arc<Vec<ToolSummary>>>>,
}

impl ToolDirectory {
    pub fn new(source: Arc<dyn ToolSource>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cache: RwLock::new(TtlCache::new(ttl, clock)),
        }
    }

    /// All tools, fetched from the source only when the cached list is stale
    pub async fn tools(&self) -> Result<Arc<Vec<ToolSummary>>, BackendError> {
        let key = ALL_TOOLS_KEY.to_string();

        {
            let mut cache = self.cache.write().await;
            if let Some(tools) = cache.get(&key) {
                return Ok(tools);
            }
        }

        tracing::debug!("Tool cache miss, fetching catalog");
        let tools = Arc::new(self.source.list_tools().await?);

        let mut cache = self.cache.write().await;
        cache.set(key, Arc::clone(&tools));
        tracing::debug!("Cached {} tools", tools.len());

        Ok(tools)
    }

    /// Look up one tool by name
    pub async fn find(&self, name: &str) -> Result<Option<ToolSummary>, BackendError> {
        let tools = self.tools().await?;
        Ok(tools.iter().find(|tool| tool.name == name).cloned())
    }

    /// Force the next `tools` call to hit the source
    pub async fn invalidate(&self) {
        self.cache.write().await.invalidate(&ALL_TOOLS_KEY.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::cache::ManualClock;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ToolSource for CountingSource {
        async fn list_tools(&self) -> Result<Vec<ToolSummary>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ToolSummary {
                name: "web_search".to_string(),
                description: None,
                parameters_schema: serde_json::Value::Null,
            }])
        }
    }

    #[tokio::test]
    async fn serves_from_cache_until_ttl_or_invalidate() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
        let directory = ToolDirectory::new(source.clone(), Duration::from_secs(300), clock.clone());

        directory.tools().await.unwrap();
        assert!(directory.find("web_search").await.unwrap().is_some());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(301));
        directory.tools().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        directory.invalidate().await;
        assert!(directory.find("missing").await.unwrap().is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }
}
