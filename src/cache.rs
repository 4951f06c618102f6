//! Fetch-or-compute response caching.
//!
//! The client depends only on the [`FetchCache`] contract: a miss runs the
//! supplied compute future and stores its result, a hit returns the stored
//! response without any network I/O. Which store backs it is a configuration
//! concern — [`MemoryCache`] by default, [`NoopCache`] to disable caching.

use crate::error::Result;
use crate::response::GathererResponse;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Key for a cached response: operation tag, method tag, exact URI string.
///
/// Every distinct resolved URI gets its own entry — redirect hops are cached
/// under their own targets, never under the original request's key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub op: &'static str,
    pub method: &'static str,
    pub uri: String,
}

impl CacheKey {
    /// Key for a GET issued by the access layer.
    pub fn get(uri: impl Into<String>) -> Self {
        Self {
            op: "gatherer_access",
            method: "get",
            uri: uri.into(),
        }
    }
}

/// Fetch-or-compute store contract.
///
/// Implementations decide retention; the access layer mandates no TTL or
/// eviction policy. Thread-safety of `fetch` is the store's responsibility.
#[async_trait]
pub trait FetchCache: Send + Sync {
    /// Return the cached response for `key`, or run `compute`, store its
    /// result, and return it.
    async fn fetch(
        &self,
        key: CacheKey,
        compute: BoxFuture<'_, Result<GathererResponse>>,
    ) -> Result<GathererResponse>;
}

/// In-process response cache with no expiry.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, GathererResponse>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached responses.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl FetchCache for MemoryCache {
    async fn fetch(
        &self,
        key: CacheKey,
        compute: BoxFuture<'_, Result<GathererResponse>>,
    ) -> Result<GathererResponse> {
        // The lock is held across the compute future, so overlapping fetches
        // are serialized and a URI is never fetched twice concurrently.
        let mut entries = self.entries.lock().await;
        if let Some(hit) = entries.get(&key) {
            tracing::debug!(uri = %key.uri, "cache hit");
            return Ok(hit.clone());
        }
        tracing::debug!(uri = %key.uri, "cache miss");
        let value = compute.await?;
        entries.insert(key, value.clone());
        Ok(value)
    }
}

/// Store that caches nothing; every fetch computes.
#[derive(Default)]
pub struct NoopCache;

impl NoopCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FetchCache for NoopCache {
    async fn fetch(
        &self,
        _key: CacheKey,
        compute: BoxFuture<'_, Result<GathererResponse>>,
    ) -> Result<GathererResponse> {
        compute.await
    }
}
