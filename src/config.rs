//! Process-wide configuration.
//!
//! The only setting is the cache backend. It is consulted once, when the
//! shared [`crate::GathererAccess`] instance is first used; changes made
//! after that point do not affect the already-built instance. Embedders that
//! need per-instance control should construct [`crate::GathererAccess::new`]
//! directly with the store of their choice.

use crate::cache::{FetchCache, MemoryCache, NoopCache};
use std::sync::{Arc, Mutex};

/// Which store backs the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    /// In-process map, no expiry. The default.
    #[default]
    Memory,
    /// No caching; every fetch goes to the network.
    Disabled,
}

/// Mutable process-wide settings.
#[derive(Debug, Default)]
pub struct Configuration {
    pub cache: CacheBackend,
}

impl Configuration {
    /// Resolve the configured backend to a concrete store instance.
    pub fn cache_store(&self) -> Arc<dyn FetchCache> {
        match self.cache {
            CacheBackend::Memory => Arc::new(MemoryCache::new()),
            CacheBackend::Disabled => Arc::new(NoopCache::new()),
        }
    }
}

static CONFIG: Mutex<Configuration> = Mutex::new(Configuration {
    cache: CacheBackend::Memory,
});

/// Mutate the global configuration.
///
/// ```
/// gatherer_access::configure(|cfg| cfg.cache = gatherer_access::CacheBackend::Disabled);
/// ```
pub fn configure(f: impl FnOnce(&mut Configuration)) {
    let mut config = CONFIG.lock().unwrap_or_else(|e| e.into_inner());
    f(&mut config);
}

/// Resolve a cache store from the current global configuration.
pub(crate) fn cache_store() -> Arc<dyn FetchCache> {
    CONFIG
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .cache_store()
}
