/// Cache of compiled recursive statements
///
/// Assembling the CTE around a seed is deterministic in
/// `(entity, navigation, normalized seed SQL)`, so the statement text can be
/// reused across requests whose seeds only differ in parameter values.
///
/// Cache Key: (entity, navigation, normalized seed SQL with `{i}` placeholders)
/// Cache Value: compiled statement text with `{i}` placeholders
///
/// Parameter values are never cached; they always come from the current seed.
/// Results are identical with the cache disabled.
///
/// # Configuration
///
/// Built from `ServerConfig::cache_config` (`query_cache_enabled`,
/// `query_cache_max_entries`); a size of zero disables caching.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub entity: String,
    pub navigation: String,
    pub seed_sql: String,
}

impl CacheKey {
    pub fn new(entity: &str, navigation: &str, seed_sql: &str) -> Self {
        CacheKey {
            entity: entity.to_string(),
            navigation: navigation.to_string(),
            seed_sql: seed_sql.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    sql_template: String,
    /// Logical clock value of the last access (for LRU)
    last_accessed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCacheConfig {
    pub enabled: bool,
    /// Maximum number of entries (LRU eviction)
    pub max_entries: usize,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        QueryCacheConfig {
            enabled: true,
            max_entries: 1000,
        }
    }
}

impl QueryCacheConfig {
    pub fn disabled() -> Self {
        QueryCacheConfig {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Compiled statement cache with LRU eviction
pub struct CompiledQueryCache {
    cache: Mutex<HashMap<CacheKey, CacheEntry>>,
    config: QueryCacheConfig,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CompiledQueryCache {
    pub fn new(config: QueryCacheConfig) -> Self {
        CompiledQueryCache {
            cache: Mutex::new(HashMap::new()),
            config,
            clock: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && self.config.max_entries > 0
    }

    // the map is consistent between operations, so poisoning is ignored
    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        let now = self.tick();
        let mut cache = self.entries();
        if let Some(entry) = cache.get_mut(key) {
            entry.last_accessed = now;
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::debug!("Compiled query cache hit for {}.{}", key.entity, key.navigation);
            Some(entry.sql_template.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            log::debug!("Compiled query cache miss for {}.{}", key.entity, key.navigation);
            None
        }
    }

    /// Insert a compiled template, evicting the least recently used entry
    /// when the cache is full
    pub fn insert(&self, key: CacheKey, sql_template: String) {
        if !self.is_enabled() {
            return;
        }

        let entry = CacheEntry {
            sql_template,
            last_accessed: self.tick(),
        };
        let mut cache = self.entries();
        if !cache.contains_key(&key) && cache.len() >= self.config.max_entries {
            self.evict_lru(&mut cache);
        }
        cache.insert(key, entry);
    }

    fn evict_lru(&self, cache: &mut HashMap<CacheKey, CacheEntry>) {
        if let Some(key) = cache
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone())
        {
            cache.remove(&key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            log::debug!("Evicted compiled query for {}.{}", key.entity, key.navigation);
        }
    }

    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            size: self.entries().len(),
            max_entries: self.config.max_entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
    pub max_entries: usize,
}

impl CacheMetrics {
    /// Cache hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
