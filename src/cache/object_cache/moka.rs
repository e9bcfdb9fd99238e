use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

#[derive(Clone)]
struct CachedEntry {
    value: String,
    ttl: Duration,
    /// 更新时保留原有的过期时间（计数器）
    keep_expiry: bool,
}

// 按条目的 TTL 过期
struct PerEntryExpiry;

impl Expiry<String, CachedEntry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedEntry,
        _updated_at: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        if value.keep_expiry {
            duration_until_expiry
        } else {
            Some(value.ttl)
        }
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, CachedEntry>,
    default_ttl: Duration,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_settings(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_settings(max_capacity: u64, default_ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}",
            max_capacity
        );
        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl),
        }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        if let Some(entry) = self.inner.get(key).await {
            debug!("Successfully retrieved key: {}", key);
            CacheResult::Found(entry.value)
        } else {
            debug!("Key not found in cache: {}", key);
            CacheResult::NotFound
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner
            .insert(
                key,
                CachedEntry {
                    value,
                    ttl,
                    keep_expiry: false,
                },
            )
            .await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn increment(&self, key: &str, ttl: u64) -> Option<u64> {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };

        // entry 上的计算对同一 key 串行执行
        let result = self
            .inner
            .entry(key.to_string())
            .and_compute_with(|current| {
                let next = current
                    .and_then(|entry| entry.into_value().value.parse::<u64>().ok())
                    .unwrap_or(0)
                    + 1;
                std::future::ready(Op::Put(CachedEntry {
                    value: next.to_string(),
                    ttl,
                    keep_expiry: true,
                }))
            })
            .await;

        match result {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => {
                entry.into_value().value.parse().ok()
            }
            _ => None,
        }
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::traits::ObjectCacheExt;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache
            .insert_raw("otp:a@b.id".to_string(), "v1".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("otp:a@b.id").await,
            CacheResult::Found("v1".to_string())
        );

        cache.remove("otp:a@b.id").await;
        assert_eq!(cache.get_raw("otp:a@b.id").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_per_entry_ttl_expires() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache
            .insert_raw("short".to_string(), "v".to_string(), 1)
            .await;
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_increment_is_atomic() {
        let cache = std::sync::Arc::new(MokaCacheWrapper::with_settings(100, 60));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.increment("otp-attempts:x@y.id", 60).await })
            })
            .collect();

        let mut seen = Vec::new();
        for handle in handles {
            seen.push(handle.await.unwrap().unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (1..=32).collect::<Vec<u64>>());
        assert_eq!(
            cache.get_raw("otp-attempts:x@y.id").await,
            CacheResult::Found("32".to_string())
        );
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache.insert_json("n".to_string(), &vec![1, 2, 3], 0).await;
        assert_eq!(
            cache.get_json::<Vec<i32>>("n").await,
            CacheResult::Found(vec![1, 2, 3])
        );

        // 无法解析的值会被移除
        cache
            .insert_raw("bad".to_string(), "not json".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_json::<Vec<i32>>("bad").await,
            CacheResult::ExistsButNoValue
        );
        assert_eq!(cache.get_raw("bad").await, CacheResult::NotFound);
    }
}
