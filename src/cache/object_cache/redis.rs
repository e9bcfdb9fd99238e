//! Redis 缓存后端
//!
//! 所有 key 带 `cache.redis.key_prefix` 前缀，多个实例可共用一个 Redis。
//! 验证码状态写在这里时，多个 worker 进程之间共享尝试次数。

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, info};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

// invalidate_all 每次 SCAN 的批量
const SCAN_BATCH: usize = 200;

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.as_str())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 启动时同步 PING 一次，失败则交给启动流程回退到内存缓存
        let mut conn = client
            .get_connection()
            .map_err(|e| format!("Redis connection to {} failed: {e}", redis_config.url))?;
        let pong: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| format!("Redis ping failed: {e}"))?;
        debug!(
            "Redis answered {} (prefix '{}', default TTL {}s)",
            pong, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<_, Option<String>>(self.prefixed(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.prefixed(&key), value, ttl)
            .await
        {
            error!("Failed to insert key '{}' into cache: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        if let Err(e) = conn.del::<_, i64>(self.prefixed(key)).await {
            error!("Failed to remove key '{}': {}", key, e);
        }
    }

    async fn increment(&self, key: &str, ttl: u64) -> Option<u64> {
        let mut conn = self.connection().await?;
        let redis_key = self.prefixed(key);

        let value = match conn.incr::<_, _, u64>(&redis_key, 1u64).await {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to increment key '{}': {}", key, e);
                return None;
            }
        };

        // 第一次自增时设置过期时间
        if value == 1 {
            let ttl = if ttl == 0 { self.default_ttl } else { ttl };
            if let Err(e) = conn.expire::<_, ()>(&redis_key, ttl as i64).await {
                error!("Failed to set expiry on key '{}': {}", key, e);
            }
        }
        Some(value)
    }

    /// 只删除本实例前缀下的 key
    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = format!("{}*", self.key_prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0usize;
        loop {
            let scanned: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;
            let (next, keys) = match scanned {
                Ok(page) => page,
                Err(e) => {
                    error!("Failed to scan keys with prefix '{}': {}", self.key_prefix, e);
                    return;
                }
            };

            if !keys.is_empty() {
                match conn.del::<_, usize>(keys).await {
                    Ok(n) => removed += n,
                    Err(e) => error!("Failed to delete cached keys: {}", e),
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }
        info!("Invalidated {} Redis keys under '{}'", removed, self.key_prefix);
    }
}
