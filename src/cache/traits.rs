use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错或值无法解析
    ExistsButNoValue,
}

impl<T> CacheResult<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheResult::Found(value) => Some(value),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;

    /// `ttl` 为秒，0 表示使用后端默认值
    async fn insert_raw(&self, key: String, value: String, ttl: u64);

    async fn remove(&self, key: &str);

    /// 原子自增计数器并返回新值，key 不存在时从 0 开始
    ///
    /// `ttl` 只在创建时生效，之后的自增不延长过期时间。后端出错时返回 None。
    async fn increment(&self, key: &str, ttl: u64) -> Option<u64>;

    async fn invalidate_all(&self);
}

/// JSON 序列化的便捷读写
#[async_trait]
pub trait ObjectCacheExt: ObjectCache {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(raw) => match serde_json::from_str(&raw) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    tracing::debug!("Failed to deserialize cached value for {}: {}", key, e);
                    self.remove(key).await;
                    CacheResult::ExistsButNoValue
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    async fn insert_json<T: Serialize + Sync>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.insert_raw(key, raw, ttl).await,
            Err(e) => tracing::error!("Failed to serialize cache value for {}: {}", key, e),
        }
    }
}

impl<C: ObjectCache + ?Sized> ObjectCacheExt for C {}
