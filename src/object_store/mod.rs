//! 对象存储
//!
//! 头像与请假证明按 bucket/path 存放，通过签名 URL 对外提供限时访问。

pub mod local;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;

pub use local::LocalObjectStore;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 写入对象，目标已存在时返回 Conflict
    async fn upload(&self, bucket: &str, path: &str, data: &[u8]) -> Result<()>;
    /// 读取对象，不存在时返回 None
    async fn read(&self, bucket: &str, path: &str) -> Result<Option<Vec<u8>>>;
    /// 删除对象，不存在视为成功
    async fn remove(&self, bucket: &str, path: &str) -> Result<()>;
    /// 生成限时访问地址
    fn create_signed_url(&self, bucket: &str, path: &str, ttl_seconds: i64) -> Result<String>;
}

pub async fn create_object_store() -> Result<Arc<dyn ObjectStore>> {
    let config = AppConfig::get();
    let store = LocalObjectStore::new(
        &config.storage.root,
        &config.storage.public_base_url,
        &config.jwt.secret,
    )
    .await?;
    Ok(Arc::new(store))
}
