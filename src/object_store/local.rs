use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::ObjectStore;
use crate::errors::{KlasError, Result};
use crate::utils::jwt::JwtUtils;

/// 本地文件系统对象存储，每个 bucket 对应根目录下的一个子目录
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
    secret: String,
}

impl LocalObjectStore {
    pub async fn new(root: &str, public_base_url: &str, secret: &str) -> Result<Self> {
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|e| KlasError::object_storage(format!("创建存储目录 {root} 失败: {e}")))?;

        debug!("LocalObjectStore created at '{}'", root);

        Ok(Self {
            root: PathBuf::from(root),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            secret: secret.to_string(),
        })
    }

    /// 拼接对象路径，拒绝绝对路径与 `..`
    fn resolve(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        if bucket.is_empty() || path.is_empty() {
            return Err(KlasError::object_storage("bucket 与 path 不能为空"));
        }

        let mut full = self.root.clone();
        for part in [bucket, path] {
            for component in Path::new(part).components() {
                match component {
                    Component::Normal(segment) => full.push(segment),
                    _ => {
                        return Err(KlasError::object_storage(format!(
                            "非法的对象路径: {bucket}/{path}"
                        )));
                    }
                }
            }
        }
        Ok(full)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(&self, bucket: &str, path: &str, data: &[u8]) -> Result<()> {
        let target = self.resolve(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
        {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(KlasError::conflict(format!("对象已存在: {bucket}/{path}")));
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = file.write_all(data).await {
            let _ = tokio::fs::remove_file(&target).await;
            return Err(KlasError::object_storage(format!("写入对象失败: {e}")));
        }
        file.flush().await?;

        debug!("Stored object {}/{} ({} bytes)", bucket, path, data.len());
        Ok(())
    }

    async fn read(&self, bucket: &str, path: &str) -> Result<Option<Vec<u8>>> {
        let target = self.resolve(bucket, path)?;
        match tokio::fs::read(&target).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        let target = self.resolve(bucket, path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn create_signed_url(&self, bucket: &str, path: &str, ttl_seconds: i64) -> Result<String> {
        // 只做路径校验，不检查对象是否存在
        self.resolve(bucket, path)?;
        let token = JwtUtils::sign_object(&self.secret, bucket, path, ttl_seconds)?;
        Ok(format!("{}/files/signed/{}", self.public_base_url, token))
    }
}
