use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::object_store::ObjectStore;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub object_store: Arc<dyn ObjectStore>,
}

// 缓存后端不可用时回退到内存缓存
const FALLBACK_CACHE: &str = "moka";

async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let Some(constructor) = get_object_cache_plugin(name) else {
        warn!("Cache backend '{}' not found in registry", name);
        return None;
    };

    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }

    if cache_type != FALLBACK_CACHE {
        warn!("Falling back to in-memory cache");
        if let Some(cache) = try_cache_backend(FALLBACK_CACHE).await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 按 ADMIN_EMAIL 确保管理员账号存在
async fn seed_admin(storage: &Arc<dyn Storage>) {
    let Some(email) = std::env::var("ADMIN_EMAIL")
        .ok()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
    else {
        debug!("ADMIN_EMAIL not set, skipping admin seed");
        return;
    };

    match storage.ensure_admin(&email).await {
        Ok(user) => info!("Admin account ready (ID: {}, email: {})", user.id, user.email),
        Err(e) => warn!("Failed to seed admin account {}: {}", email, e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和对象存储
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    let object_store = crate::object_store::create_object_store()
        .await
        .expect("Failed to create object store");
    warn!(
        "Object store initialized at {}",
        AppConfig::get().storage.root
    );

    StartupContext {
        storage,
        cache,
        object_store,
    }
}
