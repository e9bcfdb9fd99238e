//! 对象缓存
//!
//! 用于保存一次性验证码状态与 bearer token 到用户的映射。
//! 后端以插件形式在进程启动时注册（见 `declare_object_cache_plugin!`），
//! 运行时根据 `cache.type` 选择，失败时回退到内存缓存。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明并注册一个缓存插件
///
/// 类型需提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::KlasError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                }),
            );
        }
    };
}
