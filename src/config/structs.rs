use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub argon2: Argon2Config,
    pub auth: AuthConfig,
    pub attendance: AttendanceConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    pub storage: ObjectStorageConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub unix_socket_path: String,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub secret: String,
    pub access_token_expiry: i64,  // 分钟
    pub refresh_token_expiry: i64, // 天
}

/// Argon2 参数（用于哈希一次性验证码）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

/// 邮箱验证码登录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub otp_length: usize,
    pub otp_ttl: u64, // 秒
    pub otp_max_attempts: u32,
}

/// 考勤配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceConfig {
    /// 学校所在时区相对 UTC 的偏移（分钟），默认 Asia/Jakarta
    pub utc_offset_minutes: i32,
    pub qr_token_ttl: i64, // 秒
    #[serde(skip_serializing, default)]
    pub qr_secret: String,
    pub history_default_limit: u64,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(rename = "type")]
    pub cache_type: String,
    pub default_ttl: u64,
    pub redis: RedisConfig,
    pub memory: MemoryConfig,
}

/// Redis 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
    pub pool_size: u64,
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub max_age: usize,
}

/// 对象存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    pub root: String,            // 本地存储根目录，每个 bucket 一个子目录
    pub public_base_url: String, // 生成签名 URL 时使用的外部访问地址
    pub avatar: BucketConfig,
    pub attachment: BucketConfig,
}

/// 单个 bucket 的上传策略
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketConfig {
    pub bucket: String,
    pub max_size: usize,            // 单文件最大字节数
    pub signed_url_ttl: i64,        // 签名 URL 有效期（秒）
    pub allowed_types: Vec<String>, // 允许的 MIME 类型
}
