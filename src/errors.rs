//! 统一错误处理模块
//!
//! 存储层、对象存储与令牌工具都返回 `KlasError`，由服务层转换为 HTTP 错误响应。
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_klas_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum KlasError {
            $($variant(String),)*
        }

        impl KlasError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(KlasError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(KlasError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(KlasError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl KlasError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        KlasError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_klas_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E002", "Database Configuration Error"),
    DatabaseConnection("E003", "Database Connection Error"),
    DatabaseOperation("E004", "Database Operation Error"),
    Conflict("E005", "Resource Conflict"),
    NotFound("E006", "Resource Not Found"),
    Validation("E007", "Validation Error"),
    FileOperation("E008", "File Operation Error"),
    ObjectStorage("E009", "Object Storage Error"),
    Serialization("E010", "Serialization Error"),
    DateParse("E011", "Date Parse Error"),
    Token("E012", "Token Error"),
}

impl KlasError {
    /// 是否为唯一约束之类的写入冲突
    pub fn is_conflict(&self) -> bool {
        matches!(self, KlasError::Conflict(_))
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for KlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for KlasError {}

// 为常见的错误类型实现 From trait
// 唯一约束冲突单独归类，签到重复写入依赖它返回 409
impl From<sea_orm::DbErr> for KlasError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                KlasError::Conflict(detail)
            }
            _ => KlasError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for KlasError {
    fn from(err: std::io::Error) -> Self {
        KlasError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for KlasError {
    fn from(err: serde_json::Error) -> Self {
        KlasError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for KlasError {
    fn from(err: chrono::ParseError) -> Self {
        KlasError::DateParse(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for KlasError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        KlasError::Token(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KlasError>;
