use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 错误代码，序列化为大写下划线形式（如 "ATTENDANCE_ALREADY_EXISTS"）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../clients/types/generated/api.ts")]
pub enum ErrorCode {
    // 请求格式
    InvalidJson,
    MissingField,
    InvalidTime,

    // 认证授权
    Unauthorized,
    InvalidToken,
    InvalidOtp,
    Forbidden,
    RateLimited,

    // 资源
    NotFound,
    StudentNotFound,
    StudentNotLinked,
    StudentNotInClass,
    AccountAlreadyLinked,

    // 考勤
    AttendanceAlreadyExists,
    InvalidStatus,
    AttachmentRequired,
    InvalidQrToken,

    // 管理后台
    TableNotAllowed,

    // 文件
    InvalidFileType,
    FileTooLarge,

    // 服务端
    ConfigurationError,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidJson => "INVALID_JSON",
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::InvalidTime => "INVALID_TIME",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::InvalidOtp => "INVALID_OTP",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::StudentNotFound => "STUDENT_NOT_FOUND",
            ErrorCode::StudentNotLinked => "STUDENT_NOT_LINKED",
            ErrorCode::StudentNotInClass => "STUDENT_NOT_IN_CLASS",
            ErrorCode::AccountAlreadyLinked => "ACCOUNT_ALREADY_LINKED",
            ErrorCode::AttendanceAlreadyExists => "ATTENDANCE_ALREADY_EXISTS",
            ErrorCode::InvalidStatus => "INVALID_STATUS",
            ErrorCode::AttachmentRequired => "ATTACHMENT_REQUIRED",
            ErrorCode::InvalidQrToken => "INVALID_QR_TOKEN",
            ErrorCode::TableNotAllowed => "TABLE_NOT_ALLOWED",
            ErrorCode::InvalidFileType => "INVALID_FILE_TYPE",
            ErrorCode::FileTooLarge => "FILE_TOO_LARGE",
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
