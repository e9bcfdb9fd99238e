pub mod rate_limit;
pub mod require_jwt;
pub mod require_teacher;

pub use rate_limit::RateLimit;
pub use require_jwt::RequireJWT;
pub use require_teacher::RequireTeacher;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::models::{ErrorCode, ErrorResponse};

// 中间件统一的错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ErrorResponse::new(code, message)),
    }
}
