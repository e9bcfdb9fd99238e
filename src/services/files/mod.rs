use actix_web::{
    HttpRequest, HttpResponse, Result as ActixResult,
    http::{StatusCode, header::CONTENT_TYPE},
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::object_store::ObjectStore;
use crate::services::error_response;
use crate::utils::SafeSignedToken;
use crate::utils::file_magic::content_type_for_path;
use crate::utils::jwt::JwtUtils;

pub struct FileService;

impl FileService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_object_store(&self, request: &HttpRequest) -> Arc<dyn ObjectStore> {
        crate::services::app_object_store(request)
    }

    // 通过签名地址读取对象
    pub async fn download_signed(
        &self,
        request: &HttpRequest,
        token: SafeSignedToken,
    ) -> ActixResult<HttpResponse> {
        let claims = match JwtUtils::verify_object(&AppConfig::get().jwt.secret, &token.0) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Signed URL rejected: {}", e);
                return Ok(error_response(
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::InvalidToken,
                    "Invalid or expired signed URL",
                ));
            }
        };

        match self
            .get_object_store(request)
            .read(&claims.bucket, &claims.path)
            .await
        {
            Ok(Some(data)) => Ok(HttpResponse::Ok()
                .insert_header((CONTENT_TYPE, content_type_for_path(&claims.path)))
                .body(data)),
            Ok(None) => Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
                "File not found",
            )),
            Err(e) => {
                error!("Failed to read {}/{}: {}", claims.bucket, claims.path, e);
                Ok(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    "Failed to read file",
                ))
            }
        }
    }
}
