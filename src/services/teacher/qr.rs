use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{error, info};

use crate::middlewares::RequireTeacher;
use crate::models::ErrorCode;
use crate::models::teachers::{GenerateQrRequest, QrTokenResponse};
use crate::services::error_response;
use crate::utils::jwt::JwtUtils;

pub async fn handle_generate_qr(
    request: &HttpRequest,
    body: GenerateQrRequest,
) -> ActixResult<HttpResponse> {
    let Some(teacher) = RequireTeacher::extract_teacher(request) else {
        return Ok(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::Forbidden,
            "Teacher profile not found",
        ));
    };

    let Some(class_id) = body.class_id else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "class_id is required",
        ));
    };

    match JwtUtils::generate_qr_token(class_id, teacher.id) {
        Ok((token, expires_in)) => {
            info!("Teacher {} issued QR token for class {}", teacher.id, class_id);
            Ok(HttpResponse::Ok().json(QrTokenResponse {
                token,
                expires_in,
                class_id,
            }))
        }
        Err(e) => {
            error!("Failed to sign QR token: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "Failed to generate QR token",
            ))
        }
    }
}
