use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{error, info, warn};

use super::AuthService;
use super::otp::consume_code;
use crate::models::{
    ErrorCode,
    auth::{SessionResponse, VerifyOtpRequest, VerifyOtpResponse},
};
use crate::services::{error_response, storage_failure};
use crate::utils::validate::normalize_email;

pub async fn handle_verify(
    service: &AuthService,
    request: &HttpRequest,
    body: VerifyOtpRequest,
) -> ActixResult<HttpResponse> {
    let email = body.email.as_deref().map(normalize_email).unwrap_or_default();
    let code = body.token.as_deref().map(str::trim).unwrap_or_default();
    if email.is_empty() || code.is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "email and token are required",
        ));
    }

    let config = service.get_config();
    let cache = service.get_cache(request);

    if !consume_code(cache.as_ref(), &email, code, &config.auth).await {
        info!("Rejected sign-in code for {}", email);
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidOtp,
            "Invalid or expired OTP",
        ));
    }

    let storage = service.get_storage(request);
    let user = match storage.get_or_create_user_by_email(&email).await {
        Ok(user) => user,
        Err(e) => return Ok(storage_failure("Failed to load user", e)),
    };

    // 登录时间更新失败不影响登录
    let user = match storage.touch_last_sign_in(user.id).await {
        Ok(Some(updated)) => updated,
        Ok(None) => user,
        Err(e) => {
            warn!("Failed to update last sign-in for user {}: {}", user.id, e);
            user
        }
    };

    match user.generate_token_pair() {
        Ok(pair) => {
            info!("User {} signed in", user.email);
            Ok(HttpResponse::Ok().json(VerifyOtpResponse {
                user,
                session: SessionResponse {
                    access_token: pair.access_token,
                    refresh_token: pair.refresh_token,
                    token_type: "bearer".to_string(),
                    expires_in: config.jwt.access_token_expiry * 60,
                },
            }))
        }
        Err(e) => {
            error!("Failed to generate token pair: {}", e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "Sign-in failed, unable to generate token",
            ))
        }
    }
}
