use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::AuthService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ErrorCode,
    auth::{RefreshTokenRequest, RefreshTokenResponse, UserInfoResponse},
};
use crate::services::error_response;
use crate::utils::jwt::JwtUtils;

pub async fn handle_refresh_token(
    service: &AuthService,
    body: RefreshTokenRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = body
        .refresh_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "refresh_token is required",
        ));
    };

    match JwtUtils::refresh_access_token(refresh_token) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(RefreshTokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: service.get_config().jwt.access_token_expiry * 60,
        })),
        Err(e) => {
            info!("Refresh token rejected: {}", e);
            Ok(error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::InvalidToken,
                "Invalid or expired refresh token",
            ))
        }
    }
}

pub async fn handle_get_user(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user(request) {
        Some(user) => Ok(HttpResponse::Ok().json(UserInfoResponse { user })),
        None => Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized",
        )),
    }
}
