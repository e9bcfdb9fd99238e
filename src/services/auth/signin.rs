use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{error, info};

use super::AuthService;
use super::otp::issue_code;
use crate::models::{ErrorCode, MessageResponse, auth::SignInRequest};
use crate::services::error_response;
use crate::utils::validate::{normalize_email, validate_email};

pub async fn handle_signin(
    service: &AuthService,
    request: &HttpRequest,
    body: SignInRequest,
) -> ActixResult<HttpResponse> {
    let Some(email) = body
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|email| !email.is_empty())
    else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "email is required",
        ));
    };

    if validate_email(&email).is_err() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidJson,
            "Invalid email format",
        ));
    }

    let config = service.get_config();
    let cache = service.get_cache(request);

    let code = match issue_code(cache.as_ref(), &email, &config.auth).await {
        Ok(code) => code,
        Err(e) => {
            error!("Failed to issue sign-in code for {}: {}", email, e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "Failed to send OTP",
            ));
        }
    };

    if let Err(e) = service.get_otp_sender(request).send(&email, &code).await {
        error!("Failed to deliver sign-in code to {}: {}", email, e);
        return Ok(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            "Failed to send OTP",
        ));
    }

    info!("Sign-in code sent to {}", email);
    Ok(HttpResponse::Ok().json(MessageResponse::new("OTP sent to email")))
}
