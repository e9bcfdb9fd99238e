//! 安全的路径参数提取器

use actix_web::error::InternalError;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload, http::StatusCode};
use futures_util::future::{Ready, ready};

use crate::models::{ErrorCode, ErrorResponse};

// JWT 只包含 base64url 字符与分隔点
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// `/files/signed/{token}` 中的签名令牌
#[derive(Debug, Clone)]
pub struct SafeSignedToken(pub String);

impl FromRequest for SafeSignedToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = req.match_info().get("token").unwrap_or_default();
        if token.is_empty() || token.len() > 4096 || !token.chars().all(is_token_char) {
            let response = HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse::new(
                ErrorCode::InvalidToken,
                "Invalid or expired signed URL",
            ));
            return ready(Err(InternalError::from_response(
                "invalid signed token",
                response,
            )
            .into()));
        }
        ready(Ok(SafeSignedToken(token.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    async fn handler(token: SafeSignedToken) -> HttpResponse {
        HttpResponse::Ok().body(token.0)
    }

    #[actix_web::test]
    async fn test_rejects_non_token_characters() {
        let app =
            test::init_service(App::new().route("/files/signed/{token}", web::get().to(handler)))
                .await;

        let ok = test::TestRequest::get()
            .uri("/files/signed/abc.DEF-ghi_123")
            .to_request();
        assert_eq!(test::call_service(&app, ok).await.status(), 200);

        let bad = test::TestRequest::get()
            .uri("/files/signed/abc%20def")
            .to_request();
        let resp = test::call_service(&app, bad).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }
}
