//! JSON 请求体与查询参数的解析错误处理
//!
//! actix 默认返回纯文本错误，这里统一转换为 `{ "error": { code, message } }` 结构。

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ErrorCode, ErrorResponse};

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("Invalid JSON body for {}: {}", req.path(), err);
    let message = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Request body too large".to_string()
        }
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid JSON body: {e}"),
        _ => "Invalid JSON body".to_string(),
    };
    let response =
        HttpResponse::BadRequest().json(ErrorResponse::new(ErrorCode::InvalidJson, message));
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("Invalid query string for {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(
        ErrorCode::InvalidJson,
        format!("Invalid query parameters: {err}"),
    ));
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[allow(dead_code)]
        email: Option<String>,
    }

    #[derive(Deserialize)]
    struct Params {
        #[allow(dead_code)]
        class_id: Option<i64>,
    }

    async fn echo(_: web::Json<Body>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn query(_: web::Query<Params>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_malformed_json_uses_error_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .route("/", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_JSON");
    }

    #[actix_web::test]
    async fn test_bad_query_uses_error_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .route("/", web::get().to(query)),
        )
        .await;

        let req = test::TestRequest::get().uri("/?class_id=abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_JSON");
    }
}
