use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::AdminService;

// 懒加载的全局 AdminService 实例
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

// 表名校验先于认证，因此这里不挂载 RequireJWT
pub async fn list_rows(request: HttpRequest, path: web::Path<String>) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list(&request, &path.into_inner()).await
}

pub async fn get_row(
    request: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (table, id) = path.into_inner();
    ADMIN_SERVICE.get(&request, &table, &id).await
}

pub async fn create_row(
    request: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .create(&request, &path.into_inner(), body)
        .await
}

pub async fn update_row(
    request: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let (table, id) = path.into_inner();
    ADMIN_SERVICE.update(&request, &table, &id, body).await
}

pub async fn delete_row(
    request: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (table, id) = path.into_inner();
    ADMIN_SERVICE.delete(&request, &table, &id).await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/{table}", web::get().to(list_rows))
            .route("/{table}", web::post().to(create_row))
            .route("/{table}/{id}", web::get().to(get_row))
            .route("/{table}/{id}", web::put().to(update_row))
            .route("/{table}/{id}", web::delete().to(delete_row)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::TestContext;
    use crate::storage::Storage;
    use crate::test_app;
    use actix_web::test;
    use serde_json::{Value, json};

    async fn admin_token(ctx: &TestContext) -> String {
        let user = ctx.storage.ensure_admin("admin@sekolah.id").await.unwrap();
        crate::utils::jwt::JwtUtils::generate_access_token(user.id).unwrap()
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_check_order() {
        let ctx = TestContext::new().await;
        let (_, user_token) = ctx.sign_in("siswa@sekolah.id").await;
        let app = test_app!(ctx, configure_admin_routes);

        // 未授权也先得到表名错误
        let req = test::TestRequest::get().uri("/admin/users").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "TABLE_NOT_ALLOWED");
        assert_eq!(body["error"]["message"], "Table not allowed");

        let req = test::TestRequest::get().uri("/admin/class").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);

        let req = test::TestRequest::get()
            .uri("/admin/class")
            .insert_header(bearer(&user_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Not admin");
    }

    #[actix_web::test]
    async fn test_crud_roundtrip() {
        let ctx = TestContext::new().await;
        let token = admin_token(&ctx).await;
        let app = test_app!(ctx, configure_admin_routes);

        let req = test::TestRequest::post()
            .uri("/admin/class")
            .insert_header(bearer(&token))
            .set_json(json!({ "class_name": "X IPA 1" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"][0]["id"].as_i64().unwrap();
        assert_eq!(body["data"][0]["class_name"], "X IPA 1");

        let req = test::TestRequest::put()
            .uri(&format!("/admin/class/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "class_name": "X IPA 2" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["class_name"], "X IPA 2");

        let req = test::TestRequest::get()
            .uri(&format!("/admin/class/{id}"))
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["class_name"], "X IPA 2");

        let req = test::TestRequest::get()
            .uri("/admin/class")
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/admin/class/{id}"))
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["id"], id);

        let req = test::TestRequest::delete()
            .uri(&format!("/admin/class/{id}"))
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!([]));

        let req = test::TestRequest::get()
            .uri(&format!("/admin/class/{id}"))
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn test_bad_id_and_body() {
        let ctx = TestContext::new().await;
        let token = admin_token(&ctx).await;
        let app = test_app!(ctx, configure_admin_routes);

        let req = test::TestRequest::get()
            .uri("/admin/students/abc")
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        let req = test::TestRequest::post()
            .uri("/admin/students")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{broken")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_JSON");

        let req = test::TestRequest::post()
            .uri("/admin/class")
            .insert_header(bearer(&token))
            .set_json(json!(["not", "an", "object"]))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }
}
