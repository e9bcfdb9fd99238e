use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::services::StudentService;

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn upload_profile_picture(
    request: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .upload_profile_picture(&request, payload)
        .await
}

pub async fn get_profile_picture(request: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_profile_picture(&request).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/students/profile-picture")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .wrap(RateLimit::file_upload())
                    .to(upload_profile_picture),
            )
            .route("", web::get().to(get_profile_picture)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object_store::ObjectStore;
    use crate::routes::attendance::tests::{PNG, multipart_body};
    use crate::services::test_support::{FailOn, TestContext, stored_file_count};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::seed_student;
    use crate::test_app;
    use actix_web::test;
    use serde_json::Value;

    async fn linked_student(ctx: &TestContext) -> (i64, String) {
        let student_id = seed_student(&ctx.db, "Rudi Hartono", None).await;
        let (user_id, token) = ctx.sign_in("rudi@sekolah.id").await;
        ctx.storage
            .link_student_to_user(student_id, user_id)
            .await
            .unwrap();
        (student_id, token)
    }

    fn upload_request(token: &str, field: &str, content_type: &str, data: &[u8]) -> test::TestRequest {
        let (multipart_type, payload) = multipart_body(&[], Some((field, content_type, data)));
        test::TestRequest::post()
            .uri("/students/profile-picture")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .insert_header(("Content-Type", multipart_type))
            .set_payload(payload)
    }

    #[actix_web::test]
    async fn test_profile_picture_lifecycle() {
        let ctx = TestContext::new().await;
        let (student_id, token) = linked_student(&ctx).await;
        let app = test_app!(ctx, configure_student_routes);

        let req = test::TestRequest::get()
            .uri("/students/profile-picture")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Profile picture not set");

        let req = upload_request(&token, "avatar", "image/png", &PNG).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Profile picture updated");
        let first_path = body["avatar_path"].as_str().unwrap().to_string();
        assert!(first_path.starts_with(&format!("{student_id}/avatar-")));
        assert!(first_path.ends_with(".png"));

        // 再次上传后旧头像被删除
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let req = upload_request(&token, "file", "image/png", &PNG).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let second_path = body["avatar_path"].as_str().unwrap().to_string();
        assert_ne!(first_path, second_path);

        let bucket = &crate::config::AppConfig::get().storage.avatar.bucket;
        assert!(ctx.object_store.read(bucket, &first_path).await.unwrap().is_none());
        assert!(ctx.object_store.read(bucket, &second_path).await.unwrap().is_some());

        let req = test::TestRequest::get()
            .uri("/students/profile-picture")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["avatar_path"], second_path.as_str());
        assert!(body["avatar_url"].as_str().unwrap().contains("/files/signed/"));
        assert!(body["expires_in"].as_i64().unwrap() > 0);
    }

    #[actix_web::test]
    async fn test_profile_picture_rejections() {
        let ctx = TestContext::new().await;
        let (_, token) = linked_student(&ctx).await;
        let app = test_app!(ctx, configure_student_routes);

        let req = upload_request(&token, "photo", "image/png", &PNG).to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["error"]["code"], "MISSING_FIELD");
        assert_eq!(body["error"]["message"], "avatar file is required");

        let req = upload_request(&token, "avatar", "image/gif", b"GIF89a....").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_FILE_TYPE");

        let big = {
            let mut data = PNG.to_vec();
            data.resize(3 * 1024 * 1024, 0);
            data
        };
        let req = upload_request(&token, "avatar", "image/png", &big).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "FILE_TOO_LARGE");
        assert_eq!(body["error"]["message"], "File too large. Max 2MB");
    }

    #[actix_web::test]
    async fn test_avatar_removed_when_profile_update_fails() {
        let ctx = TestContext::new().await.with_failures(FailOn {
            avatar: true,
            ..Default::default()
        });
        let (student_id, token) = linked_student(&ctx).await;
        let app = test_app!(ctx, configure_student_routes);

        let req = upload_request(&token, "avatar", "image/png", &PNG).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");

        let bucket = &crate::config::AppConfig::get().storage.avatar.bucket;
        assert_eq!(stored_file_count(&ctx, bucket), 0);
        let students = ctx.db.list_students().await.unwrap();
        let student = students.iter().find(|s| s.id == student_id).unwrap();
        assert_eq!(student.avatar_path, None);
    }

    #[actix_web::test]
    async fn test_profile_picture_requires_token() {
        let ctx = TestContext::new().await;
        let app = test_app!(ctx, configure_student_routes);

        let req = test::TestRequest::get()
            .uri("/students/profile-picture")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
}
