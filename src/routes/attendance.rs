use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::attendances::{AbsenQuery, AbsenRequest, QrCheckInRequest};
use crate::services::AttendanceService;

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

/// 请求体可以缺失或不是合法 JSON，此时从查询参数读取状态
pub async fn absen(
    request: HttpRequest,
    body: web::Bytes,
    query: web::Query<AbsenQuery>,
) -> ActixResult<HttpResponse> {
    let body = serde_json::from_slice::<AbsenRequest>(&body).ok();
    ATTENDANCE_SERVICE
        .absen(&request, body, query.into_inner())
        .await
}

pub async fn qr_check_in(
    request: HttpRequest,
    body: web::Json<QrCheckInRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .qr_check_in(&request, body.into_inner())
        .await
}

pub async fn leave(
    request: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.leave(&request, payload).await
}

pub async fn list_students(request: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.list_students(&request).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/students", web::get().to(list_students))
        .service(
            web::scope("/absen")
                .wrap(middlewares::RequireJWT)
                .route("", web::post().to(absen))
                .route("/qr", web::post().to(qr_check_in))
                .service(
                    web::resource("/leave")
                        .wrap(RateLimit::file_upload())
                        .route(web::post().to(leave)),
                ),
        );
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::object_store::ObjectStore;
    use crate::services::test_support::{FailOn, TestContext, stored_file_count};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{seed_class, seed_student};
    use crate::test_app;
    use crate::utils::jwt::JwtUtils;
    use actix_web::test;
    use serde_json::{Value, json};

    /// 构造只含文本字段与一个文件字段的 multipart 请求体
    pub(crate) fn multipart_body(
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> (String, Vec<u8>) {
        let boundary = "klas-test-boundary";
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((name, content_type, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    pub(crate) const PNG: [u8; 16] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, 0x49, 0x48, 0x44, 0x52,
    ];

    /// 学生账号：返回 (student_id, access token)
    async fn linked_student(ctx: &TestContext, kelas: Option<i64>) -> (i64, String) {
        let student_id = seed_student(&ctx.db, "Siti Aminah", kelas).await;
        let (user_id, token) = ctx.sign_in("siti@sekolah.id").await;
        ctx.storage
            .link_student_to_user(student_id, user_id)
            .await
            .unwrap();
        (student_id, token)
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn test_absen_records_once() {
        let ctx = TestContext::new().await;
        let (student_id, token) = linked_student(&ctx, None).await;
        let app = test_app!(ctx, configure_attendance_routes);

        let req = test::TestRequest::post()
            .uri("/absen")
            .insert_header(bearer(&token))
            .set_json(json!({ "status": " hadir " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Attendance recorded");
        assert_eq!(body["attendance"]["status"], "HADIR");
        assert_eq!(body["attendance"]["student_id"], student_id);

        let students = ctx.storage.list_students().await.unwrap();
        let student = students.iter().find(|s| s.id == student_id).unwrap();
        assert_eq!(student.last_status.as_deref(), Some("HADIR"));

        let req = test::TestRequest::post()
            .uri("/absen?status=HADIR")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "ATTENDANCE_ALREADY_EXISTS");
    }

    #[actix_web::test]
    async fn test_absen_survives_student_cache_failure() {
        let ctx = TestContext::new().await.with_failures(FailOn {
            last_status: true,
            ..Default::default()
        });
        let (student_id, token) = linked_student(&ctx, None).await;
        let app = test_app!(ctx, configure_attendance_routes);

        let req = test::TestRequest::post()
            .uri("/absen?status=HADIR")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["message"],
            "Attendance recorded, but failed updating student cache"
        );
        assert!(
            body["details"]
                .as_str()
                .unwrap()
                .contains("update_student_last_status")
        );
        assert_eq!(body["attendance"]["student_id"], student_id);

        // 记录已写入，学生缓存字段保持原样
        let today = crate::utils::clock::SchoolClock::from_config().today();
        assert!(ctx.db.find_attendance(student_id, today).await.unwrap().is_some());
        let students = ctx.db.list_students().await.unwrap();
        let student = students.iter().find(|s| s.id == student_id).unwrap();
        assert_eq!(student.last_status, None);
    }

    #[actix_web::test]
    async fn test_absen_status_validation() {
        let ctx = TestContext::new().await;
        let (_, token) = linked_student(&ctx, None).await;
        let app = test_app!(ctx, configure_attendance_routes);

        let cases = [
            (json!({}), "MISSING_FIELD"),
            (json!({ "status": "TELAT" }), "INVALID_STATUS"),
            (json!({ "status": "sakit" }), "ATTACHMENT_REQUIRED"),
        ];
        for (payload, code) in cases {
            let req = test::TestRequest::post()
                .uri("/absen")
                .insert_header(bearer(&token))
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 400);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"]["code"], code);
        }
    }

    #[actix_web::test]
    async fn test_absen_requires_linked_student() {
        let ctx = TestContext::new().await;
        let (_, token) = ctx.sign_in("tamu@sekolah.id").await;
        let app = test_app!(ctx, configure_attendance_routes);

        let req = test::TestRequest::post()
            .uri("/absen?status=HADIR")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "STUDENT_NOT_LINKED");

        let req = test::TestRequest::post().uri("/absen").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }

    #[actix_web::test]
    async fn test_qr_check_in() {
        let ctx = TestContext::new().await;
        let class_id = seed_class(&ctx.db, "XI IPA 1").await;
        let other_class = seed_class(&ctx.db, "XI IPA 2").await;
        let (_, token) = linked_student(&ctx, Some(class_id)).await;
        let app = test_app!(ctx, configure_attendance_routes);

        let req = test::TestRequest::post()
            .uri("/absen/qr")
            .insert_header(bearer(&token))
            .set_json(json!({ "token": "garbage" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_QR_TOKEN");

        let (wrong, _) = JwtUtils::generate_qr_token(other_class, 1).unwrap();
        let req = test::TestRequest::post()
            .uri("/absen/qr")
            .insert_header(bearer(&token))
            .set_json(json!({ "token": wrong }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "STUDENT_NOT_IN_CLASS");

        let (qr, _) = JwtUtils::generate_qr_token(class_id, 1).unwrap();
        let req = test::TestRequest::post()
            .uri("/absen/qr")
            .insert_header(bearer(&token))
            .set_json(json!({ "token": qr }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["attendance"]["status"], "HADIR");
    }

    #[actix_web::test]
    async fn test_leave_with_attachment() {
        let ctx = TestContext::new().await;
        let (student_id, token) = linked_student(&ctx, None).await;
        let app = test_app!(ctx, configure_attendance_routes);

        let (content_type, payload) = multipart_body(&[("status", "izin")], None);
        let req = test::TestRequest::post()
            .uri("/absen/leave")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", content_type))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "ATTACHMENT_REQUIRED");

        let (content_type, payload) = multipart_body(
            &[("status", "HADIR")],
            Some(("attachment", "image/png", &PNG)),
        );
        let req = test::TestRequest::post()
            .uri("/absen/leave")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", content_type))
            .set_payload(payload)
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["error"]["code"], "INVALID_STATUS");

        let (content_type, payload) = multipart_body(
            &[("status", "sakit"), ("note", "Demam")],
            Some(("file", "image/png", &PNG)),
        );
        let req = test::TestRequest::post()
            .uri("/absen/leave")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", content_type))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["attendance"]["status"], "SAKIT");
        assert_eq!(body["attendance"]["note"], "Demam");
        let path = body["attendance"]["attachment_path"].as_str().unwrap();
        assert!(path.starts_with(&format!("{student_id}/")));
        assert!(path.ends_with(".png"));
        assert!(body["attachment_url"].as_str().unwrap().contains("/files/signed/"));

        let bucket = &crate::config::AppConfig::get().storage.attachment.bucket;
        let stored = ctx.object_store.read(bucket, path).await.unwrap();
        assert_eq!(stored.as_deref(), Some(&PNG[..]));
    }

    #[actix_web::test]
    async fn test_leave_removes_attachment_when_insert_fails() {
        let ctx = TestContext::new().await.with_failures(FailOn {
            create_attendance: true,
            ..Default::default()
        });
        let (_, token) = linked_student(&ctx, None).await;
        let app = test_app!(ctx, configure_attendance_routes);

        let (content_type, payload) = multipart_body(
            &[("status", "IZIN")],
            Some(("attachment", "image/png", &PNG)),
        );
        let req = test::TestRequest::post()
            .uri("/absen/leave")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", content_type))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");

        let bucket = &crate::config::AppConfig::get().storage.attachment.bucket;
        assert_eq!(stored_file_count(&ctx, bucket), 0);
    }

    #[actix_web::test]
    async fn test_leave_rejects_spoofed_file() {
        let ctx = TestContext::new().await;
        let (_, token) = linked_student(&ctx, None).await;
        let app = test_app!(ctx, configure_attendance_routes);

        let (content_type, payload) = multipart_body(
            &[("status", "IZIN")],
            Some(("attachment", "application/pdf", &PNG)),
        );
        let req = test::TestRequest::post()
            .uri("/absen/leave")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", content_type))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_FILE_TYPE");
    }

    #[actix_web::test]
    async fn test_list_students_is_public() {
        let ctx = TestContext::new().await;
        seed_student(&ctx.db, "Andi", None).await;
        seed_student(&ctx.db, "Budi", None).await;
        let app = test_app!(ctx, configure_attendance_routes);

        let req = test::TestRequest::get().uri("/students").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["nama"], "Andi");
    }
}
