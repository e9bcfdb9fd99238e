use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::teachers::{
    AttendanceHistoryQuery, GenerateQrRequest, MarkAlfaRequest, TodayAttendanceQuery,
};
use crate::services::TeacherService;

// 懒加载的全局 TeacherService 实例
static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);

pub async fn generate_qr(
    request: HttpRequest,
    body: web::Json<GenerateQrRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .generate_qr(&request, body.into_inner())
        .await
}

pub async fn list_classes(request: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_classes(&request).await
}

pub async fn mark_alfa(
    request: HttpRequest,
    body: web::Json<MarkAlfaRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.mark_alfa(&request, body.into_inner()).await
}

pub async fn today_attendance(
    request: HttpRequest,
    query: web::Query<TodayAttendanceQuery>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .today_attendance(&request, query.into_inner())
        .await
}

pub async fn attendance_history(
    request: HttpRequest,
    query: web::Query<AttendanceHistoryQuery>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .attendance_history(&request, query.into_inner())
        .await
}

// 配置路由
pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teacher")
            // 后注册的中间件先执行：先认证，再检查教师档案
            .wrap(middlewares::RequireTeacher)
            .wrap(middlewares::RequireJWT)
            .route("/qr/generate", web::post().to(generate_qr))
            .route("/classes", web::get().to(list_classes))
            .route("/attendances/mark-alfa", web::post().to(mark_alfa))
            .route("/attendances/today", web::get().to(today_attendance))
            .route("/attendances/history", web::get().to(attendance_history)),
    );
}
