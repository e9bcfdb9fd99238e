use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::schedule::{DayQuery, OngoingQuery};
use crate::services::ScheduleService;

// 懒加载的全局 ScheduleService 实例
static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);

pub async fn index() -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.index().await
}

pub async fn weekly_schedule(request: HttpRequest) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.weekly_schedule(&request).await
}

pub async fn weekly_duty(request: HttpRequest) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.weekly_duty(&request).await
}

pub async fn today_schedule(
    request: HttpRequest,
    query: web::Query<DayQuery>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .today_schedule(&request, query.into_inner())
        .await
}

pub async fn ongoing(
    request: HttpRequest,
    query: web::Query<OngoingQuery>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.ongoing(&request, query.into_inner()).await
}

pub async fn today_duty(
    request: HttpRequest,
    query: web::Query<DayQuery>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.today_duty(&request, query.into_inner()).await
}

// 配置路由
pub fn configure_schedule_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/schedule", web::get().to(weekly_schedule))
        .route("/duty", web::get().to(weekly_duty))
        .route("/today-schedule", web::get().to(today_schedule))
        .route("/ongoing", web::get().to(ongoing))
        .route("/today-duty", web::get().to(today_duty));
}
