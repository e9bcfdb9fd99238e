pub mod history;
pub mod mark_alfa;
pub mod qr;
pub mod roster;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::teachers::{
    AttendanceHistoryQuery, GenerateQrRequest, MarkAlfaRequest, TodayAttendanceQuery,
};
use crate::object_store::ObjectStore;
use crate::services::storage_failure;
use crate::storage::Storage;
use crate::utils::SchoolClock;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => crate::services::app_storage(request),
        }
    }

    pub(crate) fn get_object_store(&self, request: &HttpRequest) -> Arc<dyn ObjectStore> {
        crate::services::app_object_store(request)
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub(crate) fn clock(&self) -> SchoolClock {
        SchoolClock::from_config()
    }

    // 生成签到二维码令牌
    pub async fn generate_qr(
        &self,
        request: &HttpRequest,
        body: GenerateQrRequest,
    ) -> ActixResult<HttpResponse> {
        qr::handle_generate_qr(request, body).await
    }

    // 班级列表
    pub async fn list_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        match storage.list_classes().await {
            Ok(classes) => Ok(HttpResponse::Ok().json(classes)),
            Err(e) => Ok(storage_failure("Failed to load classes", e)),
        }
    }

    // 批量标记缺勤
    pub async fn mark_alfa(
        &self,
        request: &HttpRequest,
        body: MarkAlfaRequest,
    ) -> ActixResult<HttpResponse> {
        mark_alfa::handle_mark_alfa(self, request, body).await
    }

    // 当日签到名单
    pub async fn today_attendance(
        &self,
        request: &HttpRequest,
        query: TodayAttendanceQuery,
    ) -> ActixResult<HttpResponse> {
        roster::handle_today_attendance(self, request, query).await
    }

    // 考勤历史
    pub async fn attendance_history(
        &self,
        request: &HttpRequest,
        query: AttendanceHistoryQuery,
    ) -> ActixResult<HttpResponse> {
        history::handle_attendance_history(self, request, query).await
    }
}
