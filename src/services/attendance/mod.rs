pub mod absen;
pub mod leave;
pub mod qr;
pub mod record;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::attendances::{AbsenQuery, AbsenRequest, QrCheckInRequest};
use crate::object_store::ObjectStore;
use crate::services::storage_failure;
use crate::storage::Storage;
use crate::utils::SchoolClock;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
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

    // 学生签到
    pub async fn absen(
        &self,
        request: &HttpRequest,
        body: Option<AbsenRequest>,
        query: AbsenQuery,
    ) -> ActixResult<HttpResponse> {
        absen::handle_absen(self, request, body, query).await
    }

    // 扫码签到
    pub async fn qr_check_in(
        &self,
        request: &HttpRequest,
        body: QrCheckInRequest,
    ) -> ActixResult<HttpResponse> {
        qr::handle_qr_check_in(self, request, body).await
    }

    // 带证明材料的请假
    pub async fn leave(&self, request: &HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
        leave::handle_leave(self, request, payload).await
    }

    // 全部学生
    pub async fn list_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        match storage.list_students().await {
            Ok(students) => Ok(HttpResponse::Ok().json(students)),
            Err(e) => Ok(storage_failure("Failed to load students", e)),
        }
    }
}
