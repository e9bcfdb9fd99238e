pub mod profile_picture;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::object_store::ObjectStore;
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    // 上传头像
    pub async fn upload_profile_picture(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        profile_picture::handle_upload(self, request, payload).await
    }

    // 获取头像签名地址
    pub async fn get_profile_picture(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile_picture::handle_get(self, request).await
    }
}
