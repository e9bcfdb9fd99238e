pub mod crud;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, web};
use std::sync::Arc;
use tracing::info;

use crate::middlewares::RequireJWT;
use crate::models::{ErrorCode, admin::AdminTable};
use crate::services::{error_response, storage_failure};
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => crate::services::app_storage(request),
        }
    }

    /// 依次校验表名、令牌与管理员身份
    pub(crate) async fn authorize(
        &self,
        request: &HttpRequest,
        table: &str,
    ) -> Result<AdminTable, HttpResponse> {
        let Some(table) = AdminTable::from_name(table) else {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::TableNotAllowed,
                "Table not allowed",
            ));
        };

        let user = RequireJWT::authenticate(request)
            .await
            .map_err(|failure| failure.into_response())?;

        match self.get_storage(request).is_admin(user.id).await {
            Ok(true) => Ok(table),
            Ok(false) => {
                info!("User {} denied admin access to {}", user.id, table);
                Err(error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "Not admin",
                ))
            }
            Err(e) => Err(storage_failure("Failed to check admin membership", e)),
        }
    }

    pub async fn list(&self, request: &HttpRequest, table: &str) -> ActixResult<HttpResponse> {
        crud::handle_list(self, request, table).await
    }

    pub async fn get(
        &self,
        request: &HttpRequest,
        table: &str,
        id: &str,
    ) -> ActixResult<HttpResponse> {
        crud::handle_get(self, request, table, id).await
    }

    pub async fn create(
        &self,
        request: &HttpRequest,
        table: &str,
        body: web::Bytes,
    ) -> ActixResult<HttpResponse> {
        crud::handle_create(self, request, table, body).await
    }

    pub async fn update(
        &self,
        request: &HttpRequest,
        table: &str,
        id: &str,
        body: web::Bytes,
    ) -> ActixResult<HttpResponse> {
        crud::handle_update(self, request, table, id, body).await
    }

    pub async fn delete(
        &self,
        request: &HttpRequest,
        table: &str,
        id: &str,
    ) -> ActixResult<HttpResponse> {
        crud::handle_delete(self, request, table, id).await
    }
}
