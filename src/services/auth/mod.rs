pub mod link;
pub mod otp;
pub mod signin;
pub mod token;
pub mod verify;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::models::auth::{LinkStudentRequest, RefreshTokenRequest, SignInRequest, VerifyOtpRequest};
use crate::storage::Storage;

pub use otp::{LogOtpSender, OtpSender};

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
    otp_sender: Arc<dyn OtpSender>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            otp_sender: Arc::new(LogOtpSender),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        match &self.storage {
            Some(storage) => storage.clone(),
            None => crate::services::app_storage(request),
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        crate::services::app_cache(request)
    }

    /// 应用数据中注册了发送器时优先使用，否则写入日志
    pub(crate) fn get_otp_sender(&self, request: &HttpRequest) -> Arc<dyn OtpSender> {
        request
            .app_data::<web::Data<Arc<dyn OtpSender>>>()
            .map(|sender| sender.get_ref().clone())
            .unwrap_or_else(|| self.otp_sender.clone())
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 发送验证码
    pub async fn signin(
        &self,
        request: &HttpRequest,
        body: SignInRequest,
    ) -> ActixResult<HttpResponse> {
        signin::handle_signin(self, request, body).await
    }

    // 校验验证码并签发令牌
    pub async fn verify(
        &self,
        request: &HttpRequest,
        body: VerifyOtpRequest,
    ) -> ActixResult<HttpResponse> {
        verify::handle_verify(self, request, body).await
    }

    // 刷新令牌
    pub async fn refresh_token(&self, body: RefreshTokenRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, body).await
    }

    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(request).await
    }

    // 绑定学生档案
    pub async fn link_student(
        &self,
        request: &HttpRequest,
        body: LinkStudentRequest,
    ) -> ActixResult<HttpResponse> {
        link::handle_link_student(self, request, body).await
    }
}
