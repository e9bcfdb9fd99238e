use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::FileService;
use crate::utils::SafeSignedToken;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn download_signed(
    request: HttpRequest,
    token: SafeSignedToken,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE.download_signed(&request, token).await
}

// 配置路由
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/files/signed/{token}", web::get().to(download_signed));
}
