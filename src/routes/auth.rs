use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::auth::{
    LinkStudentRequest, RefreshTokenRequest, SignInRequest, VerifyOtpRequest,
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn signin(
    request: HttpRequest,
    body: web::Json<SignInRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.signin(&request, body.into_inner()).await
}

pub async fn verify(
    request: HttpRequest,
    body: web::Json<VerifyOtpRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.verify(&request, body.into_inner()).await
}

pub async fn refresh_token(body: web::Json<RefreshTokenRequest>) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(body.into_inner()).await
}

pub async fn get_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_user(&request).await
}

pub async fn link_student(
    request: HttpRequest,
    body: web::Json<LinkStudentRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.link_student(&request, body.into_inner()).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/signin")
                    .wrap(RateLimit::otp_signin())
                    .route(web::post().to(signin)),
            )
            .service(
                web::resource("/verify")
                    .wrap(RateLimit::otp_verify())
                    .route(web::post().to(verify)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(RateLimit::refresh_token())
                    .route(web::post().to(refresh_token)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/user", web::get().to(get_user))
                    .route("/link-student", web::post().to(link_student)),
            ),
    );
}
