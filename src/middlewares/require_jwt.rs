/*!
 * Bearer 令牌认证中间件
 *
 * 校验 `Authorization: Bearer <access token>`，并把对应的用户写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/students")
 *     .wrap(RequireJWT)
 *     .route("/profile-picture", web::get().to(get_profile_picture))
 * ```
 *
 * 处理程序中通过 `RequireJWT::extract_user(&req)` 取得用户。
 * 需要在中间件之外自行决定认证时机的路由（管理后台先校验表名）直接调用
 * `RequireJWT::authenticate`。
 *
 * - 缺少请求头或不是 `Bearer ` 开头：401 `UNAUTHORIZED`
 * - 令牌校验失败或用户已不存在：401 `INVALID_TOKEN`
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::{ErrorCode, users::entities::User};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// 缺少 Bearer 令牌
    MissingToken,
    /// 令牌无效、过期或用户不存在
    InvalidToken(String),
    /// 存储不可用
    Unavailable(String),
}

impl AuthFailure {
    pub fn into_response(self) -> HttpResponse {
        match self {
            AuthFailure::MissingToken => create_error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "Missing or invalid Authorization header",
            ),
            AuthFailure::InvalidToken(_) => create_error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::InvalidToken,
                "Invalid or expired token",
            ),
            AuthFailure::Unavailable(msg) => create_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                &msg,
            ),
        }
    }
}

fn cache_key(token: &str) -> String {
    format!("user:{token}")
}

/// 取出 `Authorization` 头中的令牌
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl RequireJWT {
    /// 校验 Bearer 令牌并返回对应用户
    pub async fn authenticate(req: &HttpRequest) -> Result<User, AuthFailure> {
        let token = bearer_token(req).ok_or(AuthFailure::MissingToken)?;

        let claims = JwtUtils::verify_access_token(token).map_err(|err| {
            info!("JWT token validation failed: {}", err);
            AuthFailure::InvalidToken(err.to_string())
        })?;

        let cache = req
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .map(|c| c.get_ref().clone());

        // 从缓存中获取用户信息
        if let Some(cache) = &cache {
            match cache.get_raw(&cache_key(token)).await {
                CacheResult::Found(json) => match serde_json::from_str::<User>(&json) {
                    Ok(user) => return Ok(user),
                    Err(_) => {
                        cache.remove(&cache_key(token)).await;
                        info!("Failed to deserialize cached user, falling back to storage");
                    }
                },
                _ => debug!("User not found in cache for bearer token"),
            }
        }

        let user_id = claims
            .user_id()
            .ok_or_else(|| AuthFailure::InvalidToken("Invalid user ID in token".to_string()))?;

        let storage = req
            .app_data::<web::Data<Arc<dyn Storage>>>()
            .map(|s| s.get_ref().clone())
            .ok_or_else(|| AuthFailure::Unavailable("Storage not configured".to_string()))?;

        let user = storage
            .get_user_by_id(user_id)
            .await
            .map_err(|e| {
                error!("Failed to load user {}: {}", user_id, e);
                AuthFailure::Unavailable("Failed to retrieve user".to_string())
            })?
            .ok_or_else(|| AuthFailure::InvalidToken("User not found".to_string()))?;

        // 将用户信息存入缓存
        if let Some(cache) = &cache
            && let Ok(user_json) = serde_json::to_string(&user)
        {
            cache
                .insert_raw(
                    cache_key(token),
                    user_json,
                    AppConfig::get().cache.default_ttl,
                )
                .await;
        }

        Ok(user)
    }

    /// 从请求扩展中提取用户，需在 RequireJWT 之后使用
    pub fn extract_user(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Unauthorized, "")
                        .map_into_right_body(),
                ));
            }

            match RequireJWT::authenticate(req.request()).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(failure) => {
                    info!(
                        "JWT authentication failed for request to {}: {:?}",
                        req.path(),
                        failure
                    );
                    Ok(req.into_response(failure.into_response().map_into_right_body()))
                }
            }
        })
    }
}
