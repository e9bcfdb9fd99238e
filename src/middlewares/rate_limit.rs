//! 固定窗口限流
//!
//! 用于验证码发送与校验、令牌刷新和文件上传。已认证请求按用户 ID 计数，
//! 否则按客户端地址计数（`realip_remote_addr`，会读取 Forwarded / X-Forwarded-For）。
//! 同一前缀共享窗口，超限返回 429 `RATE_LIMITED`，放行的响应带 `X-RateLimit-*` 头。
//!
//! ```rust,ignore
//! web::resource("/signin")
//!     .wrap(RateLimit::otp_signin())
//!     .route(web::post().to(signin))
//! ```

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::users::entities::User;
use crate::models::{ErrorCode, ErrorResponse};

/// 全局速率限制缓存
/// 键: 前缀:标识:窗口序号，值: 请求计数
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

/// 当前固定窗口的序号与剩余秒数
fn current_window(window_secs: u64) -> (u64, u64) {
    let window_secs = window_secs.max(1);
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    (now / window_secs, window_secs - now % window_secs)
}

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    /// 创建新的速率限制器
    ///
    /// # 参数
    /// - `max_requests`: 时间窗口内允许的最大请求数
    /// - `window_secs`: 时间窗口（秒）
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 验证码发送：5次/分钟/IP
    pub fn otp_signin() -> Self {
        Self::new(5, 60).with_prefix("otp_signin")
    }

    /// 验证码校验：10次/分钟/IP
    pub fn otp_verify() -> Self {
        Self::new(10, 60).with_prefix("otp_verify")
    }

    /// 刷新令牌：10次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 文件上传：10次/分钟/用户
    pub fn file_upload() -> Self {
        Self::new(10, 60).with_prefix("upload")
    }
}

// 计数标识：用户优先，其次是客户端地址
fn rate_limit_identity(req: &ServiceRequest) -> String {
    if let Some(user) = req.extensions().get::<User>() {
        return format!("user:{}", user.id);
    }
    let info = req.connection_info();
    let addr = info.realip_remote_addr().unwrap_or("unknown");
    // 去掉端口，同一客户端的不同连接共用计数
    let host = addr
        .parse::<std::net::SocketAddr>()
        .map(|sa| sa.ip().to_string())
        .unwrap_or_else(|_| addr.to_string());
    format!("ip:{host}")
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ErrorResponse::new(
            ErrorCode::RateLimited,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let max_requests = self.max_requests;
        let window_secs = self.window_secs;
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let identifier = rate_limit_identity(&req);
            let (window, retry_after) = current_window(window_secs);
            let cache_key = if key_prefix.is_empty() {
                format!("{identifier}:{window}")
            } else {
                format!("{key_prefix}:{identifier}:{window}")
            };

            let current_count = RATE_LIMIT_CACHE.get(&cache_key).await.unwrap_or(0);

            if current_count >= max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, current_count, max_requests
                );
                return Ok(req
                    .into_response(too_many_requests(retry_after).map_into_right_body()));
            }

            RATE_LIMIT_CACHE.insert(cache_key, current_count + 1).await;

            let remaining = max_requests.saturating_sub(current_count + 1);
            let mut res = srv.call(req).await?;
            let headers = res.headers_mut();
            for (name, value) in [
                ("x-ratelimit-limit", max_requests as u64),
                ("x-ratelimit-remaining", remaining as u64),
                ("x-ratelimit-reset", retry_after),
            ] {
                headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
            }
            Ok(res.map_into_left_body())
        })
    }
}
