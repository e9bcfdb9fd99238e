/*!
 * 教师身份中间件
 *
 * 必须在 RequireJWT 之后使用。调用者在 `teachers` 表中没有记录时返回 403，
 * 否则把 `Teacher` 写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/teacher")
 *     .wrap(RequireTeacher)
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{error, info};

use super::create_error_response;
use crate::models::{ErrorCode, teachers::entities::Teacher, users::entities::User};
use crate::storage::Storage;

#[derive(Clone)]
pub struct RequireTeacher;

impl RequireTeacher {
    /// 从请求扩展中提取教师档案
    pub fn extract_teacher(req: &HttpRequest) -> Option<Teacher> {
        req.extensions().get::<Teacher>().cloned()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireTeacher
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireTeacherMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireTeacherMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireTeacherMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireTeacherMiddleware<S>
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
            if req.method() == actix_web::http::Method::OPTIONS {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            let Some(user_id) = req.extensions().get::<User>().map(|u| u.id) else {
                info!("Teacher check failed: no user in request. Is RequireJWT applied first?");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            let Some(storage) = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|s| s.get_ref().clone())
            else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalError,
                        "Storage not configured",
                    )
                    .map_into_right_body(),
                ));
            };

            match storage.get_teacher_by_user_id(user_id).await {
                Ok(Some(teacher)) => {
                    req.extensions_mut().insert(teacher);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Ok(None) => {
                    info!("User {} has no teacher profile", user_id);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Teacher profile not found",
                        )
                        .map_into_right_body(),
                    ))
                }
                Err(e) => {
                    error!("Failed to load teacher profile for {}: {}", user_id, e);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::DatabaseError,
                            "Failed to load teacher profile",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
