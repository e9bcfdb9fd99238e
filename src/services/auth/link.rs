use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::AuthService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ErrorCode,
    auth::{LinkStudentRequest, LinkStudentResponse},
};
use crate::services::{error_response, storage_failure};

pub async fn handle_link_student(
    service: &AuthService,
    request: &HttpRequest,
    body: LinkStudentRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized",
        ));
    };

    let Some(name) = body.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "name is required",
        ));
    };

    let storage = service.get_storage(request);
    let student = match storage.find_student_by_name(name).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::StudentNotFound,
                "Student not found",
            ));
        }
        Err(e) => return Ok(storage_failure("Failed to find student", e)),
    };

    match storage.link_student_to_user(student.id, user_id).await {
        Ok(Some(student)) => {
            info!("User {} linked to student {}", user_id, student.id);
            Ok(HttpResponse::Ok().json(LinkStudentResponse {
                message: "Student linked successfully".to_string(),
                student,
            }))
        }
        Ok(None) => Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::StudentNotFound,
            "Student not found",
        )),
        // students.user_id 唯一，账号已绑定其他学生
        Err(e) if e.is_conflict() => Ok(error_response(
            StatusCode::CONFLICT,
            ErrorCode::AccountAlreadyLinked,
            "This account is already linked to another student",
        )),
        Err(e) => Ok(storage_failure("Failed to link student", e)),
    }
}
