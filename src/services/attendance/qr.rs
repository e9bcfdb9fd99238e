use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::AttendanceService;
use super::record::{ensure_not_recorded, insert_attendance, recorded_message};
use crate::models::ErrorCode;
use crate::models::attendances::{
    AttendanceRecordedResponse, AttendanceStatus, NewAttendance, QrCheckInRequest,
};
use crate::services::{error_response, linked_student};
use crate::utils::jwt::JwtUtils;

pub async fn handle_qr_check_in(
    service: &AttendanceService,
    request: &HttpRequest,
    body: QrCheckInRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student = match linked_student(storage.as_ref(), request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let Some(token) = body.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "token is required",
        ));
    };

    let claims = match JwtUtils::verify_qr_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            info!("QR token rejected for student {}: {}", student.id, e);
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidQrToken,
                "Invalid or expired QR token",
            ));
        }
    };

    if student.kelas != Some(claims.class_id) {
        return Ok(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::StudentNotInClass,
            "Student is not a member of this class",
        ));
    }

    let today = service.clock().today();
    if let Err(response) = ensure_not_recorded(storage.as_ref(), student.id, today).await {
        return Ok(response);
    }

    let attendance = NewAttendance::new(student.id, today, AttendanceStatus::Hadir);
    match insert_attendance(storage.as_ref(), attendance).await {
        Ok((attendance, cache_error)) => {
            Ok(HttpResponse::Created().json(AttendanceRecordedResponse {
                message: recorded_message(&cache_error).to_string(),
                attendance,
                details: cache_error,
            }))
        }
        Err(response) => Ok(response),
    }
}
