use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::AttendanceService;
use super::record::{ensure_not_recorded, insert_attendance, recorded_message};
use crate::models::ErrorCode;
use crate::models::attendances::{
    AbsenQuery, AbsenRequest, AttendanceRecordedResponse, AttendanceStatus, NewAttendance,
};
use crate::services::{error_response, linked_student};

/// 请求体中的状态优先，其次是查询参数
fn requested_status(body: Option<AbsenRequest>, query: AbsenQuery) -> Option<String> {
    let non_empty = |s: &String| !s.trim().is_empty();
    body.and_then(|b| b.status)
        .filter(non_empty)
        .or_else(|| query.status.filter(non_empty))
}

pub async fn handle_absen(
    service: &AttendanceService,
    request: &HttpRequest,
    body: Option<AbsenRequest>,
    query: AbsenQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student = match linked_student(storage.as_ref(), request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let Some(raw_status) = requested_status(body, query) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "status is required",
        ));
    };

    let Some(status) = AttendanceStatus::parse(&raw_status) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidStatus,
            AttendanceStatus::ALLOWED_MESSAGE,
        ));
    };

    if status.requires_attachment() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::AttachmentRequired,
            "IZIN and SAKIT require an attachment, submit them via POST /absen/leave",
        ));
    }

    let today = service.clock().today();
    if let Err(response) = ensure_not_recorded(storage.as_ref(), student.id, today).await {
        return Ok(response);
    }

    match insert_attendance(storage.as_ref(), NewAttendance::new(student.id, today, status)).await
    {
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
