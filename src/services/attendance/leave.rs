use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{error, warn};

use super::AttendanceService;
use super::record::{ensure_not_recorded, insert_attendance};
use crate::models::ErrorCode;
use crate::models::attendances::{
    AttendanceStatus, LeaveRecordedResponse, NewAttendance, entities::attachment_object_path,
};
use crate::services::upload::{read_multipart, validate_upload};
use crate::services::{error_response, linked_student, signed_url_or_none};

const FILE_FIELDS: [&str; 2] = ["attachment", "file"];

pub async fn handle_leave(
    service: &AttendanceService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student = match linked_student(storage.as_ref(), request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let bucket = &service.get_config().storage.attachment;
    let form = read_multipart(payload, &FILE_FIELDS, bucket.max_size).await?;

    let status = match form.field("status").and_then(AttendanceStatus::parse) {
        Some(status) if status.requires_attachment() => status,
        _ => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidStatus,
                "Invalid status. Allowed: IZIN, SAKIT",
            ));
        }
    };

    let Some(file) = form.file.as_ref().filter(|f| !f.data.is_empty() || f.too_large) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::AttachmentRequired,
            "attachment file is required",
        ));
    };

    let extension = match validate_upload(file, bucket) {
        Ok(extension) => extension,
        Err(response) => return Ok(response),
    };

    if bucket.bucket.trim().is_empty() {
        return Ok(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ConfigurationError,
            "Attachment bucket is not configured",
        ));
    }

    let today = service.clock().today();
    if let Err(response) = ensure_not_recorded(storage.as_ref(), student.id, today).await {
        return Ok(response);
    }

    let object_store = service.get_object_store(request);
    let path = attachment_object_path(student.id, today, chrono::Utc::now(), extension);
    if let Err(e) = object_store.upload(&bucket.bucket, &path, &file.data).await {
        error!("Failed to upload attachment {}: {}", path, e);
        return Ok(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            "Failed to upload attachment",
        ));
    }

    let mut attendance = NewAttendance::new(student.id, today, status);
    attendance.attachment_path = Some(path.clone());
    attendance.note = form.field("note").map(str::to_string);

    match insert_attendance(storage.as_ref(), attendance).await {
        Ok((attendance, cache_error)) => {
            let message = match cache_error {
                Some(_) => "Leave request recorded, but failed updating student cache",
                None => "Leave request recorded",
            };
            let attachment_url = signed_url_or_none(
                object_store.as_ref(),
                &bucket.bucket,
                Some(&path),
                bucket.signed_url_ttl,
            );
            Ok(HttpResponse::Created().json(LeaveRecordedResponse {
                message: message.to_string(),
                attendance,
                attachment_url,
            }))
        }
        Err(response) => {
            // 记录未写入，清理已上传的文件
            if let Err(e) = object_store.remove(&bucket.bucket, &path).await {
                warn!("Failed to remove orphaned attachment {}: {}", path, e);
            }
            Ok(response)
        }
    }
}
