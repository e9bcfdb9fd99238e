use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{error, info, warn};

use super::StudentService;
use crate::models::ErrorCode;
use crate::models::students::{ProfilePictureResponse, ProfilePictureUpdatedResponse};
use crate::services::upload::{read_multipart, validate_upload};
use crate::services::{error_response, linked_student, storage_failure};

const FILE_FIELDS: [&str; 2] = ["avatar", "file"];

pub async fn handle_upload(
    service: &StudentService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student = match linked_student(storage.as_ref(), request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let bucket = &service.get_config().storage.avatar;
    let form = read_multipart(payload, &FILE_FIELDS, bucket.max_size).await?;

    let Some(file) = form.file.as_ref().filter(|f| !f.data.is_empty() || f.too_large) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "avatar file is required",
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
            "Avatar bucket is not configured",
        ));
    }

    let object_store = service.get_object_store(request);
    let path = student.avatar_object_path(chrono::Utc::now(), extension);
    if let Err(e) = object_store.upload(&bucket.bucket, &path, &file.data).await {
        error!("Failed to upload avatar {}: {}", path, e);
        return Ok(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
            "Failed to upload profile picture",
        ));
    }

    let failure = match storage.update_student_avatar(student.id, &path).await {
        Ok(Some(_)) => None,
        Ok(None) => Some(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::StudentNotFound,
            "Student not found",
        )),
        Err(e) => Some(storage_failure("Failed to update profile picture", e)),
    };
    if let Some(response) = failure {
        // 档案未更新，清理刚上传的文件
        if let Err(e) = object_store.remove(&bucket.bucket, &path).await {
            warn!("Failed to remove orphaned avatar {}: {}", path, e);
        }
        return Ok(response);
    }

    let avatar_url = match object_store.create_signed_url(&bucket.bucket, &path, bucket.signed_url_ttl)
    {
        Ok(url) => url,
        Err(e) => {
            error!("Failed to sign avatar {}: {}", path, e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "Failed to create signed URL",
            ));
        }
    };

    // 旧头像删除失败不影响结果
    if let Some(previous) = student.avatar_path.as_deref().filter(|p| !p.is_empty() && *p != path)
        && let Err(e) = object_store.remove(&bucket.bucket, previous).await
    {
        warn!("Failed to remove previous avatar {}: {}", previous, e);
    }

    info!("Student {} updated profile picture", student.id);
    Ok(HttpResponse::Ok().json(ProfilePictureUpdatedResponse {
        message: "Profile picture updated".to_string(),
        avatar_path: path,
        avatar_url,
    }))
}

pub async fn handle_get(service: &StudentService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let student = match linked_student(storage.as_ref(), request).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let Some(avatar_path) = student.avatar_path.filter(|p| !p.is_empty()) else {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "Profile picture not set",
        ));
    };

    let bucket = &service.get_config().storage.avatar;
    let object_store = service.get_object_store(request);
    match object_store.create_signed_url(&bucket.bucket, &avatar_path, bucket.signed_url_ttl) {
        Ok(avatar_url) => Ok(HttpResponse::Ok().json(ProfilePictureResponse {
            avatar_path,
            avatar_url,
            expires_in: bucket.signed_url_ttl,
        })),
        Err(e) => {
            error!("Failed to sign avatar {}: {}", avatar_path, e);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                "Failed to create signed URL",
            ))
        }
    }
}
