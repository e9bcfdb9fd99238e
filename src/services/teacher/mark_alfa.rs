use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use chrono::NaiveDate;
use tracing::info;

use super::TeacherService;
use crate::models::ErrorCode;
use crate::models::attendances::entities::requested_in_class;
use crate::models::teachers::{MarkAlfaRequest, MarkAlfaResponse};
use crate::services::{error_response, storage_failure};

/// 解析 YYYY-MM-DD，空值表示使用默认日期
fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ()> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ()),
        None => Ok(None),
    }
}

pub async fn handle_mark_alfa(
    service: &TeacherService,
    request: &HttpRequest,
    body: MarkAlfaRequest,
) -> ActixResult<HttpResponse> {
    let Some(class_id) = body.class_id else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "class_id is required",
        ));
    };

    let requested = body.student_ids.unwrap_or_default();
    if requested.is_empty() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "student_ids must be a non-empty array",
        ));
    }

    let date = match parse_date(body.date.as_deref()) {
        Ok(Some(date)) => date,
        Ok(None) => service.clock().today(),
        Err(()) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidJson,
                "Invalid date. Expected YYYY-MM-DD",
            ));
        }
    };

    let storage = service.get_storage(request);
    let class_students = match storage.list_students_by_class(class_id).await {
        Ok(students) => students,
        Err(e) => return Ok(storage_failure("Failed to load class students", e)),
    };
    if class_students.is_empty() {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "No students found in this class",
        ));
    }

    let class_ids: Vec<i64> = class_students.iter().map(|s| s.id).collect();
    let target_ids = requested_in_class(&class_ids, &requested);
    if target_ids.is_empty() {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            "Provided student_ids are not in this class",
        ));
    }

    let plan = match storage.apply_mark_alfa(&target_ids, date).await {
        Ok(plan) => plan,
        Err(e) => return Ok(storage_failure("Failed to apply ALFA status", e)),
    };

    info!(
        "Class {} on {}: {} updated, {} inserted, {} skipped",
        class_id,
        date,
        plan.to_update.len(),
        plan.to_insert.len(),
        plan.skipped.len()
    );

    Ok(HttpResponse::Ok().json(MarkAlfaResponse {
        message: "Status ALFA berhasil diterapkan".to_string(),
        updated_count: plan.to_update.len(),
        inserted_count: plan.to_insert.len(),
        updated_student_ids: plan.to_update,
        inserted_student_ids: plan.to_insert,
        skipped_student_ids: plan.skipped,
        date,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(Some("2025-03-01")),
            Ok(NaiveDate::from_ymd_opt(2025, 3, 1))
        );
        assert_eq!(parse_date(Some("  ")), Ok(None));
        assert_eq!(parse_date(None), Ok(None));
        assert!(parse_date(Some("01-03-2025")).is_err());
        assert!(parse_date(Some("2025-02-30")).is_err());
    }
}
