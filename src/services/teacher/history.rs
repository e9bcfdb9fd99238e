use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::attendances::AttendanceHistoryFilter;
use crate::models::teachers::AttendanceHistoryQuery;
use crate::services::{signed_url_or_none, storage_failure};

/// 没有日期范围时限制返回条数
fn history_filter(query: AttendanceHistoryQuery, default_limit: u64) -> AttendanceHistoryFilter {
    let unbounded = query.from.is_none() && query.to.is_none();
    AttendanceHistoryFilter {
        class_id: query.class_id,
        student_id: query.student_id,
        from: query.from,
        to: query.to,
        limit: unbounded.then_some(default_limit),
    }
}

pub async fn handle_attendance_history(
    service: &TeacherService,
    request: &HttpRequest,
    query: AttendanceHistoryQuery,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let filter = history_filter(query, config.attendance.history_default_limit);

    let storage = service.get_storage(request);
    let mut entries = match storage.list_attendance_history(filter).await {
        Ok(entries) => entries,
        Err(e) => return Ok(storage_failure("Failed to load attendance history", e)),
    };

    let object_store = service.get_object_store(request);
    let bucket = &config.storage.attachment;
    for entry in &mut entries {
        entry.attachment_url = signed_url_or_none(
            object_store.as_ref(),
            &bucket.bucket,
            entry.attendance.attachment_path.as_deref(),
            bucket.signed_url_ttl,
        );
    }

    Ok(HttpResponse::Ok().json(entries))
}
