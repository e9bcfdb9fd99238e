//! 签到写入的公共流程：重复检查、插入、回写学生缓存字段

use actix_web::{HttpResponse, http::StatusCode};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::models::ErrorCode;
use crate::models::attendances::{Attendance, NewAttendance};
use crate::services::{error_response, storage_failure};
use crate::storage::Storage;

pub(crate) fn already_recorded() -> HttpResponse {
    error_response(
        StatusCode::CONFLICT,
        ErrorCode::AttendanceAlreadyExists,
        "Attendance already recorded for today",
    )
}

/// 当天已有记录时返回 409 响应
pub(crate) async fn ensure_not_recorded(
    storage: &dyn Storage,
    student_id: i64,
    date: NaiveDate,
) -> Result<(), HttpResponse> {
    match storage.find_attendance(student_id, date).await {
        Ok(Some(_)) => Err(already_recorded()),
        Ok(None) => Ok(()),
        Err(e) => Err(storage_failure("Failed to check attendance", e)),
    }
}

/// 写入考勤记录
///
/// 成功时返回记录以及学生缓存字段更新失败的错误信息（不影响结果）。
pub(crate) async fn insert_attendance(
    storage: &dyn Storage,
    attendance: NewAttendance,
) -> Result<(Attendance, Option<String>), HttpResponse> {
    let status = attendance.status;
    let created = match storage.create_attendance(attendance).await {
        Ok(created) => created,
        Err(e) if e.is_conflict() => return Err(already_recorded()),
        Err(e) => return Err(storage_failure("Failed to record attendance", e)),
    };

    info!(
        "Attendance {} recorded for student {} on {}",
        created.status, created.student_id, created.date
    );

    let cache_error = match storage
        .update_student_last_status(created.student_id, status, created.date)
        .await
    {
        Ok(()) => None,
        Err(e) => {
            warn!(
                "Failed to update last status for student {}: {}",
                created.student_id, e
            );
            Some(e.message().to_string())
        }
    };

    Ok((created, cache_error))
}

pub(crate) fn recorded_message(cache_error: &Option<String>) -> &'static str {
    if cache_error.is_some() {
        "Attendance recorded, but failed updating student cache"
    } else {
        "Attendance recorded"
    }
}
