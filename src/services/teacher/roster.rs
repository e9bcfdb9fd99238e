use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::collections::HashMap;

use super::TeacherService;
use crate::models::ErrorCode;
use crate::models::attendances::{Attendance, AttendanceStatus};
use crate::models::teachers::{
    RosterEntry, RosterStudent, TodayAttendanceQuery, TodayAttendanceResponse,
};
use crate::services::{error_response, signed_url_or_none, storage_failure};

pub async fn handle_today_attendance(
    service: &TeacherService,
    request: &HttpRequest,
    query: TodayAttendanceQuery,
) -> ActixResult<HttpResponse> {
    let Some(class_id) = query.class_id else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::MissingField,
            "class_id is required",
        ));
    };

    let storage = service.get_storage(request);
    let students = match storage.list_students_by_class(class_id).await {
        Ok(students) => students,
        Err(e) => return Ok(storage_failure("Failed to load class students", e)),
    };

    let today = service.clock().today();
    let student_ids: Vec<i64> = students.iter().map(|s| s.id).collect();
    let mut attendances: HashMap<i64, Attendance> =
        match storage.list_attendances_on(&student_ids, today).await {
            Ok(rows) => rows.into_iter().map(|a| (a.student_id, a)).collect(),
            Err(e) => return Ok(storage_failure("Failed to load attendances", e)),
        };

    let config = &service.get_config().storage;
    let object_store = service.get_object_store(request);

    let entries = students
        .into_iter()
        .map(|student| {
            let attendance = attendances.remove(&student.id);
            let avatar_url = signed_url_or_none(
                object_store.as_ref(),
                &config.avatar.bucket,
                student.avatar_path.as_deref(),
                config.avatar.signed_url_ttl,
            );
            let attachment_url = signed_url_or_none(
                object_store.as_ref(),
                &config.attachment.bucket,
                attendance
                    .as_ref()
                    .and_then(|a| a.attachment_path.as_deref()),
                config.attachment.signed_url_ttl,
            );

            RosterEntry {
                is_present: attendance.is_some(),
                status: attendance
                    .map(|a| a.status)
                    .unwrap_or_else(|| AttendanceStatus::NOT_CHECKED_IN.to_string()),
                attachment_url,
                student: RosterStudent {
                    id: student.id,
                    nisn: student.nisn,
                    nama: student.nama,
                    avatar_path: student.avatar_path,
                    avatar_url,
                },
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(TodayAttendanceResponse {
        date: today,
        class_id,
        students: entries,
    }))
}
