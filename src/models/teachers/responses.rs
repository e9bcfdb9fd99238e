use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/teacher.ts")]
pub struct QrTokenResponse {
    pub token: String,
    pub expires_in: i64,
    pub class_id: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/teacher.ts")]
pub struct MarkAlfaResponse {
    pub message: String,
    pub updated_count: usize,
    pub inserted_count: usize,
    pub updated_student_ids: Vec<i64>,
    pub inserted_student_ids: Vec<i64>,
    pub skipped_student_ids: Vec<i64>,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/teacher.ts")]
pub struct RosterStudent {
    pub id: i64,
    pub nisn: Option<String>,
    pub nama: String,
    pub avatar_path: Option<String>,
    pub avatar_url: Option<String>,
}

// 当日签到名单中的一行
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/teacher.ts")]
pub struct RosterEntry {
    pub student: RosterStudent,
    /// 未签到时为 "ALPHA"
    pub status: String,
    pub is_present: bool,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/teacher.ts")]
pub struct TodayAttendanceResponse {
    pub date: NaiveDate,
    pub class_id: i64,
    pub students: Vec<RosterEntry>,
}
