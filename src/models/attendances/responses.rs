use serde::Serialize;
use ts_rs::TS;

use super::entities::Attendance;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/attendance.ts")]
pub struct AttendanceRecordedResponse {
    pub message: String,
    pub attendance: Attendance,
    /// 学生缓存字段更新失败时的错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/attendance.ts")]
pub struct LeaveRecordedResponse {
    pub message: String,
    pub attendance: Attendance,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/attendance.ts")]
pub struct HistoryClass {
    pub class_name: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/attendance.ts")]
pub struct HistoryStudent {
    pub nama: String,
    pub nisn: Option<String>,
    pub kelas: Option<i64>,
    pub class: Option<HistoryClass>,
}

// 考勤历史条目，附带学生与班级信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/attendance.ts")]
pub struct AttendanceHistoryEntry {
    #[serde(flatten)]
    #[ts(flatten)]
    pub attendance: Attendance,
    pub students: Option<HistoryStudent>,
    pub attachment_url: Option<String>,
}
