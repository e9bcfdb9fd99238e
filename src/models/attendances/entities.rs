use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

use crate::models::common::de::id_from_value;

// 考勤状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "../clients/types/generated/attendance.ts")]
pub enum AttendanceStatus {
    Hadir, // 出勤
    Izin,  // 请假
    Sakit, // 病假
    Alfa,  // 缺勤
}

impl AttendanceStatus {
    pub const HADIR: &'static str = "HADIR";
    pub const IZIN: &'static str = "IZIN";
    pub const SAKIT: &'static str = "SAKIT";
    pub const ALFA: &'static str = "ALFA";

    /// 尚未签到的学生在当日名单中显示的占位状态，不会写入数据库
    pub const NOT_CHECKED_IN: &'static str = "ALPHA";

    pub const ALLOWED_MESSAGE: &'static str = "Invalid status. Allowed: HADIR, IZIN, SAKIT, ALFA";

    /// 去除首尾空白并转为大写后解析
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_uppercase().as_str() {
            Self::HADIR => Some(Self::Hadir),
            Self::IZIN => Some(Self::Izin),
            Self::SAKIT => Some(Self::Sakit),
            Self::ALFA => Some(Self::Alfa),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hadir => Self::HADIR,
            Self::Izin => Self::IZIN,
            Self::Sakit => Self::SAKIT,
            Self::Alfa => Self::ALFA,
        }
    }

    // 请假与病假必须附带证明材料
    pub fn requires_attachment(&self) -> bool {
        matches!(self, Self::Izin | Self::Sakit)
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid attendance status: {s}"))
    }
}

// 考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/attendance.ts")]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: String,
    pub attachment_path: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 待写入的考勤记录
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub attachment_path: Option<String>,
    pub note: Option<String>,
}

impl NewAttendance {
    pub fn new(student_id: i64, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            student_id,
            date,
            status,
            attachment_path: None,
            note: None,
        }
    }
}

/// 考勤历史查询条件
#[derive(Debug, Clone, Default)]
pub struct AttendanceHistoryFilter {
    /// 通过学生所属班级过滤，没有学生档案的记录不会返回
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u64>,
}

/// 请假证明的对象路径：`<student_id>/<date>-<毫秒时间戳>.<ext>`
pub fn attachment_object_path(
    student_id: i64,
    date: NaiveDate,
    now: DateTime<Utc>,
    extension: &str,
) -> String {
    format!(
        "{}/{}-{}.{}",
        student_id,
        date.format("%Y-%m-%d"),
        now.timestamp_millis(),
        extension
    )
}

/// 教师批量标记缺勤的执行计划
///
/// - 已有 IZIN / SAKIT 记录的学生改为 ALFA
/// - 当天没有记录的学生插入 ALFA
/// - 其余（HADIR、ALFA）保持不变
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkAlfaPlan {
    pub to_update: Vec<i64>,
    pub to_insert: Vec<i64>,
    pub skipped: Vec<i64>,
}

impl MarkAlfaPlan {
    /// `existing` 为学生 ID 到当天已有状态的映射
    pub fn build(student_ids: &[i64], existing: &HashMap<i64, String>) -> Self {
        let mut plan = Self::default();
        for &id in student_ids {
            match existing.get(&id).map(String::as_str) {
                Some(AttendanceStatus::IZIN) | Some(AttendanceStatus::SAKIT) => {
                    plan.to_update.push(id)
                }
                None => plan.to_insert.push(id),
                Some(_) => plan.skipped.push(id),
            }
        }
        plan
    }

    pub fn is_noop(&self) -> bool {
        self.to_update.is_empty() && self.to_insert.is_empty()
    }
}

/// 从请求中的 ID 列表里挑出属于该班级的学生，保持班级名单顺序
///
/// 列表元素可以是数字或数字字符串，其它值被忽略。
pub fn requested_in_class(class_student_ids: &[i64], requested: &[serde_json::Value]) -> Vec<i64> {
    let requested: HashSet<i64> = requested.iter().filter_map(id_from_value).collect();
    class_student_ids
        .iter()
        .copied()
        .filter(|id| requested.contains(id))
        .collect()
}
