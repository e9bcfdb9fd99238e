use serde::Serialize;
use ts_rs::TS;

use super::entities::{DutySlot, SubjectSlot, format_hh_mm};

// 周课表中每个科目只保留 id 与名称
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/schedule.ts")]
pub struct SubjectEntry {
    pub id: i64,
    pub subject: String,
}

impl From<SubjectSlot> for SubjectEntry {
    fn from(slot: SubjectSlot) -> Self {
        Self {
            id: slot.id,
            subject: slot.subject,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/schedule.ts")]
pub struct DutyEntry {
    pub id: i64,
    pub student_name: String,
}

impl From<DutySlot> for DutyEntry {
    fn from(slot: DutySlot) -> Self {
        Self {
            id: slot.id,
            student_name: slot.student_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/schedule.ts")]
pub struct TodayScheduleEntry {
    pub id: i64,
    pub subject: String,
    pub start_time: String,
    pub end_time: String,
    pub teacher: Option<String>,
}

impl From<SubjectSlot> for TodayScheduleEntry {
    fn from(slot: SubjectSlot) -> Self {
        Self {
            id: slot.id,
            subject: slot.subject,
            start_time: format_hh_mm(&slot.start_time),
            end_time: format_hh_mm(&slot.end_time),
            teacher: slot.teacher,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/schedule.ts")]
pub struct TodayScheduleResponse {
    pub today: String,
    pub schedule: Vec<TodayScheduleEntry>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/schedule.ts")]
pub struct OngoingResponse {
    pub today: String,
    pub time: String,
    pub ongoing: Vec<TodayScheduleEntry>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/schedule.ts")]
pub struct TodayDutyResponse {
    pub today: String,
    pub duty: Vec<DutyEntry>,
}
