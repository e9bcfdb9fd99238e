use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::de::deserialize_optional_i64;

// 生成签到二维码
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/teacher.ts")]
pub struct GenerateQrRequest {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | string | null")]
    pub class_id: Option<i64>,
}

// 批量标记缺勤
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/teacher.ts")]
pub struct MarkAlfaRequest {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | string | null")]
    pub class_id: Option<i64>,
    /// 学生 ID 列表，元素可以是数字或数字字符串
    #[serde(default)]
    #[ts(type = "Array<number | string> | null")]
    pub student_ids: Option<Vec<serde_json::Value>>,
    /// YYYY-MM-DD，缺省为当天
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TodayAttendanceQuery {
    pub class_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttendanceHistoryQuery {
    pub class_id: Option<i64>,
    pub student_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
