use serde::Deserialize;
use ts_rs::TS;

// 学生签到
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/attendance.ts")]
pub struct AbsenRequest {
    #[serde(default)]
    pub status: Option<String>,
}

// 请求体缺失时从查询参数读取状态
#[derive(Debug, Default, Deserialize)]
pub struct AbsenQuery {
    #[serde(default)]
    pub status: Option<String>,
}

// 扫码签到
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/attendance.ts")]
pub struct QrCheckInRequest {
    #[serde(default)]
    pub token: Option<String>,
}
