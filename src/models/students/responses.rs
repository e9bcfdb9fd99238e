use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/student.ts")]
pub struct ProfilePictureUpdatedResponse {
    pub message: String,
    pub avatar_path: String,
    pub avatar_url: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/student.ts")]
pub struct ProfilePictureResponse {
    pub avatar_path: String,
    pub avatar_url: String,
    /// 签名 URL 剩余有效期（秒）
    pub expires_in: i64,
}
