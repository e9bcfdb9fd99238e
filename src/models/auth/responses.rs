use serde::Serialize;
use ts_rs::TS;

use crate::models::students::entities::Student;
use crate::models::users::entities::User;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/auth.ts")]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// 验证码校验成功后的会话
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/auth.ts")]
pub struct VerifyOtpResponse {
    pub user: User,
    pub session: SessionResponse,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../clients/types/generated/auth.ts")]
pub struct LinkStudentResponse {
    pub message: String,
    pub student: Student,
}
