use serde::Deserialize;
use ts_rs::TS;

// 请求验证码
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/auth.ts")]
pub struct SignInRequest {
    #[serde(default)]
    pub email: Option<String>,
}

// 提交验证码
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/auth.ts")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: Option<String>,
    /// 邮件中收到的一次性验证码
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/auth.ts")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// 将当前账号绑定到学生档案
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/auth.ts")]
pub struct LinkStudentRequest {
    /// 学生姓名，需与档案中的 nama 完全一致
    #[serde(default)]
    pub name: Option<String>,
}
