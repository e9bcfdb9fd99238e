use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::Result;
use crate::utils::jwt::{JwtUtils, TokenPair};

// 用户实体（邮箱验证码登录账号）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../clients/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub last_sign_in_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成访问令牌
    pub fn generate_access_token(&self) -> Result<String> {
        JwtUtils::generate_access_token(self.id)
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(&self) -> Result<TokenPair> {
        JwtUtils::generate_token_pair(self.id)
    }
}
