//! 一次性验证码
//!
//! 验证码只以 Argon2 哈希形式保存在对象缓存中，键为 `otp:<email>`，附带过期时间。
//! 尝试次数记在单独的计数器 `otp-attempts:<email>` 上，校验前先原子自增占用一次机会，
//! 并发的错误尝试因此也受 `otp_max_attempts` 限制。成功后立即删除，次数用尽时作废。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{CacheResult, ObjectCache, traits::ObjectCacheExt};
use crate::config::AuthConfig;
use crate::errors::Result;
use crate::utils::otp_hash::{hash_code, verify_code};
use crate::utils::random_code::generate_numeric_code;

/// 验证码投递方式
#[async_trait]
pub trait OtpSender: Send + Sync {
    async fn send(&self, email: &str, code: &str) -> Result<()>;
}

/// 将验证码写入日志，适用于开发环境与内网部署
pub struct LogOtpSender;

#[async_trait]
impl OtpSender for LogOtpSender {
    async fn send(&self, email: &str, code: &str) -> Result<()> {
        warn!(email = %email, code = %code, "Sign-in code issued");
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpState {
    pub hash: String,
    /// Unix 时间戳（秒）
    pub expires_at: i64,
}

pub fn otp_key(email: &str) -> String {
    format!("otp:{email}")
}

pub fn attempts_key(email: &str) -> String {
    format!("otp-attempts:{email}")
}

async fn discard(cache: &dyn ObjectCache, email: &str) {
    cache.remove(&otp_key(email)).await;
    cache.remove(&attempts_key(email)).await;
}

/// 生成并保存新的验证码，覆盖之前未使用的验证码
pub async fn issue_code(cache: &dyn ObjectCache, email: &str, config: &AuthConfig) -> Result<String> {
    let code = generate_numeric_code(config.otp_length);
    let state = OtpState {
        hash: hash_code(&code)?,
        expires_at: chrono::Utc::now().timestamp() + config.otp_ttl as i64,
    };
    cache.remove(&attempts_key(email)).await;
    cache.insert_json(otp_key(email), &state, config.otp_ttl).await;
    Ok(code)
}

/// 校验验证码，成功时消费掉
pub async fn consume_code(
    cache: &dyn ObjectCache,
    email: &str,
    code: &str,
    config: &AuthConfig,
) -> bool {
    let state = match cache.get_json::<OtpState>(&otp_key(email)).await {
        CacheResult::Found(state) => state,
        _ => {
            debug!("No pending sign-in code for {}", email);
            return false;
        }
    };

    let now = chrono::Utc::now().timestamp();
    if now >= state.expires_at {
        discard(cache, email).await;
        return false;
    }

    // 先占用一次尝试机会再做耗时的哈希校验
    let remaining = (state.expires_at - now).max(1) as u64;
    let Some(attempt) = cache.increment(&attempts_key(email), remaining).await else {
        warn!("Failed to count sign-in attempt for {}", email);
        return false;
    };
    let max_attempts = u64::from(config.otp_max_attempts);
    if attempt > max_attempts {
        discard(cache, email).await;
        return false;
    }

    if verify_code(code, &state.hash) {
        discard(cache, email).await;
        return true;
    }

    if attempt >= max_attempts {
        debug!("Sign-in code for {} discarded after {} attempts", email, attempt);
        discard(cache, email).await;
    }
    false
}
