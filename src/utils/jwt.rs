//! JWT 工具
//!
//! 三类令牌共用 HS256：
//! - 登录会话（access / refresh），密钥为 `jwt.secret`
//! - 签到二维码，密钥为 `attendance.qr_secret`
//! - 对象存储签名 URL，密钥为 `jwt.secret`，载荷绑定 bucket 与路径

use crate::config::AppConfig;
use crate::errors::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";
pub const QR_TOKEN_TYPE: &str = "qr-attendance";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub token_type: String, // token类型: "access" 或 "refresh"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

// 签到二维码载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrClaims {
    #[serde(rename = "type")]
    pub kind: String,
    pub class_id: i64,
    pub teacher_id: i64,
    pub generated_at: i64, // 毫秒
    pub nonce: String,
    pub exp: usize,
}

// 对象签名 URL 载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectClaims {
    pub bucket: String,
    pub path: String,
    pub exp: usize,
}

// Token 响应结构体
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> Result<String> {
    let encoding_key = EncodingKey::from_secret(secret.as_ref());
    Ok(encode(&Header::default(), claims, &encoding_key)?)
}

// 校验签名与过期时间
fn verify<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let mut validation = Validation::default();
    validation.leeway = 0;
    Ok(decode::<T>(token, &decoding_key, &validation)?.claims)
}

fn expiry_from_now(duration: chrono::Duration) -> usize {
    (chrono::Utc::now() + duration).timestamp() as usize
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token
    pub fn generate_access_token(user_id: i64) -> Result<String> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            &Self::get_secret(),
            user_id,
            ACCESS_TOKEN,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    // 生成 Refresh Token
    pub fn generate_refresh_token(user_id: i64) -> Result<String> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            &Self::get_secret(),
            user_id,
            REFRESH_TOKEN,
            chrono::Duration::days(config.jwt.refresh_token_expiry),
        )
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        secret: &str,
        user_id: i64,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            token_type: token_type.to_string(),
            exp: (now + expiry_duration).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        sign(&claims, secret)
    }

    // 生成完整的 Token 对（包含 access 和 refresh token）
    pub fn generate_token_pair(user_id: i64) -> Result<TokenPair> {
        let access_token = Self::generate_access_token(user_id)?;
        let refresh_token = Self::generate_refresh_token(user_id)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    // 验证 token 是否为指定类型
    pub fn verify_token_type(secret: &str, token: &str, expected_type: &str) -> Result<Claims> {
        let claims: Claims = verify(token, secret)?;
        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            )
            .into());
        }
        Ok(claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims> {
        Self::verify_token_type(&Self::get_secret(), token, ACCESS_TOKEN)
    }

    // 验证 Refresh Token
    pub fn verify_refresh_token(token: &str) -> Result<Claims> {
        Self::verify_token_type(&Self::get_secret(), token, REFRESH_TOKEN)
    }

    // 使用 Refresh Token 生成新的 Access Token
    pub fn refresh_access_token(refresh_token: &str) -> Result<String> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        let user_id = claims
            .user_id()
            .ok_or(jsonwebtoken::errors::ErrorKind::InvalidToken)
            .map_err(jsonwebtoken::errors::Error::from)?;
        Self::generate_access_token(user_id)
    }

    /// 生成签到二维码令牌，返回 (token, 有效秒数)
    pub fn generate_qr_token(class_id: i64, teacher_id: i64) -> Result<(String, i64)> {
        let config = AppConfig::get();
        let ttl = config.attendance.qr_token_ttl;
        let token = Self::sign_qr_token(&config.attendance.qr_secret, class_id, teacher_id, ttl)?;
        Ok((token, ttl))
    }

    pub fn sign_qr_token(secret: &str, class_id: i64, teacher_id: i64, ttl: i64) -> Result<String> {
        let nonce: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        let claims = QrClaims {
            kind: QR_TOKEN_TYPE.to_string(),
            class_id,
            teacher_id,
            generated_at: chrono::Utc::now().timestamp_millis(),
            nonce,
            exp: expiry_from_now(chrono::Duration::seconds(ttl)),
        };
        sign(&claims, secret)
    }

    // 验证签到二维码：签名、类型与有效期
    pub fn verify_qr_token(token: &str) -> Result<QrClaims> {
        Self::verify_qr_token_with(&AppConfig::get().attendance.qr_secret, token)
    }

    pub fn verify_qr_token_with(secret: &str, token: &str) -> Result<QrClaims> {
        let claims: QrClaims = verify(token, secret)?;
        if claims.kind != QR_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            )
            .into());
        }
        Ok(claims)
    }

    /// 为对象签发访问令牌
    pub fn sign_object(secret: &str, bucket: &str, path: &str, ttl_seconds: i64) -> Result<String> {
        let claims = ObjectClaims {
            bucket: bucket.to_string(),
            path: path.to_string(),
            exp: expiry_from_now(chrono::Duration::seconds(ttl_seconds)),
        };
        sign(&claims, secret)
    }

    pub fn verify_object(secret: &str, token: &str) -> Result<ObjectClaims> {
        verify(token, secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_session_token_type_is_enforced() {
        let refresh = JwtUtils::generate_token_with_expiry(
            SECRET,
            7,
            REFRESH_TOKEN,
            chrono::Duration::days(1),
        )
        .unwrap();

        let claims = JwtUtils::verify_token_type(SECRET, &refresh, REFRESH_TOKEN).unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert!(JwtUtils::verify_token_type(SECRET, &refresh, ACCESS_TOKEN).is_err());
        assert!(JwtUtils::verify_token_type("other", &refresh, REFRESH_TOKEN).is_err());
    }

    #[test]
    fn test_expired_session_token_is_rejected() {
        let token = JwtUtils::generate_token_with_expiry(
            SECRET,
            1,
            ACCESS_TOKEN,
            chrono::Duration::seconds(-10),
        )
        .unwrap();
        let err = JwtUtils::verify_token_type(SECRET, &token, ACCESS_TOKEN).unwrap_err();
        assert_eq!(err.code(), "E012");
    }

    #[test]
    fn test_qr_token_roundtrip() {
        let token = JwtUtils::sign_qr_token(SECRET, 3, 9, 60).unwrap();
        let claims = JwtUtils::verify_qr_token_with(SECRET, &token).unwrap();
        assert_eq!(claims.kind, QR_TOKEN_TYPE);
        assert_eq!(claims.class_id, 3);
        assert_eq!(claims.teacher_id, 9);
        assert_eq!(claims.nonce.len(), 8);
    }

    #[test]
    fn test_qr_token_rejects_wrong_type_and_expiry() {
        // 会话令牌不能当作二维码使用
        let session = JwtUtils::generate_token_with_expiry(
            SECRET,
            1,
            ACCESS_TOKEN,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        assert!(JwtUtils::verify_qr_token_with(SECRET, &session).is_err());

        let expired = JwtUtils::sign_qr_token(SECRET, 3, 9, -5).unwrap();
        assert!(JwtUtils::verify_qr_token_with(SECRET, &expired).is_err());
    }

    #[test]
    fn test_object_token_binds_bucket_and_path() {
        let token = JwtUtils::sign_object(SECRET, "student-avatars", "1/avatar.png", 30).unwrap();
        let claims = JwtUtils::verify_object(SECRET, &token).unwrap();
        assert_eq!(claims.bucket, "student-avatars");
        assert_eq!(claims.path, "1/avatar.png");

        let expired = JwtUtils::sign_object(SECRET, "b", "p", -1).unwrap();
        assert!(JwtUtils::verify_object(SECRET, &expired).is_err());
    }
}
