use crate::config::{AppConfig, Argon2Config};
use crate::errors::{KlasError, Result};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// 哈希一次性验证码，缓存中只保存哈希值
pub fn hash_code(code: &str) -> Result<String> {
    hash_code_with(&AppConfig::get().argon2, code)
}

pub fn hash_code_with(params: &Argon2Config, code: &str) -> Result<String> {
    let params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        None,
    )
    .map_err(|e| KlasError::validation(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(code.as_bytes(), &salt)
        .map_err(|e| KlasError::validation(format!("验证码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 校验验证码，哈希格式错误视为不匹配
pub fn verify_code(code: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(code.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}
