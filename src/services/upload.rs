//! multipart 表单读取
//!
//! 文本字段收集到 `fields`（最多 `MAX_TEXT_FIELDS` 个），第一个文件字段（按给定名称）读入内存。
//! 文件超过上限时停止读取并标记 `too_large`，`validate_upload` 在校验类型之后据此拒绝。

use actix_multipart::Multipart;
use actix_web::{HttpResponse, http::StatusCode};
use futures_util::TryStreamExt;
use std::collections::HashMap;

use crate::config::BucketConfig;
use crate::models::ErrorCode;
use crate::services::error_response;
use crate::utils::file_magic::{extension_for_mime, validate_magic_bytes};

/// 读取到的文件
#[derive(Debug, Default)]
pub struct UploadedFile {
    pub content_type: String,
    pub data: Vec<u8>,
    pub too_large: bool,
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

// 文本字段的长度上限
const MAX_TEXT_FIELD: usize = 4096;
// 文本字段的个数上限，超出的字段读完后丢弃
const MAX_TEXT_FIELDS: usize = 16;

pub async fn read_multipart(
    mut payload: Multipart,
    file_fields: &[&str],
    max_file_size: usize,
) -> Result<MultipartForm, actix_web::Error> {
    let mut form = MultipartForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if file_fields.contains(&name.as_str()) && form.file.is_none() {
            let mut file = UploadedFile {
                content_type: field
                    .content_type()
                    .map(|ct| ct.essence_str().to_lowercase())
                    .unwrap_or_default(),
                ..Default::default()
            };

            while let Some(chunk) = field.try_next().await? {
                if file.too_large {
                    continue;
                }
                if file.data.len() + chunk.len() > max_file_size {
                    file.too_large = true;
                    file.data.clear();
                    continue;
                }
                file.data.extend_from_slice(&chunk);
            }
            form.file = Some(file);
        } else {
            let keep = form.fields.len() < MAX_TEXT_FIELDS || form.fields.contains_key(&name);
            let mut value = Vec::new();
            while let Some(chunk) = field.try_next().await? {
                if keep && value.len() < MAX_TEXT_FIELD {
                    value.extend_from_slice(&chunk);
                }
            }
            if keep {
                value.truncate(MAX_TEXT_FIELD);
                form.fields
                    .insert(name, String::from_utf8_lossy(&value).into_owned());
            }
        }
    }

    Ok(form)
}

/// 按 bucket 配置校验上传文件，通过时返回存储扩展名
pub fn validate_upload(
    file: &UploadedFile,
    bucket: &BucketConfig,
) -> Result<&'static str, HttpResponse> {
    if !bucket
        .allowed_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&file.content_type))
    {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidFileType,
            format!(
                "Invalid file type. Allowed: {}",
                bucket.allowed_types.join(", ")
            ),
        ));
    }

    if file.too_large || file.data.len() > bucket.max_size {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::FileTooLarge,
            format!("File too large. Max {}MB", bucket.max_size / (1024 * 1024)),
        ));
    }

    if !validate_magic_bytes(&file.data, &file.content_type) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidFileType,
            "File content does not match its declared type",
        ));
    }

    Ok(extension_for_mime(&file.content_type))
}
