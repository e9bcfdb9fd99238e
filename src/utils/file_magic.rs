/// 根据 MIME 类型决定存储时的扩展名，未知类型使用 `dat`
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime.to_lowercase().as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "application/pdf" => "pdf",
        _ => "dat",
    }
}

/// 根据对象路径的扩展名推断下载时的 Content-Type
pub fn content_type_for_path(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match extension.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// 验证文件内容的魔术字节是否与声明的 MIME 类型匹配
///
/// # Arguments
/// * `data` - 文件内容的前几个字节
/// * `mime` - 客户端声明的 MIME 类型
///
/// # Returns
/// * `true` - 魔术字节匹配，或该类型没有可校验的签名
/// * `false` - 魔术字节不匹配或内容为空
pub fn validate_magic_bytes(data: &[u8], mime: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match mime.to_lowercase().as_str() {
        // 图片格式
        "image/png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        "image/jpeg" | "image/jpg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),
        "image/webp" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP",
        "image/gif" => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),

        // 文档格式
        "application/pdf" => data.starts_with(b"%PDF"),

        // 其它类型由配置的白名单把关
        _ => true,
    }
}
