//! # 输入校验模块
//!
//! 只看调用方声明的 MIME 类型（须以 `image/` 开头，忽略大小写），在任何读取与解码之前尽快失败。

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ImageInput, ResizeError};

static IMAGE_MIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^image/").unwrap());

/// 声明类型是否匹配 `image/*`（忽略大小写）。
pub(crate) fn is_image_mime(mime_type: &str) -> bool {
    IMAGE_MIME.is_match(mime_type)
}

/// 校验单个输入，失败时错误携带文件名。
pub(crate) fn ensure_image_input(input: &ImageInput) -> Result<(), ResizeError> {
    if is_image_mime(&input.mime_type) {
        Ok(())
    } else {
        Err(ResizeError::InvalidInput(input.name.clone()))
    }
}
