//! # 输入与中间模型
//!
//! 将“调用方输入”、“派生尺寸”和“最终结果”拆开：
//! - `ImageInput` 表示调用方提供的文件
//! - `Dimensions` 表示计算出的宽高
//! - `EncodedResult` 表示单个文件的输出

use bytes::Bytes;

use super::packager::FormData;

/// 调用方提供的单个图片文件。
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// 展示名，用于错误消息与表单附件文件名。
    pub name: String,
    /// 声明的 MIME 类型，不做内容嗅探。
    pub mime_type: String,
    /// 原始字节。
    pub data: Bytes,
}

impl ImageInput {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// 像素宽高。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub(crate) fn pixels(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// 单个文件的处理结果。
#[derive(Debug, Clone)]
pub enum EncodedResult {
    /// `data:image/jpeg;base64,...`
    Base64(String),
    /// `images[]` 下单个附件的表单。
    FormData(FormData),
}

impl EncodedResult {
    pub fn as_data_url(&self) -> Option<&str> {
        match self {
            Self::Base64(url) => Some(url),
            Self::FormData(_) => None,
        }
    }

    pub fn as_form_data(&self) -> Option<&FormData> {
        match self {
            Self::Base64(_) => None,
            Self::FormData(form) => Some(form),
        }
    }
}
