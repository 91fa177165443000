//! # 打包模块
//!
//! ## 设计思路
//!
//! 按输出类型把 Data URL 原样返回，或还原为字节后装进单条目表单。
//! 表单字节必须与直接编码得到的 JPEG 字节逐字节一致。
//!
//! ## 实现思路
//!
//! - `parse_data_url`：拆出 `data:<mime>;base64,` 前缀中的 MIME，解码剩余部分
//! - `FormData`：有序条目列表，可转为 `reqwest::multipart::Form` 交给上传层

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{EncodedResult, OutputType, ResizeError};

/// 表单中图片附件的固定字段名。
pub const FORM_FIELD_NAME: &str = "images[]";

static DATA_URL_MIME: Lazy<Regex> = Lazy::new(|| Regex::new(r":(.*?);").unwrap());

/// 表单中的二进制附件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

/// multipart 表单容器。
#[derive(Debug, Clone, Default)]
pub struct FormData {
    entries: Vec<(String, FormAttachment)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, field: impl Into<String>, attachment: FormAttachment) {
        self.entries.push((field.into(), attachment));
    }

    /// 按字段名取第一条附件。
    pub fn get(&self, field: &str) -> Option<&FormAttachment> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, attachment)| attachment)
    }

    pub fn entries(&self) -> &[(String, FormAttachment)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 转为可直接用于上传请求的 multipart 表单。
    pub fn into_multipart_form(self) -> Result<reqwest::multipart::Form, ResizeError> {
        let mut form = reqwest::multipart::Form::new();
        for (field, attachment) in self.entries {
            let part = reqwest::multipart::Part::bytes(attachment.bytes.to_vec())
                .file_name(attachment.file_name)
                .mime_str(&attachment.mime_type)
                .map_err(|e| ResizeError::Encode(format!("无效的附件 MIME 类型：{}", e)))?;
            form = form.part(field, part);
        }
        Ok(form)
    }
}

/// 解析 base64 Data URL，返回 `(mime, bytes)`。
pub fn parse_data_url(data_url: &str) -> Result<(String, Vec<u8>), ResizeError> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| ResizeError::Encode("Data URL 缺少数据分隔符".to_string()))?;

    if !header.ends_with(";base64") {
        return Err(ResizeError::Encode("Data URL 缺少 base64 标记".to_string()));
    }

    let mime = DATA_URL_MIME
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ResizeError::Encode("Data URL 缺少 MIME 类型".to_string()))?;

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ResizeError::Encode(format!("Base64 解码失败：{}", e)))?;

    Ok((mime, bytes))
}

/// 把 Data URL 按输出类型打包为最终结果。
pub(crate) fn package(data_url: String, output_type: &str, file_name: &str) -> Result<EncodedResult, ResizeError> {
    match OutputType::parse(output_type)? {
        OutputType::Base64 => Ok(EncodedResult::Base64(data_url)),
        OutputType::FormData => {
            let (mime_type, bytes) = parse_data_url(&data_url)?;
            let mut form = FormData::new();
            form.append(
                FORM_FIELD_NAME,
                FormAttachment {
                    file_name: file_name.to_string(),
                    mime_type,
                    bytes: Bytes::from(bytes),
                },
            );
            Ok(EncodedResult::FormData(form))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "data:image/jpeg;base64,/9j/AAEC";

    #[test]
    fn parse_data_url_extracts_mime_and_bytes() {
        let (mime, bytes) = parse_data_url(SAMPLE).expect("sample should parse");

        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF, 0x00, 0x01, 0x02]);
    }

    #[test]
    fn parse_data_url_rejects_missing_separator() {
        assert!(matches!(
            parse_data_url("data:image/jpeg;base64"),
            Err(ResizeError::Encode(_))
        ));
        assert!(matches!(parse_data_url("data:image/jpeg,AAAA"), Err(ResizeError::Encode(_))));
    }

    #[test]
    fn base64_output_returns_url_untouched() {
        let result = package(SAMPLE.to_string(), "base64", "a.png").expect("package should succeed");

        assert_eq!(result.as_data_url(), Some(SAMPLE));
    }

    #[test]
    fn formdata_output_wraps_single_attachment() {
        let result = package(SAMPLE.to_string(), "formdata", "holiday.png").expect("package should succeed");
        let form = result.as_form_data().expect("should be form data");

        assert_eq!(form.len(), 1);
        let attachment = form.get(FORM_FIELD_NAME).expect("images[] entry");
        assert_eq!(attachment.file_name, "holiday.png");
        assert_eq!(attachment.mime_type, "image/jpeg");
        assert_eq!(attachment.bytes.as_ref(), &[0xFF, 0xD8, 0xFF, 0x00, 0x01, 0x02]);
    }

    #[test]
    fn unknown_output_type_is_rejected() {
        let result = package(SAMPLE.to_string(), "xml", "a.png");

        assert!(matches!(result, Err(ResizeError::InvalidOutputType(v)) if v == "xml"));
    }

    #[test]
    fn form_converts_to_multipart() {
        let result = package(SAMPLE.to_string(), "formdata", "a.png").expect("package should succeed");
        let form = result.as_form_data().cloned().expect("should be form data");

        let multipart = form.into_multipart_form().expect("conversion should succeed");

        assert!(!multipart.boundary().is_empty());
    }
}
