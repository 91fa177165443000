//! # 配置模块
//!
//! ## 设计思路
//!
//! 所有可调参数集中在 `ResizeConfig`：对外四个选项（最大宽高、质量、输出类型）
//! 与内部资源上限、缩放滤镜放在同一处，便于观察与测试。
//!
//! ## 实现思路
//!
//! - `Default` 给出与前端约定一致的默认值（1920×1080、质量 0.1、base64）。
//! - 通过 `serde` 接受 camelCase 的 JSON 选项，缺省字段回落到默认值。
//! - `OutputType::parse` 在打包阶段才解析，未知值按单文件失败处理。
//! - `validate` 在批处理开始前执行一次。

use image::imageops::FilterType;
use serde::Deserialize;

use super::ResizeError;

pub const DEFAULT_MAX_WIDTH: u32 = 1920;
pub const DEFAULT_MAX_HEIGHT: u32 = 1080;
pub const DEFAULT_QUALITY: f32 = 0.1;
pub const DEFAULT_OUTPUT_TYPE: &str = "base64";

/// 批量缩放配置。
///
/// 一次批处理内只读，所有并发任务共享同一份快照。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResizeConfig {
    /// 宽图（宽 > 高）分支的宽度上限。
    pub max_width: u32,
    /// 高图或方图分支的高度上限。
    pub max_height: u32,
    /// JPEG 质量，取值 `[0, 1]`。
    pub quality: f32,
    /// 输出类型原始字符串：`base64` 或 `formdata`。
    pub output_type: String,
    /// 单个文件允许的最大字节数，默认不限制。
    pub max_file_size: u64,
    /// 解码前按文件头尺寸检查的像素上限（`width * height`），默认不限制。
    pub max_decoded_pixels: u64,
    /// 重绘时使用的缩放滤镜。
    #[serde(skip, default = "default_resize_filter")]
    pub resize_filter: FilterType,
}

fn default_resize_filter() -> FilterType {
    FilterType::Triangle
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            quality: DEFAULT_QUALITY,
            output_type: DEFAULT_OUTPUT_TYPE.to_string(),
            max_file_size: u64::MAX,
            max_decoded_pixels: u64::MAX,
            resize_filter: default_resize_filter(),
        }
    }
}

impl ResizeConfig {
    /// 从前端风格的 JSON 选项构建配置。
    ///
    /// # 示例
    /// ```rust
    /// use image_resizer::ResizeConfig;
    ///
    /// let config = ResizeConfig::from_json(r#"{ "maxWidth": 800, "outputType": "formdata" }"#)?;
    /// assert_eq!(config.max_width, 800);
    /// assert_eq!(config.max_height, 1080);
    /// # Ok::<(), image_resizer::ResizeError>(())
    /// ```
    pub fn from_json(options: &str) -> Result<Self, ResizeError> {
        let config: Self = serde_json::from_str(options)
            .map_err(|e| ResizeError::InvalidConfig(format!("解析选项失败：{}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验数值范围。输出类型不在这里校验。
    pub fn validate(&self) -> Result<(), ResizeError> {
        if self.max_width == 0 {
            return Err(ResizeError::InvalidConfig("maxWidth 必须大于 0".to_string()));
        }
        if self.max_height == 0 {
            return Err(ResizeError::InvalidConfig("maxHeight 必须大于 0".to_string()));
        }
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(ResizeError::InvalidConfig(format!(
                "quality 必须在 0~1 之间（当前：{}）",
                self.quality
            )));
        }
        Ok(())
    }

    /// 将 `[0, 1]` 质量映射到 JPEG 编码器的 `1..=100` 档位。
    pub fn jpeg_quality(&self) -> u8 {
        let scaled = (self.quality.clamp(0.0, 1.0) * 100.0).round() as u8;
        scaled.max(1)
    }
}

/// 结果输出形式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// `data:image/jpeg;base64,...` 字符串。
    Base64,
    /// 单条目 multipart 表单。
    FormData,
}

impl OutputType {
    /// 按字面值严格匹配，大小写敏感。
    pub fn parse(value: &str) -> Result<Self, ResizeError> {
        match value {
            "base64" => Ok(Self::Base64),
            "formdata" => Ok(Self::FormData),
            other => Err(ResizeError::InvalidOutputType(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::FormData => "formdata",
        }
    }
}
