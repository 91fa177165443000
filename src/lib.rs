//! # 批量图片缩放 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  调用方：Vec<ImageInput> + Option<ResizeConfig>           │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ resize_images(...).await
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  resizer                                                 │
//! │  ├─ validator   image/* 校验                             │
//! │  ├─ loader      读取 · TransientBlob · 解码               │
//! │  ├─ dimensions  保持宽高比的目标尺寸                      │
//! │  ├─ surface     SurfaceProvider（可注入画布）              │
//! │  ├─ encoder     JPEG → data:image/jpeg;base64,...         │
//! │  └─ packager    base64 / formdata（images[]）             │
//! └──────────────────────────────────────────────────────────┘
//!         ↓ Result<Vec<EncodedResult>, ResizeError>
//! ```
//!
//! 结果顺序与输入一致；任一文件失败则整个批次失败，不返回部分结果。

pub mod resizer;

pub use resizer::{
    Dimensions, EncodedResult, FORM_FIELD_NAME, FormAttachment, FormData, ImageInput, ImageResizer,
    JPEG_MIME, OutputType, RasterSurface, ResizeConfig, ResizeError, ScalingSurface, ScalingSurfaceProvider,
    SurfaceProvider, compute_target_dimensions, encode_data_url, encode_jpeg, parse_data_url, resize_images,
};
