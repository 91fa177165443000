//! # 图片缩放模块（resizer）
//!
//! ## 设计思路
//!
//! 将“输入校验 → 读取解码 → 尺寸计算与重绘 → 编码打包”按职责拆分为子模块。
//!
//! - `validator`：只看声明的 MIME 类型
//! - `loader`：读取字节、临时引用管理、解码与像素上限
//! - `dimensions`：保持宽高比的目标尺寸
//! - `surface`：可注入的离屏画布
//! - `encoder`：JPEG 与 Data URL
//! - `packager`：base64 / formdata 输出
//! - `handler`：批处理编排
//! - `config/error/source`：配置、错误、数据模型
//!
//! ## 调用链
//!
//! ```text
//! resize_images / ImageResizer::resize_batch
//!    ↓  每个文件一个任务（JoinSet）
//! validator.rs（类型校验）
//!    ↓
//! loader.rs（读取 → TransientBlob → 解码）
//!    ↓
//! dimensions.rs + surface.rs（目标尺寸 + 重绘）
//!    ↓
//! encoder.rs + packager.rs（JPEG Data URL → 输出类型）
//!    ↓
//! 按输入顺序返回，或返回第一个 ResizeError
//! ```

mod config;
mod dimensions;
mod encoder;
mod error;
mod handler;
mod loader;
mod packager;
mod source;
mod surface;
mod validator;

pub use config::{OutputType, ResizeConfig};
pub use dimensions::compute_target_dimensions;
pub use encoder::{JPEG_MIME, encode_data_url, encode_jpeg};
pub use error::ResizeError;
pub use handler::{ImageResizer, resize_images};
pub use packager::{FORM_FIELD_NAME, FormAttachment, FormData, parse_data_url};
pub use source::{Dimensions, EncodedResult, ImageInput};
pub use surface::{RasterSurface, ScalingSurface, ScalingSurfaceProvider, SurfaceProvider};
