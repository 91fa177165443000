//! # 光栅画布模块
//!
//! ## 设计思路
//!
//! 重绘依赖抽象为 `SurfaceProvider`：按尺寸分配画布，再把源位图缩放绘制进整个画布。
//! 默认实现 `ScalingSurfaceProvider` 不依赖任何显示环境，测试可替换为记录型实现。
//!
//! ## 实现思路
//!
//! - 优先走 `fast_image_resize`（`Nearest` 用最近邻，其余用卷积核）
//! - 失败时回退 `image::imageops::resize` 并记录告警

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use super::{Dimensions, ResizeError};

/// 可绘制、可读取像素的离屏画布。
pub trait RasterSurface: Send {
    /// 分配时的尺寸，绘制不会改变它。
    fn dimensions(&self) -> Dimensions;

    /// 将源位图缩放绘制到 `(0, 0, width, height)`。
    fn draw_scaled(&mut self, source: &DynamicImage) -> Result<(), ResizeError>;

    /// 当前像素内容，供序列化使用。
    fn pixels(&self) -> &RgbaImage;
}

/// 画布分配能力，可注入。
pub trait SurfaceProvider: Send + Sync + 'static {
    type Surface: RasterSurface + 'static;

    fn allocate(&self, dimensions: Dimensions) -> Result<Self::Surface, ResizeError>;
}

/// 默认画布提供者。
#[derive(Debug, Clone, Copy)]
pub struct ScalingSurfaceProvider {
    filter: FilterType,
}

impl ScalingSurfaceProvider {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for ScalingSurfaceProvider {
    fn default() -> Self {
        Self::new(FilterType::Triangle)
    }
}

impl SurfaceProvider for ScalingSurfaceProvider {
    type Surface = ScalingSurface;

    fn allocate(&self, dimensions: Dimensions) -> Result<Self::Surface, ResizeError> {
        if dimensions.width == 0 || dimensions.height == 0 {
            return Err(ResizeError::ResourceLimit(format!(
                "画布尺寸无效：{}x{}",
                dimensions.width, dimensions.height
            )));
        }

        Ok(ScalingSurface {
            buffer: RgbaImage::new(dimensions.width, dimensions.height),
            filter: self.filter,
        })
    }
}

/// 基于 RGBA 缓冲的画布。
pub struct ScalingSurface {
    buffer: RgbaImage,
    filter: FilterType,
}

impl RasterSurface for ScalingSurface {
    fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.buffer.width(), self.buffer.height())
    }

    fn draw_scaled(&mut self, source: &DynamicImage) -> Result<(), ResizeError> {
        let Dimensions { width, height } = self.dimensions();

        if source.width() == width && source.height() == height {
            self.buffer = source.to_rgba8();
            return Ok(());
        }

        self.buffer = match resize_rgba(source, width, height, self.filter) {
            Ok(resized) => resized,
            Err(err) => {
                log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}", err);
                image::imageops::resize(&source.to_rgba8(), width, height, self.filter)
            }
        };
        Ok(())
    }

    fn pixels(&self) -> &RgbaImage {
        &self.buffer
    }
}

/// 通过 `fast_image_resize` 的 `image` 集成直接在 `DynamicImage` 之间缩放。
fn resize_rgba(source: &DynamicImage, width: u32, height: u32, filter: FilterType) -> Result<RgbaImage, ResizeError> {
    let src = DynamicImage::ImageRgba8(source.to_rgba8());
    let mut dst = DynamicImage::new_rgba8(width, height);
    let options = fr::ResizeOptions::new().resize_alg(resize_alg_for(filter));

    fr::Resizer::new()
        .resize(&src, &mut dst, &options)
        .map_err(|e| ResizeError::Render(format!("{}x{} -> {}x{}：{}", src.width(), src.height(), width, height, e)))?;

    Ok(dst.into_rgba8())
}

fn resize_alg_for(filter: FilterType) -> fr::ResizeAlg {
    let kernel = match filter {
        FilterType::Nearest => return fr::ResizeAlg::Nearest,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    };
    fr::ResizeAlg::Convolution(kernel)
}
