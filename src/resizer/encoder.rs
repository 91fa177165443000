//! # JPEG 序列化
//!
//! 画布像素 → JPEG 字节 → `data:image/jpeg;base64,...`。
//! JPEG 不带透明通道，编码前把像素按 alpha 合成到黑色背景上（`c * a / 255`）。

use base64::{Engine as _, engine::general_purpose};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, Rgb, RgbImage, RgbaImage};

use super::{RasterSurface, ResizeError};

pub const JPEG_MIME: &str = "image/jpeg";

/// 以给定质量（`1..=100`）将画布编码为 JPEG 字节。
pub fn encode_jpeg<S: RasterSurface + ?Sized>(surface: &S, quality: u8) -> Result<Vec<u8>, ResizeError> {
    let rgb = composite_on_black(surface.pixels());
    let mut buf = Vec::new();

    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| ResizeError::Encode(format!("JPEG 编码失败：{}", e)))?;

    Ok(buf)
}

fn composite_on_black(pixels: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(pixels.width(), pixels.height(), |x, y| {
        let [r, g, b, a] = pixels.get_pixel(x, y).0;
        let blend = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// 编码为 base64 Data URL。
pub fn encode_data_url<S: RasterSurface + ?Sized>(surface: &S, quality: u8) -> Result<String, ResizeError> {
    let jpeg = encode_jpeg(surface, quality)?;
    Ok(format!(
        "data:{};base64,{}",
        JPEG_MIME,
        general_purpose::STANDARD.encode(&jpeg)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resizer::{Dimensions, ScalingSurfaceProvider, SurfaceProvider};

    #[test]
    fn data_url_has_jpeg_prefix_and_decodes_to_jpeg() {
        let surface = ScalingSurfaceProvider::default()
            .allocate(Dimensions::new(20, 10))
            .expect("allocation should succeed");

        let url = encode_data_url(&surface, 10).expect("encode should succeed");
        let payload = url
            .strip_prefix("data:image/jpeg;base64,")
            .expect("prefix should be present");
        let bytes = general_purpose::STANDARD.decode(payload).expect("payload is base64");

        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).expect("payload is a jpeg");
        assert_eq!((decoded.width(), decoded.height()), (20, 10));
    }

    #[test]
    fn alpha_is_blended_onto_black() {
        let pixels = RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => image::Rgba([255, 255, 255, 0]),
            1 => image::Rgba([255, 255, 255, 128]),
            _ => image::Rgba([200, 100, 50, 255]),
        });

        let rgb = composite_on_black(&pixels);

        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [128, 128, 128]);
        assert_eq!(rgb.get_pixel(2, 0).0, [200, 100, 50]);
    }

    #[test]
    fn transparent_surface_encodes_as_black() {
        let mut surface = ScalingSurfaceProvider::default()
            .allocate(Dimensions::new(8, 8))
            .expect("allocation should succeed");
        let clear = image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, image::Rgba([255, 255, 255, 0])));
        surface.draw_scaled(&clear).expect("draw should succeed");

        let jpeg = encode_jpeg(&surface, 90).expect("encode should succeed");
        let decoded = image::load_from_memory(&jpeg).expect("payload is a jpeg").to_rgb8();

        assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c <= 8)));
    }

    #[test]
    fn lower_quality_produces_smaller_output() {
        let mut surface = ScalingSurfaceProvider::default()
            .allocate(Dimensions::new(64, 64))
            .expect("allocation should succeed");
        let noise = image::DynamicImage::ImageRgba8(image::ImageBuffer::from_fn(64, 64, |x, y| {
            image::Rgba([((x * 37 + y * 11) % 256) as u8, ((x * y) % 256) as u8, ((x ^ y) * 5 % 256) as u8, 255])
        }));
        surface.draw_scaled(&noise).expect("draw should succeed");

        let low = encode_jpeg(&surface, 10).expect("encode should succeed");
        let high = encode_jpeg(&surface, 95).expect("encode should succeed");

        assert!(low.len() < high.len());
    }
}
