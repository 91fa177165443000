//! # 读取与解码模块
//!
//! ## 设计思路
//!
//! 把“拿到字节”和“字节 → 位图”两个异步阶段放在一起，并在完整解码前做资源上限检查。
//! 交给解码器的字节包在 `TransientBlob` 里，解码结束（无论成功失败）即释放。
//!
//! ## 实现思路
//!
//! 1. `read_input_bytes`：按 `max_file_size` 校验后返回共享字节
//! 2. `BlobRegistry::register`：登记临时引用，计数可观测
//! 3. `decode_bitmap`：在阻塞线程池中读取文件头尺寸、校验像素上限、完整解码

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use image::{DynamicImage, ImageReader};

use super::{Dimensions, ImageInput, ResizeConfig, ResizeError};

/// 读取输入的全部字节。
pub(crate) async fn read_input_bytes(input: &ImageInput, config: &ResizeConfig) -> Result<Bytes, ResizeError> {
    let len = input.data.len() as u64;
    if len > config.max_file_size {
        return Err(ResizeError::ResourceLimit(format!(
            "文件 {} 过大：{:.2} MB（限制：{:.2} MB）",
            input.name,
            len as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    log::debug!("📁 读取文件 {} - {} 字节", input.name, len);
    Ok(input.data.clone())
}

/// 临时字节引用的登记表。
///
/// 每个存活的 `TransientBlob` 计数一次，释放时扣减。
#[derive(Debug, Clone, Default)]
pub(crate) struct BlobRegistry {
    live: Arc<AtomicUsize>,
}

impl BlobRegistry {
    pub(crate) fn register(&self, bytes: Bytes) -> TransientBlob {
        self.live.fetch_add(1, Ordering::SeqCst);
        TransientBlob {
            bytes,
            live: Arc::clone(&self.live),
        }
    }

    pub(crate) fn live_count(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// 暴露给解码器的临时引用，`Drop` 时撤销。
pub(crate) struct TransientBlob {
    bytes: Bytes,
    live: Arc<AtomicUsize>,
}

impl TransientBlob {
    fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for TransientBlob {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        log::trace!("🧹 释放临时字节引用（{} 字节）", self.bytes.len());
    }
}

/// 将临时引用解码为位图。
///
/// `blob` 在阻塞任务结束时随闭包一起释放。
pub(crate) async fn decode_bitmap(
    blob: TransientBlob,
    file_name: &str,
    max_decoded_pixels: u64,
) -> Result<DynamicImage, ResizeError> {
    let name = file_name.to_string();

    tokio::task::spawn_blocking(move || {
        let result = decode_blob(blob.as_slice(), &name, max_decoded_pixels);
        drop(blob);
        result
    })
    .await
    .map_err(|e| ResizeError::Decode(format!("文件 {} 解码线程执行失败：{}", file_name, e)))?
}

fn decode_blob(bytes: &[u8], file_name: &str, max_decoded_pixels: u64) -> Result<DynamicImage, ResizeError> {
    let header = inspect_dimensions_from_memory(bytes)
        .map_err(|e| ResizeError::Decode(format!("文件 {} {}", file_name, e)))?;
    validate_pixel_limits(header, max_decoded_pixels, file_name)?;

    image::load_from_memory(bytes)
        .map_err(|e| ResizeError::Decode(format!("文件 {} 图片解码失败：{}", file_name, e)))
}

/// 仅读取图片头信息中的宽高。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<Dimensions, String> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| format!("无法识别图片格式：{}", e))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| format!("无法读取图片尺寸：{}", e))?;
    Ok(Dimensions::new(width, height))
}

fn validate_pixel_limits(dimensions: Dimensions, max_decoded_pixels: u64, file_name: &str) -> Result<(), ResizeError> {
    let pixels = dimensions.pixels();
    if pixels > max_decoded_pixels {
        return Err(ResizeError::ResourceLimit(format!(
            "文件 {} 像素过大：{} 像素（限制：{} 像素）",
            file_name, pixels, max_decoded_pixels
        )));
    }
    Ok(())
}
