//! # 目标尺寸计算
//!
//! 宽图（宽 > 高）只按 `max_width` 约束，高图与方图只按 `max_height` 约束。
//! 因此宽图缩放后的高度可能仍超过 `max_height`（反之亦然），这是既有行为，保持不变。

use super::Dimensions;

/// 计算保持宽高比的目标尺寸，不放大。
///
/// 派生边按四舍五入取整；结果为 0 时取 1，保证画布可分配。
///
/// # 示例
/// ```rust
/// use image_resizer::{Dimensions, compute_target_dimensions};
///
/// let target = compute_target_dimensions(Dimensions::new(3000, 2000), 1920, 1080);
/// assert_eq!(target, Dimensions::new(1920, 1280));
/// ```
pub fn compute_target_dimensions(original: Dimensions, max_width: u32, max_height: u32) -> Dimensions {
    let Dimensions { width, height } = original;

    if width > height {
        if width > max_width {
            let scaled = scale_round(height, max_width, width);
            return Dimensions::new(max_width, scaled);
        }
    } else if height > max_height {
        let scaled = scale_round(width, max_height, height);
        return Dimensions::new(scaled, max_height);
    }

    original
}

/// `round(value * numerator / denominator)`，半数向上。
fn scale_round(value: u32, numerator: u32, denominator: u32) -> u32 {
    let exact = value as f64 * numerator as f64 / denominator as f64;
    ((exact + 0.5).floor() as u32).max(1)
}
