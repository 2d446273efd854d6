//! 图像预处理：高斯模糊、阈值掩码、形态学运算
//!
//! 模糊核固定为 11×11、σ=2.0（与 `GaussianBlur(ksize=11, sigma=0)`
//! 的自动 σ 一致），可分离实现。形态学核为 3×3 矩形。

use crate::color::{ColorProfile, Hsv};
use orchard_protocol::Frame;

/// 二值掩码（行主序）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        self.data[(y as usize) * (self.width as usize) + (x as usize)] = value;
    }

    /// 掩码中置位像素的个数
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

const BLUR_KERNEL_SIZE: usize = 11;
const BLUR_SIGMA: f32 = 2.0;

fn gaussian_kernel() -> [f32; BLUR_KERNEL_SIZE] {
    let mut kernel = [0.0f32; BLUR_KERNEL_SIZE];
    let center = (BLUR_KERNEL_SIZE / 2) as i32;
    let mut sum = 0.0;
    for (i, k) in kernel.iter_mut().enumerate() {
        let d = (i as i32 - center) as f32;
        *k = (-d * d / (2.0 * BLUR_SIGMA * BLUR_SIGMA)).exp();
        sum += *k;
    }
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

/// 11×11 高斯模糊（可分离，边界复制）
pub fn gaussian_blur(frame: &Frame) -> Frame {
    let width = frame.width();
    let height = frame.height();
    if width == 0 || height == 0 {
        return frame.clone();
    }
    let kernel = gaussian_kernel();
    let radius = (BLUR_KERNEL_SIZE / 2) as i64;

    // 水平方向
    let mut horizontal = Frame::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (i, &k) in kernel.iter().enumerate() {
                let sx = (x as i64 + i as i64 - radius).clamp(0, width as i64 - 1) as u32;
                let px = frame.pixel(sx, y);
                for c in 0..3 {
                    acc[c] += k * px[c] as f32;
                }
            }
            horizontal.set_pixel(x, y, [
                acc[0].round() as u8,
                acc[1].round() as u8,
                acc[2].round() as u8,
            ]);
        }
    }

    // 垂直方向
    let mut blurred = Frame::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (i, &k) in kernel.iter().enumerate() {
                let sy = (y as i64 + i as i64 - radius).clamp(0, height as i64 - 1) as u32;
                let px = horizontal.pixel(x, sy);
                for c in 0..3 {
                    acc[c] += k * px[c] as f32;
                }
            }
            blurred.set_pixel(x, y, [
                acc[0].round() as u8,
                acc[1].round() as u8,
                acc[2].round() as u8,
            ]);
        }
    }
    blurred
}

/// BGR 帧转 HSV（行主序，与帧同尺寸）
pub fn bgr_to_hsv(frame: &Frame) -> Vec<Hsv> {
    frame.pixels().iter().map(|&bgr| Hsv::from_bgr(bgr)).collect()
}

/// 按颜色区间生成二值掩码
pub fn in_range(hsv: &[Hsv], width: u32, height: u32, profile: &ColorProfile) -> Mask {
    let mut mask = Mask::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let px = hsv[(y as usize) * (width as usize) + (x as usize)];
            if px.in_range(profile.hsv_lo, profile.hsv_hi) {
                mask.set(x, y, true);
            }
        }
    }
    mask
}

/// 3×3 腐蚀（边界视为背景）
pub fn erode(mask: &Mask, iterations: u32) -> Mask {
    morphology(mask, iterations, true)
}

/// 3×3 膨胀
pub fn dilate(mask: &Mask, iterations: u32) -> Mask {
    morphology(mask, iterations, false)
}

fn morphology(mask: &Mask, iterations: u32, erode: bool) -> Mask {
    let width = mask.width();
    let height = mask.height();
    let mut current = mask.clone();
    for _ in 0..iterations {
        let mut next = Mask::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let mut all = true;
                let mut any = false;
                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        let nx = x as i64 + dx;
                        let ny = y as i64 + dy;
                        let inside = nx >= 0 && ny >= 0 && nx < width as i64 && ny < height as i64;
                        let value = inside && current.get(nx as u32, ny as u32);
                        all &= value;
                        any |= value;
                    }
                }
                next.set(x, y, if erode { all } else { any });
            }
        }
        current = next;
    }
    current
}
