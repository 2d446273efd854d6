//! 颜色空间与颜色标定
//!
//! HSV 表示与 OpenCV 的 8-bit 约定一致：H ∈ [0, 180)，S/V ∈ [0, 255]。
//! 默认的绿/橙区间来自实地标定。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 目标颜色标签
///
/// `Ord` 参与候选选择的字典序决胜，也是计数表的键。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLabel {
    Green,
    Orange,
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorLabel::Green => f.write_str("green"),
            ColorLabel::Orange => f.write_str("orange"),
        }
    }
}

/// HSV 像素（OpenCV 8-bit 约定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    /// 从 BGR 像素转换
    pub fn from_bgr(bgr: [u8; 3]) -> Self {
        let b = bgr[0] as f32;
        let g = bgr[1] as f32;
        let r = bgr[2] as f32;

        let max = b.max(g).max(r);
        let min = b.min(g).min(r);
        let delta = max - min;

        let v = max;
        let s = if max == 0.0 { 0.0 } else { 255.0 * delta / max };
        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (g - b) / delta
        } else if max == g {
            120.0 + 60.0 * (b - r) / delta
        } else {
            240.0 + 60.0 * (r - g) / delta
        };
        let h = if h < 0.0 { h + 360.0 } else { h };

        Self {
            // OpenCV 将 0-360 度折半存入一个字节
            h: (h / 2.0).round().min(179.0) as u8,
            s: s.round().min(255.0) as u8,
            v: v.round().min(255.0) as u8,
        }
    }

    /// 是否落在 `[lo, hi]` 闭区间内（逐分量）
    pub fn in_range(self, lo: [u8; 3], hi: [u8; 3]) -> bool {
        self.h >= lo[0]
            && self.h <= hi[0]
            && self.s >= lo[1]
            && self.s <= hi[1]
            && self.v >= lo[2]
            && self.v <= hi[2]
    }
}

/// 单个颜色的 HSV 阈值标定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorProfile {
    pub label: ColorLabel,
    /// HSV 下界（含）
    pub hsv_lo: [u8; 3],
    /// HSV 上界（含）
    pub hsv_hi: [u8; 3],
}

impl ColorProfile {
    /// 实地标定的绿球区间
    pub fn green() -> Self {
        Self {
            label: ColorLabel::Green,
            hsv_lo: [29, 64, 32],
            hsv_hi: [90, 255, 255],
        }
    }

    /// 实地标定的橙球区间
    pub fn orange() -> Self {
        Self {
            label: ColorLabel::Orange,
            hsv_lo: [5, 64, 32],
            hsv_hi: [40, 255, 255],
        }
    }
}
