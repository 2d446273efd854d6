//! # Orchard Vision
//!
//! 颜色目标获取流水线：输入一帧 BGR 图像和两组颜色标定，
//! 输出最多一个目标的航向/距离/颜色估计。
//!
//! ## 流水线阶段
//!
//! 1. 高斯模糊抑制噪声（`filter`）
//! 2. BGR → HSV，按颜色区间生成二值掩码，腐蚀 + 膨胀去斑（`color` / `filter`）
//! 3. 掩码上独立运行轮廓提取（`contour`）与霍夫圆检测（`hough`）
//! 4. 双检测器融合：轮廓质心必须有半径在带宽内的霍夫圆佐证，
//!    才晋升为候选（`pipeline`）
//!
//! 融合是刻意的：只有轮廓会被纹理误检骗到，只有霍夫会被噪声假圆
//! 骗到，两者交叉验证后才可信。
//!
//! 无候选时返回 `None`，绝不猜测。

pub mod color;
pub mod contour;
pub mod filter;
pub mod hough;
pub mod pipeline;

pub use color::{ColorLabel, ColorProfile, Hsv};
pub use contour::Contour;
pub use hough::HoughCircle;
pub use pipeline::{DetectedBlob, VisionConfig, VisionResult, estimate_distance, locate};

use thiserror::Error;

/// 视觉流水线内部错误
///
/// 这些错误在 [`pipeline::locate`] 内部被就地恢复为"未检测到"，
/// 不会穿透到决策引擎。
#[derive(Error, Debug)]
pub enum VisionError {
    /// 空帧（宽或高为零）
    #[error("Empty frame")]
    EmptyFrame,

    /// 退化轮廓（零面积矩，质心无定义）
    #[error("Degenerate contour (zero area moment)")]
    DegenerateContour,
}
