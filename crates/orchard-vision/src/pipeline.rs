//! 目标获取流水线
//!
//! `locate` 是本 crate 的唯一入口：一帧图像 + 颜色标定 → 至多一个
//! 候选的航向/距离/颜色估计。内部任何失败（空帧、退化轮廓、无融合
//! 候选）都折叠为 `None`，不向决策引擎抛错，也绝不猜测结果。

use crate::VisionError;
use crate::color::{ColorLabel, ColorProfile};
use crate::contour::find_contours;
use crate::filter::{bgr_to_hsv, dilate, erode, gaussian_blur, in_range};
use crate::hough::{HoughParams, find_circles};
use orchard_protocol::Frame;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// 视觉标定参数
///
/// 随仲裁器配置文件加载一次，运行期只读。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// 航向增益：像素偏移 → 控制单位
    pub heading_gain: i32,
    /// 距离增益：标定距离 → 控制单位
    pub distance_gain: i32,
    /// 距离标定常数 K（`distance = gain * floor(K * r^-1.7)`）
    pub distance_k: f64,
    /// 候选半径带下界（像素）
    pub radius_min: u32,
    /// 候选半径带上界（像素）
    pub radius_max: u32,
    /// 轮廓最小面积（像素）
    pub min_contour_area: usize,
    /// 融合判据：霍夫圆心到轮廓质心的最大距离（像素）
    pub fusion_center_tol: f64,
    /// 霍夫半径扫描步长
    pub hough_radius_step: u32,
    /// 霍夫角度采样数
    pub hough_angle_samples: u32,
    /// 霍夫最低票数
    pub hough_min_score: u32,
    /// 颜色标定（默认绿 + 橙，TOML 中为表数组，放在标量字段之后）
    pub profiles: Vec<ColorProfile>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            heading_gain: 1,
            distance_gain: 1,
            distance_k: 1.0e5,
            radius_min: 20,
            radius_max: 160,
            min_contour_area: 30,
            fusion_center_tol: 20.0,
            hough_radius_step: 2,
            hough_angle_samples: 64,
            hough_min_score: 40,
            profiles: vec![ColorProfile::green(), ColorProfile::orange()],
        }
    }
}

impl VisionConfig {
    fn hough_params(&self) -> HoughParams {
        HoughParams {
            radius_min: self.radius_min,
            radius_max: self.radius_max,
            radius_step: self.hough_radius_step,
            angle_samples: self.hough_angle_samples,
            min_score: self.hough_min_score,
        }
    }
}

/// 通过双检测器融合的候选目标（单帧内有效，不持久化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DetectedBlob {
    pub x: u32,
    pub y: u32,
    pub radius: u32,
    pub color: ColorLabel,
}

/// 视觉评估结果
///
/// 三个字段要么同时存在（整个结构在 `Some` 里），要么同时缺席
/// （`locate` 返回 `None`）；不存在部分检测。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisionResult {
    /// 航向：有符号，负 = 目标在画面中线左侧
    pub heading: i32,
    /// 标定距离估计（半径的严格减函数）
    pub distance: i32,
    /// 目标颜色
    pub color: ColorLabel,
}

/// 半径 → 标定距离
///
/// `distance = floor(K * r^-1.7)`，对 r > 0 严格递减：球越近，
/// 表观半径越大，估计距离越小。r = 0 为退化输入返回 `None`。
pub fn estimate_distance(radius: u32, config: &VisionConfig) -> Option<i32> {
    if radius == 0 {
        return None;
    }
    let raw = (config.distance_k * (radius as f64).powf(-1.7)).floor();
    Some(config.distance_gain.saturating_mul(raw as i32))
}

/// 在一帧中定位最优目标
pub fn locate(frame: &Frame, config: &VisionConfig) -> Option<VisionResult> {
    match locate_inner(frame, config) {
        Ok(result) => result,
        Err(err) => {
            // 视觉失败就地恢复为"未检测到"
            debug!(error = %err, "vision evaluation failed, treating as no detection");
            None
        }
    }
}

fn locate_inner(
    frame: &Frame,
    config: &VisionConfig,
) -> Result<Option<VisionResult>, VisionError> {
    let width = frame.width();
    let height = frame.height();
    if width == 0 || height == 0 {
        return Err(VisionError::EmptyFrame);
    }

    let blurred = gaussian_blur(frame);
    let hsv = bgr_to_hsv(&blurred);
    let hough_params = config.hough_params();

    let mut candidates: Vec<DetectedBlob> = Vec::new();
    for profile in &config.profiles {
        let mask = in_range(&hsv, width, height, profile);
        let mask = dilate(&erode(&mask, 2), 2);
        if mask.count() == 0 {
            continue;
        }

        let contours = find_contours(&mask, config.min_contour_area);
        let circles = find_circles(&mask, &hough_params);
        trace!(
            color = %profile.label,
            contours = contours.len(),
            circles = circles.len(),
            "mask evaluated"
        );

        for contour in &contours {
            // 融合判据：轮廓必须有半径在带宽内的霍夫圆佐证
            let confirmed = circles.iter().any(|circle| {
                let dx = circle.cx as f64 - contour.cx as f64;
                let dy = circle.cy as f64 - contour.cy as f64;
                (dx * dx + dy * dy).sqrt() <= config.fusion_center_tol
                    && circle.radius >= config.radius_min
                    && circle.radius <= config.radius_max
            });
            let radius = contour.radius.round() as u32;
            if confirmed && radius >= config.radius_min && radius <= config.radius_max {
                candidates.push(DetectedBlob {
                    x: contour.cx,
                    y: contour.cy,
                    radius,
                    color: profile.label,
                });
            }
        }
    }

    // 决胜规则：(x, y, radius, color) 字典序最大者胜，
    // 即最靠右、再靠下、再最大的候选。这是刻意固定的规则。
    let Some(best) = candidates.into_iter().max() else {
        return Ok(None);
    };

    let heading = config
        .heading_gain
        .saturating_mul(best.x as i32 - (width / 2) as i32);
    let Some(distance) = estimate_distance(best.radius, config) else {
        return Ok(None);
    };

    debug!(
        x = best.x,
        y = best.y,
        radius = best.radius,
        color = %best.color,
        heading,
        distance,
        "target acquired"
    );
    Ok(Some(VisionResult {
        heading,
        distance,
        color: best.color,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GREEN_BGR: [u8; 3] = [40, 200, 40];
    const ORANGE_BGR: [u8; 3] = [0, 128, 255];

    /// 在帧上画一个实心圆盘
    fn paint_disk(frame: &mut Frame, cx: i64, cy: i64, r: i64, bgr: [u8; 3]) {
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let dx = x as i64 - cx;
                let dy = y as i64 - cy;
                if dx * dx + dy * dy <= r * r {
                    frame.set_pixel(x, y, bgr);
                }
            }
        }
    }

    fn test_config() -> VisionConfig {
        VisionConfig {
            radius_min: 15,
            radius_max: 60,
            ..VisionConfig::default()
        }
    }

    #[test]
    fn test_locate_green_disk() {
        let mut frame = Frame::new(320, 240);
        paint_disk(&mut frame, 220, 120, 30, GREEN_BGR);
        let result = locate(&frame, &test_config()).expect("disk should be detected");
        assert_eq!(result.color, ColorLabel::Green);
        // 目标在中线右侧 → 航向为正
        assert!(result.heading > 0, "heading = {}", result.heading);
        assert!(result.distance > 0);
    }

    #[test]
    fn test_locate_heading_sign_left() {
        let mut frame = Frame::new(320, 240);
        paint_disk(&mut frame, 80, 120, 30, GREEN_BGR);
        let result = locate(&frame, &test_config()).expect("disk should be detected");
        assert!(result.heading < 0, "heading = {}", result.heading);
    }

    #[test]
    fn test_locate_prefers_rightmost_candidate() {
        let mut frame = Frame::new(320, 240);
        paint_disk(&mut frame, 80, 120, 30, GREEN_BGR);
        paint_disk(&mut frame, 240, 120, 30, ORANGE_BGR);
        let result = locate(&frame, &test_config()).expect("disks should be detected");
        assert_eq!(result.color, ColorLabel::Orange);
        assert!(result.heading > 0);
    }

    #[test]
    fn test_locate_empty_frame() {
        assert!(locate(&Frame::new(0, 0), &test_config()).is_none());
    }

    #[test]
    fn test_locate_blank_frame() {
        assert!(locate(&Frame::new(160, 120), &test_config()).is_none());
    }

    #[test]
    fn test_locate_ignores_speckle() {
        let mut frame = Frame::new(160, 120);
        paint_disk(&mut frame, 80, 60, 3, GREEN_BGR); // 低于半径带与面积阈值
        assert!(locate(&frame, &test_config()).is_none());
    }

    #[test]
    fn test_closer_disk_reads_shorter_distance() {
        let config = test_config();
        let mut far = Frame::new(320, 240);
        paint_disk(&mut far, 160, 120, 20, GREEN_BGR);
        let mut near = Frame::new(320, 240);
        paint_disk(&mut near, 160, 120, 45, GREEN_BGR);
        let far_result = locate(&far, &config).expect("far disk");
        let near_result = locate(&near, &config).expect("near disk");
        assert!(
            near_result.distance < far_result.distance,
            "near {} !< far {}",
            near_result.distance,
            far_result.distance
        );
    }

    proptest! {
        /// 距离估计对半径严格递减
        #[test]
        fn prop_distance_strictly_decreasing(radius in 1u32..500) {
            let config = VisionConfig::default();
            let d1 = estimate_distance(radius, &config).unwrap();
            let d2 = estimate_distance(radius + 1, &config).unwrap();
            prop_assert!(d2 <= d1);
        }
    }

    #[test]
    fn test_distance_decreasing_over_band() {
        // 在整个半径带上严格比较（proptest 的宽松断言之外再钉死一组）
        let config = VisionConfig::default();
        let mut last = i32::MAX;
        for radius in 15..=60 {
            let d = estimate_distance(radius, &config).unwrap();
            assert!(d < last, "distance not decreasing at r={radius}");
            last = d;
        }
    }

    #[test]
    fn test_config_defaults_from_empty() {
        let config: VisionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, VisionConfig::default());
    }
}
