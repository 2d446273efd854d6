//! 霍夫圆检测
//!
//! 在二值掩码的边缘像素上做中心投票：对每个候选半径，每个边缘
//! 像素沿采样角度向可能的圆心投票，累加器的 3×3 邻域得分超过
//! 阈值即报告一个圆。
//!
//! 这是刻意的独立证据源：它不看连通域形状，只看"是否存在一圈
//! 以该点为心的边缘"，因此与轮廓检测的失效模式互补。

use crate::filter::Mask;

/// 霍夫检测参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughParams {
    /// 半径带下界（像素）
    pub radius_min: u32,
    /// 半径带上界（像素）
    pub radius_max: u32,
    /// 半径扫描步长
    pub radius_step: u32,
    /// 每个边缘像素的投票角度数
    pub angle_samples: u32,
    /// 接受圆的最低 3×3 邻域票数
    pub min_score: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            radius_min: 20,
            radius_max: 160,
            radius_step: 2,
            angle_samples: 64,
            min_score: 40,
        }
    }
}

/// 检测到的圆
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoughCircle {
    pub cx: u32,
    pub cy: u32,
    pub radius: u32,
    /// 圆心 3×3 邻域累计票数
    pub score: u32,
}

/// 掩码边缘像素：置位且至少一个 4-邻域为背景（或在图像边界上）
fn edge_pixels(mask: &Mask) -> Vec<(u32, u32)> {
    let width = mask.width();
    let height = mask.height();
    let mut edges = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if !mask.get(x, y) {
                continue;
            }
            let on_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            let has_background = on_border
                || !mask.get(x - 1, y)
                || !mask.get(x + 1, y)
                || !mask.get(x, y - 1)
                || !mask.get(x, y + 1);
            if has_background {
                edges.push((x, y));
            }
        }
    }
    edges
}

/// 在掩码上检测圆，每个扫描半径最多报告一个最优圆
pub fn find_circles(mask: &Mask, params: &HoughParams) -> Vec<HoughCircle> {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    if width == 0 || height == 0 || params.radius_min == 0 {
        return Vec::new();
    }
    let edges = edge_pixels(mask);
    if edges.is_empty() {
        return Vec::new();
    }

    let mut circles = Vec::new();
    let mut accumulator = vec![0u32; width * height];
    let step = params.radius_step.max(1);

    let mut radius = params.radius_min;
    while radius <= params.radius_max {
        accumulator.fill(0);
        for &(x, y) in &edges {
            for k in 0..params.angle_samples {
                let theta = (k as f64) * std::f64::consts::TAU / (params.angle_samples as f64);
                let cx = (x as f64 - radius as f64 * theta.cos()).round() as i64;
                let cy = (y as f64 - radius as f64 * theta.sin()).round() as i64;
                if cx >= 0 && cy >= 0 && (cx as usize) < width && (cy as usize) < height {
                    accumulator[(cy as usize) * width + (cx as usize)] += 1;
                }
            }
        }

        // 3×3 邻域得分吸收角度/半径量化误差
        let mut best: Option<HoughCircle> = None;
        for y in 0..height {
            for x in 0..width {
                if accumulator[y * width + x] == 0 {
                    continue;
                }
                let mut score = 0u32;
                for dy in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                    for dx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                        score += accumulator[dy * width + dx];
                    }
                }
                if score >= params.min_score
                    && best.map(|b| score > b.score).unwrap_or(true)
                {
                    best = Some(HoughCircle {
                        cx: x as u32,
                        cy: y as u32,
                        radius,
                        score,
                    });
                }
            }
        }
        if let Some(circle) = best {
            circles.push(circle);
        }
        radius += step;
    }
    circles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk_mask(width: u32, height: u32, cx: i64, cy: i64, r: i64) -> Mask {
        let mut mask = Mask::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let dx = x as i64 - cx;
                let dy = y as i64 - cy;
                if dx * dx + dy * dy <= r * r {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    #[test]
    fn test_detects_disk_center_and_radius() {
        let mask = disk_mask(160, 120, 80, 60, 30);
        let params = HoughParams {
            radius_min: 20,
            radius_max: 40,
            ..HoughParams::default()
        };
        let circles = find_circles(&mask, &params);
        assert!(!circles.is_empty());
        let best = circles.iter().max_by_key(|c| c.score).unwrap();
        assert!((best.cx as i64 - 80).abs() <= 3, "cx = {}", best.cx);
        assert!((best.cy as i64 - 60).abs() <= 3, "cy = {}", best.cy);
        assert!((best.radius as i64 - 30).abs() <= 3, "r = {}", best.radius);
    }

    #[test]
    fn test_empty_mask_no_circles() {
        let mask = Mask::new(64, 64);
        assert!(find_circles(&mask, &HoughParams::default()).is_empty());
    }

    #[test]
    fn test_speckle_scores_below_threshold() {
        // 孤立小斑点的边缘太短，凑不够票数
        let mask = disk_mask(100, 100, 50, 50, 2);
        let circles = find_circles(&mask, &HoughParams::default());
        assert!(circles.is_empty(), "speckle produced {:?}", circles);
    }
}
