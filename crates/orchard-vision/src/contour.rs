//! 轮廓提取
//!
//! 掩码上的连通域分析：每个连通域给出像素面积、矩法质心和
//! 近似最小包围圆半径。零阶矩为零的退化域报
//! [`VisionError::DegenerateContour`]，由上层丢弃。

use crate::VisionError;
use crate::filter::Mask;

/// 连通域轮廓（掩码坐标系）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contour {
    /// 质心 x（像素）
    pub cx: u32,
    /// 质心 y（像素）
    pub cy: u32,
    /// 近似包围圆半径（质心到域内最远像素）
    pub radius: f64,
    /// 像素面积（零阶矩）
    pub area: usize,
}

/// 提取所有面积不小于 `min_area` 的连通域（4-连通）
pub fn find_contours(mask: &Mask, min_area: usize) -> Vec<Contour> {
    let width = mask.width();
    let height = mask.height();
    let mut visited = vec![false; (width as usize) * (height as usize)];
    let mut contours = Vec::new();
    let mut stack = Vec::new();
    let mut component = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = (y as usize) * (width as usize) + (x as usize);
            if visited[idx] || !mask.get(x, y) {
                continue;
            }
            // 洪泛填充收集一个连通域
            component.clear();
            stack.push((x, y));
            visited[idx] = true;
            while let Some((px, py)) = stack.pop() {
                component.push((px, py));
                let neighbors = [
                    (px.wrapping_sub(1), py),
                    (px + 1, py),
                    (px, py.wrapping_sub(1)),
                    (px, py + 1),
                ];
                for (nx, ny) in neighbors {
                    if nx < width && ny < height {
                        let nidx = (ny as usize) * (width as usize) + (nx as usize);
                        if !visited[nidx] && mask.get(nx, ny) {
                            visited[nidx] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }
            if component.len() < min_area {
                continue;
            }
            match moments(&component) {
                Ok(contour) => contours.push(contour),
                // 退化域不算检测失败，丢弃即可
                Err(VisionError::DegenerateContour) => continue,
                Err(_) => continue,
            }
        }
    }
    contours
}

/// 由像素集合计算矩与包围圆
fn moments(pixels: &[(u32, u32)]) -> Result<Contour, VisionError> {
    let m00 = pixels.len();
    if m00 == 0 {
        return Err(VisionError::DegenerateContour);
    }
    let mut m10 = 0u64;
    let mut m01 = 0u64;
    for &(x, y) in pixels {
        m10 += x as u64;
        m01 += y as u64;
    }
    let cx = (m10 as f64 / m00 as f64).round();
    let cy = (m01 as f64 / m00 as f64).round();

    let mut radius_sq = 0.0f64;
    for &(x, y) in pixels {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        radius_sq = radius_sq.max(dx * dx + dy * dy);
    }

    Ok(Contour {
        cx: cx as u32,
        cy: cy as u32,
        radius: radius_sq.sqrt(),
        area: m00,
    })
}
