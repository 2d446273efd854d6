//! BGR 像素帧
//!
//! 相机帧在线上的形式是嵌套 JSON 数组（行 × 列 × `[b,g,r]`），
//! 与机器人侧 `bgr.tolist()` 的输出保持兼容。内存中按行主序
//! 存为扁平向量，避免逐行堆分配。

use crate::ProtocolError;
use serde::{Deserialize, Serialize};

/// BGR 像素帧（8-bit，按行主序）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<[u8; 3]>>", into = "Vec<Vec<[u8; 3]>>")]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<[u8; 3]>,
}

impl Frame {
    /// 创建全黑帧
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![[0u8; 3]; (width as usize) * (height as usize)],
        }
    }

    /// 帧宽（像素）
    pub fn width(&self) -> u32 {
        self.width
    }

    /// 帧高（像素）
    pub fn height(&self) -> u32 {
        self.height
    }

    /// 读取像素（BGR 顺序）
    ///
    /// # Panics
    ///
    /// 坐标越界时 panic；调用方负责保证 `x < width && y < height`。
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        debug_assert!(x < self.width && y < self.height);
        self.data[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// 写入像素（BGR 顺序）
    pub fn set_pixel(&mut self, x: u32, y: u32, bgr: [u8; 3]) {
        debug_assert!(x < self.width && y < self.height);
        self.data[(y as usize) * (self.width as usize) + (x as usize)] = bgr;
    }

    /// 扁平像素切片（行主序）
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.data
    }
}

impl TryFrom<Vec<Vec<[u8; 3]>>> for Frame {
    type Error = ProtocolError;

    fn try_from(rows: Vec<Vec<[u8; 3]>>) -> Result<Self, Self::Error> {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as u32;
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width as usize {
                return Err(ProtocolError::RaggedFrame {
                    row: row_idx,
                    len: row.len(),
                    expected: width as usize,
                });
            }
            data.extend(row);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

impl From<Frame> for Vec<Vec<[u8; 3]>> {
    fn from(frame: Frame) -> Self {
        frame
            .data
            .chunks(frame.width.max(1) as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}
